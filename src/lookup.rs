use chrono::NaiveDate;
use std::{collections::HashMap, net::Ipv4Addr};

use crate::{
    Qqwry,
    common::{ByteCursor, INDEX_LEN, parse_ipv4, u24_le_from_bytes},
    search::{resolve_record, search_index},
    text::{decode_area, decode_text},
};

/// Location recorded for an IPv4 address.
///
/// `ip` is the queried text verbatim. `country` and `area` are empty when the
/// address is invalid or not covered by the database.
///
/// IP 地址对应的归属地信息。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IpLocation {
    pub ip: String,
    pub country: String,
    pub area: String,
}

impl IpLocation {
    pub(crate) fn empty(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if neither country nor area is known.
    pub fn is_empty(&self) -> bool {
        self.country.is_empty() && self.area.is_empty()
    }
}

/// Release information stored in the last index entry.
///
/// 数据库最后一条记录中保存的版本信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbVersion {
    /// Country field of the entry, normally the publisher name.
    pub publisher: String,
    /// Area field of the entry, e.g. `2024年10月16日IP数据`.
    pub text: String,
    /// Release date parsed from `text`.
    pub date: Option<NaiveDate>,
}

impl Qqwry {
    /// Look up a dotted-quad IPv4 address.
    ///
    /// Never fails: invalid or uncovered addresses yield empty fields.
    ///
    /// 查询点分十进制 IPv4 地址，非法或未命中时返回空字段。
    pub fn find(&self, ip: &str) -> IpLocation {
        let ip_num = match parse_ipv4(ip) {
            Ok(ip_num) => ip_num,
            Err(err) => {
                log::debug!("{err}");
                return IpLocation::empty(ip);
            }
        };
        match self.locate(ip_num) {
            Some((country, area)) => IpLocation {
                ip: ip.to_string(),
                country,
                area,
            },
            None => IpLocation::empty(ip),
        }
    }

    /// Look up every address of a comma-separated list.
    ///
    /// Keys are the list items verbatim; a repeated address keeps one entry.
    ///
    /// 批量查询以逗号分隔的地址列表，重复地址只保留一项。
    pub fn find_all(&self, ips: &str) -> HashMap<String, IpLocation> {
        ips.split(',')
            .map(|ip| (ip.to_string(), self.find(ip)))
            .collect()
    }

    /// Look up a batch of addresses, keeping input order and duplicates.
    ///
    /// 批量查询地址，保持输入顺序。
    pub fn find_many<S: AsRef<str>>(&self, ips: &[S]) -> Vec<IpLocation> {
        ips.iter().map(|ip| self.find(ip.as_ref())).collect()
    }

    /// Search a parsed IPv4 address, `None` if no range covers it.
    ///
    /// 查询指定 IPv4 地址，未命中返回 `None`。
    pub fn search(&self, ip: Ipv4Addr) -> Option<IpLocation> {
        let (country, area) = self.locate(u32::from(ip))?;
        Some(IpLocation {
            ip: ip.to_string(),
            country,
            area,
        })
    }

    /// Returns only the country of [`Qqwry::find`].
    pub fn country(&self, ip: &str) -> String {
        self.find(ip).country
    }

    /// Read the release information from the last index entry.
    ///
    /// 读取最后一条索引记录中的版本信息。
    pub fn version(&self) -> Option<DbVersion> {
        let mut cursor = ByteCursor::new(&self.bindata);
        let entry = cursor.read(INDEX_LEN as usize, Some(u64::from(self.header.index_end)));
        if entry.len() < INDEX_LEN as usize {
            return None;
        }
        let offset = u24_le_from_bytes(&entry[4..]);
        if offset == 0 {
            return None;
        }
        let raw = resolve_record(&self.bindata, offset);
        let publisher = decode_text(raw.country);
        let text = decode_text(raw.area);
        if publisher.is_empty() && text.is_empty() {
            return None;
        }
        let date = parse_release_date(&text);
        Some(DbVersion {
            publisher,
            text,
            date,
        })
    }

    fn locate(&self, ip: u32) -> Option<(String, String)> {
        let offset = search_index(&self.bindata, &self.header, ip);
        if offset == 0 {
            return None;
        }
        let raw = resolve_record(&self.bindata, offset);
        Some((decode_text(raw.country), decode_area(raw.area)))
    }
}

/// Parse `YYYY年M月D日` out of a release text.
fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let (year, rest) = text.split_once('年')?;
    let (month, rest) = rest.split_once('月')?;
    let (day, _) = rest.split_once('日')?;
    NaiveDate::from_ymd_opt(
        trailing_number(year)? as i32,
        trailing_number(month)?,
        trailing_number(day)?,
    )
}

fn trailing_number(s: &str) -> Option<u32> {
    s.rsplit(|c: char| !c.is_ascii_digit()).next()?.parse().ok()
}
