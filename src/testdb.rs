//! Hand-assembled database images for unit tests.

use encoding_rs::GBK;

use crate::common::INDEX_LEN;

/// Builds a database image: header, payload appended in call order, index last.
#[derive(Debug)]
pub struct DbBuilder {
    data: Vec<u8>,
    index: Vec<(u32, u32)>,
}

impl DbBuilder {
    pub fn new() -> Self {
        Self {
            data: vec![0; 8],
            index: Vec::new(),
        }
    }

    fn offset(&self) -> u32 {
        self.data.len() as u32
    }

    /// Append raw bytes, returning their offset.
    pub fn raw(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.offset();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Append a null-terminated string.
    pub fn cstr(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.raw(bytes);
        self.data.push(0);
        offset
    }

    /// Append a tagged 3-byte pointer.
    pub fn pointer(&mut self, mode: u8, target: u32) -> u32 {
        let le = target.to_le_bytes();
        self.raw(&[mode, le[0], le[1], le[2]])
    }

    /// Append a record with inline country and area, returning the record offset.
    pub fn direct_record(&mut self, country: &[u8], area: &[u8]) -> u32 {
        let offset = self.raw(&[0xff; 4]);
        self.cstr(country);
        self.cstr(area);
        offset
    }

    /// Same as [`DbBuilder::direct_record`] with GBK-encoded text.
    pub fn gbk_record(&mut self, country: &str, area: &str) -> u32 {
        let country = gbk(country);
        let area = gbk(area);
        self.direct_record(&country, &area)
    }

    pub fn index(&mut self, ip: u32, offset: u32) {
        self.index.push((ip, offset));
    }

    pub fn build(mut self) -> Vec<u8> {
        let index_start = self.offset();
        for (ip, offset) in std::mem::take(&mut self.index) {
            self.data.extend_from_slice(&ip.to_le_bytes());
            self.data.extend_from_slice(&offset.to_le_bytes()[..3]);
        }
        let entries = (self.offset() - index_start) / INDEX_LEN;
        let index_end = index_start + entries.saturating_sub(1) * INDEX_LEN;
        self.data[0..4].copy_from_slice(&index_start.to_le_bytes());
        self.data[4..8].copy_from_slice(&index_end.to_le_bytes());
        self.data
    }
}

pub fn gbk(text: &str) -> Vec<u8> {
    GBK.encode(text).0.into_owned()
}

/// Parse dotted-quad text into the index integer.
pub fn ip(text: &str) -> u32 {
    u32::from(text.parse::<std::net::Ipv4Addr>().unwrap())
}
