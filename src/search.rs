use crate::{
    common::{ByteCursor, INDEX_LEN, Mode, u24_le_from_bytes, u32_le_from_bytes},
    header::DbHeader,
};

/// Raw country and area bytes of one record, borrowed from the database buffer.
///
/// 记录中的原始国家与地区字节，借用自数据库缓冲区。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawRecord<'a> {
    pub country: &'a [u8],
    pub area: &'a [u8],
}

/// Stride-aligned midpoint between two index offsets, biased toward `start`.
fn middle_offset(start: u32, end: u32) -> u32 {
    let records = ((end - start) / INDEX_LEN) >> 1;
    start + records * INDEX_LEN
}

/// Binary-search the index for the entry whose range contains `ip`.
///
/// Returns the record pointer of that entry, or 0 when `ip` is not covered.
/// The search works on absolute byte offsets. It stops once the bracket has
/// shrunk to two adjacent entries: the lower entry wins when `ip` lies in
/// `[lower, upper)`, the upper entry wins only on an exact hit. Addresses
/// inside the range of the last entry therefore resolve to 0 unless they hit
/// its start exactly.
///
/// 在索引区二分查找包含 `ip` 的记录，返回记录偏移，未命中返回 0。
pub fn search_index(data: &[u8], header: &DbHeader, ip: u32) -> u32 {
    let mut cursor = ByteCursor::new(data);
    let mut start = header.index_start;
    let mut end = header.index_end;

    loop {
        let mid = middle_offset(start, end);
        let entry = cursor.read(INDEX_LEN as usize, Some(u64::from(mid)));
        let Some(mid_ip) = u32_le_from_bytes(entry) else {
            return 0;
        };
        let mid_offset = u24_le_from_bytes(&entry[4..]);

        if end - start == INDEX_LEN {
            let next = cursor.read(INDEX_LEN as usize, Some(u64::from(end)));
            let Some(next_ip) = u32_le_from_bytes(next) else {
                return 0;
            };
            if ip >= mid_ip && ip < next_ip {
                return mid_offset;
            }
            if ip == next_ip {
                return u24_le_from_bytes(&next[4..]);
            }
            return 0;
        }

        if mid == start && mid_ip != ip {
            // bracket cannot shrink any further
            return 0;
        }

        match mid_ip.cmp(&ip) {
            std::cmp::Ordering::Greater => end = mid,
            std::cmp::Ordering::Less => start = mid,
            std::cmp::Ordering::Equal => return mid_offset,
        }
    }
}

/// Follow the mode tags of the record at `offset` to its country and area.
///
/// `offset` points at the record's 4-byte end IP; the first field follows it.
///
/// 按模式字节解析 `offset` 处记录的国家与地区。
pub fn resolve_record(data: &[u8], offset: u32) -> RawRecord<'_> {
    let mut cursor = ByteCursor::new(data);
    let first_field = u64::from(offset) + 4;

    let (country, area_offset) = match cursor.read_mode(first_field) {
        Mode::RedirectToRecord => {
            let redirect = cursor.read_u24();
            if redirect == 0 {
                return RawRecord::default();
            }
            read_field(&mut cursor, u64::from(redirect))
        }
        Mode::RedirectToString | Mode::Direct => read_field(&mut cursor, first_field),
    };
    let (area, _) = read_field(&mut cursor, area_offset);

    RawRecord { country, area }
}

/// Read one field at `offset`, either through a 3-byte pointer or inline.
///
/// Returns the field bytes and the offset right after the field. A zero
/// pointer is an empty field.
fn read_field<'a>(cursor: &mut ByteCursor<'a>, offset: u64) -> (&'a [u8], u64) {
    match cursor.read_mode(offset) {
        Mode::RedirectToRecord | Mode::RedirectToString => {
            let target = cursor.read_u24();
            let bytes = if target == 0 {
                &[][..]
            } else {
                cursor.read_cstr(u64::from(target))
            };
            (bytes, offset + 4)
        }
        Mode::Direct => {
            let bytes = cursor.read_cstr(offset);
            (bytes, offset + bytes.len() as u64 + 1)
        }
    }
}
