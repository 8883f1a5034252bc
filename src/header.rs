use crate::{
    QqwryError,
    common::{INDEX_LEN, u32_le_from_bytes},
};

/// Length of the fixed file header.
pub const HEADER_LEN: usize = 8;

/// The two index offsets stored at the start of the file.
///
/// 文件头部保存的索引起止偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbHeader {
    /// Byte offset of the first index entry.
    pub index_start: u32,
    /// Byte offset of the last index entry (inclusive).
    pub index_end: u32,
}

impl DbHeader {
    /// Parse the header from the start of the database buffer.
    ///
    /// 从数据库缓冲区开头解析文件头。
    pub fn parse(data: &[u8]) -> Result<Self, QqwryError> {
        if data.len() < HEADER_LEN {
            return Err(QqwryError::MalformedHeader { len: data.len() });
        }
        let index_start =
            u32_le_from_bytes(&data[0..4]).ok_or(QqwryError::MalformedHeader { len: data.len() })?;
        let index_end =
            u32_le_from_bytes(&data[4..8]).ok_or(QqwryError::MalformedHeader { len: data.len() })?;
        if index_end < index_start {
            return Err(QqwryError::InvalidIndexRange {
                start: index_start,
                end: index_end,
            });
        }
        Ok(Self {
            index_start,
            index_end,
        })
    }

    /// Number of index entries, `(end - start) / 7 + 1`.
    ///
    /// 索引记录条数。
    pub fn record_count(&self) -> i64 {
        i64::from((self.index_end - self.index_start) / INDEX_LEN) + 1
    }

    /// Whether the whole index region, including the last entry, lies inside
    /// a buffer of `len` bytes.
    pub fn index_fits(&self, len: usize) -> bool {
        u64::from(self.index_end) + u64::from(INDEX_LEN) <= len as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_little_endian_offsets() {
        let mut data = vec![0u8; 8];
        data[0..4].copy_from_slice(&100u32.to_le_bytes());
        data[4..8].copy_from_slice(&121u32.to_le_bytes());
        let header = DbHeader::parse(&data).unwrap();
        assert_eq!(header.index_start, 100);
        assert_eq!(header.index_end, 121);
        assert_eq!(header.record_count(), 4);
        assert!(!header.index_fits(data.len()));
        assert!(header.index_fits(128));
    }

    #[test]
    fn single_entry_index_counts_one() {
        let mut data = vec![0u8; 8];
        data[0..4].copy_from_slice(&8u32.to_le_bytes());
        data[4..8].copy_from_slice(&8u32.to_le_bytes());
        assert_eq!(DbHeader::parse(&data).unwrap().record_count(), 1);
    }

    #[test]
    fn short_buffer_is_malformed() {
        assert!(matches!(
            DbHeader::parse(&[0u8; 7]),
            Err(QqwryError::MalformedHeader { len: 7 })
        ));
        assert!(matches!(
            DbHeader::parse(&[]),
            Err(QqwryError::MalformedHeader { len: 0 })
        ));
    }

    #[test]
    fn reversed_offsets_are_rejected() {
        let mut data = vec![0u8; 8];
        data[0..4].copy_from_slice(&50u32.to_le_bytes());
        data[4..8].copy_from_slice(&10u32.to_le_bytes());
        assert!(matches!(
            DbHeader::parse(&data),
            Err(QqwryError::InvalidIndexRange { start: 50, end: 10 })
        ));
    }
}
