use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::net::Ipv4Addr;

use crate::QqwryError;

/// Length of one index entry: 4-byte start IP followed by a 3-byte record pointer.
pub const INDEX_LEN: u32 = 7;

const REDIRECT_MODE_1: u8 = 0x01;
const REDIRECT_MODE_2: u8 = 0x02;

/// Assemble a little-endian 24-bit integer from the first three bytes.
///
/// Missing bytes are treated as zero.
///
/// 从前三个字节组装小端 24 位整数，缺失字节按 0 处理。
pub fn u24_le_from_bytes(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 3];
    let n = bytes.len().min(3);
    buf[..n].copy_from_slice(&bytes[..n]);
    u32::from(buf[0]) | (u32::from(buf[1]) << 8) | (u32::from(buf[2]) << 16)
}

/// Read a little-endian `u32` from the first four bytes, `None` on a short slice.
///
/// 读取小端 `u32`，长度不足时返回 `None`。
pub fn u32_le_from_bytes(bytes: &[u8]) -> Option<u32> {
    bytes.get(..4).map(LittleEndian::read_u32)
}

/// Read a big-endian `u32` from the first four bytes, `None` on a short slice.
///
/// 读取大端 `u32`，长度不足时返回 `None`。
pub fn u32_be_from_bytes(bytes: &[u8]) -> Option<u32> {
    bytes.get(..4).map(BigEndian::read_u32)
}

/// Tag byte in front of a country or area field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The byte is the first byte of an inline string.
    Direct,
    /// `0x01`: a pointer to a record holding both country and area.
    RedirectToRecord,
    /// `0x02`: a pointer to the string itself.
    RedirectToString,
}

impl From<u8> for Mode {
    fn from(byte: u8) -> Self {
        match byte {
            REDIRECT_MODE_1 => Mode::RedirectToRecord,
            REDIRECT_MODE_2 => Mode::RedirectToString,
            _ => Mode::Direct,
        }
    }
}

/// Random-access reader over an immutable byte buffer.
///
/// Reads are clipped to the buffer; reading past the end yields an empty
/// slice rather than an error.
///
/// 基于只读字节缓冲区的随机访问读取器。越界读取返回空切片而非错误。
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: u64,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Seek without any bounds check.
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Return up to `n` bytes, optionally seeking to `offset` first, and advance
    /// past the bytes actually returned.
    ///
    /// 读取至多 `n` 个字节（可先定位到 `offset`），并按实际读取长度前移。
    pub fn read(&mut self, n: usize, offset: Option<u64>) -> &'a [u8] {
        if let Some(offset) = offset {
            self.set_offset(offset);
        }
        let len = self.data.len() as u64;
        if self.offset >= len {
            return &[];
        }
        let start = self.offset as usize;
        let end = self.offset.saturating_add(n as u64).min(len) as usize;
        self.offset = end as u64;
        &self.data[start..end]
    }

    pub fn read_u8(&mut self, offset: Option<u64>) -> Option<u8> {
        self.read(1, offset).first().copied()
    }

    /// Read the tag byte at `offset`; end of buffer reads as [`Mode::Direct`].
    pub fn read_mode(&mut self, offset: u64) -> Mode {
        self.read_u8(Some(offset)).map_or(Mode::Direct, Mode::from)
    }

    /// Read a 3-byte little-endian pointer at the current offset.
    pub fn read_u24(&mut self) -> u32 {
        u24_le_from_bytes(self.read(3, None))
    }

    /// Read a null-terminated string starting at `offset`.
    ///
    /// The terminator is consumed but not returned. A string running into
    /// the end of the buffer is returned as is.
    ///
    /// 读取以 0 结尾的字符串，结尾的 0 会被跳过但不包含在结果中。
    pub fn read_cstr(&mut self, offset: u64) -> &'a [u8] {
        let rest = self.read(usize::MAX, Some(offset));
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                self.set_offset(offset + nul as u64 + 1);
                &rest[..nul]
            }
            None => rest,
        }
    }
}

/// Parse dotted-quad text into the big-endian integer used by the index.
///
/// The text must contain exactly three `.` separators.
///
/// 将点分十进制 IPv4 文本解析为索引使用的大端整数。
pub fn parse_ipv4(text: &str) -> Result<u32, QqwryError> {
    if text.matches('.').count() != 3 {
        return Err(QqwryError::InvalidAddress(text.to_string()));
    }
    let ip: Ipv4Addr = text
        .parse()
        .map_err(|_| QqwryError::InvalidAddress(text.to_string()))?;
    u32_be_from_bytes(&ip.octets()).ok_or_else(|| QqwryError::InvalidAddress(text.to_string()))
}
