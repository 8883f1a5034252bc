//! # QQWry Database Library
//!
//! A Rust library for parsing and querying the legacy QQWry (`qqwry.dat`)
//! IPv4 geolocation database published by cz88.net.
//!
//! ## Features
//! - IPv4 lookups returning the country and area recorded for the containing range.
//! - Binary search directly over the on-disk index, no index is rebuilt at load time.
//! - GBK text decoding, with the `CZ88.NET` placeholder area reported as `未知`.
//! - Lazy, once-only loading for process-wide use through [`LazyQqwry`].
//! - Optional memory-mapped file support (`mmap` feature) and `serde` support (`serde` feature).
//!
//! ## Usage
//!
//! 1. Load the database and query a single address:
//! ```rust,ignore
//! use qqwry::Qqwry;
//!
//! let db = Qqwry::open("path/to/qqwry.dat").expect("Failed to load database");
//! let location = db.find("8.8.8.8");
//! println!("{} {} {}", location.ip, location.country, location.area);
//! ```
//!
//! 2. Query a comma-separated list:
//! ```rust,ignore
//! for (ip, location) in db.find_all("1.2.3.4,8.8.8.8") {
//!     println!("{ip}: {} {}", location.country, location.area);
//! }
//! ```
//!
//! ## Error Handling
//! Only loading can fail:
//! - `DatabaseNotFound`: the database file does not exist.
//! - `DatabaseUnavailable`: the database file could not be read.
//! - `MalformedHeader`: the buffer is too short to hold the 8-byte header.
//! - `InvalidIndexRange`: the header's index end lies before its index start.
//!
//! Lookups never fail. An invalid address or an address outside every range
//! yields a result with empty `country` and `area`.
//!
//! # 纯真 QQWry 解析库
//!
//! 这是一个用于解析和查询纯真 `qqwry.dat` IPv4 地理位置数据库的 Rust 库。
//!
//! ## 功能
//! - 查询 IPv4 地址所在网段的国家与地区信息。
//! - 直接在文件索引区上二分查找，加载时不重建索引。
//! - GBK 文本解码，`CZ88.NET` 占位地区返回 `未知`。
//! - 通过 [`LazyQqwry`] 实现进程级的延迟、一次性加载。
//! - 可选的 mmap 支持（`mmap` feature）与 serde 支持（`serde` feature）。
//!
//! ## 错误处理
//! 仅加载阶段可能失败：
//! - `DatabaseNotFound`: 数据库文件不存在。
//! - `DatabaseUnavailable`: 数据库文件读取失败。
//! - `MalformedHeader`: 数据长度不足 8 字节文件头。
//! - `InvalidIndexRange`: 文件头中的索引结束偏移小于起始偏移。
//!
//! 查询不会失败，非法地址或未命中的地址返回国家、地区均为空的结果。

#[cfg(feature = "mmap")]
use memmap2::Mmap;
use std::{ops::Deref, path::PathBuf};

pub mod common;
pub mod header;
mod lazy;
mod lookup;
mod memory;
#[cfg(feature = "mmap")]
mod mmap;
pub mod search;
pub mod text;
#[cfg(test)]
mod testdb;

pub use header::DbHeader;
pub use lazy::LazyQqwry;
pub use lookup::{DbVersion, IpLocation};
pub use memory::load_database_bytes;
pub use text::UNKNOWN_AREA;

/// Container for database binary data, which can be backed by a `Vec<u8>`
/// or a memory-mapped file when the `mmap` feature is enabled.
#[derive(Debug)]
enum DbBytes {
    Vec(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
}

impl Deref for DbBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        match self {
            DbBytes::Vec(v) => v.as_slice(),
            #[cfg(feature = "mmap")]
            DbBytes::Mmap(m) => m,
        }
    }
}

/// Enum representing possible errors when loading a QQWry database.
///
/// 加载 QQWry 数据库时可能出现的错误。
#[derive(Debug, thiserror::Error)]
pub enum QqwryError {
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),
    #[error("Failed to read the database file: {0}")]
    DatabaseUnavailable(#[from] std::io::Error),
    #[error("Database header is malformed: {len} bytes, need at least 8")]
    MalformedHeader { len: usize },
    #[error("Database index range is invalid: start {start} > end {end}")]
    InvalidIndexRange { start: u32, end: u32 },
    #[error("Invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
}

/// A loaded QQWry database. Immutable after construction and safe to share
/// across threads.
///
/// 已加载的 QQWry 数据库，构造后只读，可在线程间共享。
#[derive(Debug)]
pub struct Qqwry {
    bindata: DbBytes,
    header: DbHeader,
}

impl Qqwry {
    fn parse(bindata: DbBytes) -> Result<Self, QqwryError> {
        let header = DbHeader::parse(&bindata)?;
        if !header.index_fits(bindata.len()) {
            log::warn!(
                "index region [{}, {}] exceeds database size {}",
                header.index_start,
                header.index_end,
                bindata.len()
            );
        }
        log::debug!(
            "parsed qqwry header: index [{}, {}], {} records",
            header.index_start,
            header.index_end,
            header.record_count()
        );
        Ok(Self { bindata, header })
    }

    /// Returns the parsed file header.
    ///
    /// 返回解析后的文件头。
    pub fn header(&self) -> DbHeader {
        self.header
    }

    /// Returns the number of index entries.
    ///
    /// 返回索引记录条数。
    pub fn record_count(&self) -> i64 {
        self.header.record_count()
    }

    /// Returns the raw database bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bindata
    }
}
