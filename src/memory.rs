use crate::{DbBytes, Qqwry, QqwryError};
use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

/// Read the whole database file into memory.
///
/// A missing file is reported as [`QqwryError::DatabaseNotFound`], any other
/// I/O failure as [`QqwryError::DatabaseUnavailable`].
///
/// 将数据库文件完整读入内存。
pub fn load_database_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, QqwryError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => QqwryError::DatabaseNotFound(path.to_path_buf()),
        _ => QqwryError::DatabaseUnavailable(err),
    })?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

impl Qqwry {
    /// Open a database file and keep its bytes in memory.
    ///
    /// 打开数据库文件并将其内容保存在内存中。
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, QqwryError> {
        let db_path = db_path.as_ref();
        let db = Self::from_bytes(load_database_bytes(db_path)?)?;
        log::info!(
            "loaded qqwry database from {}: {} records",
            db_path.display(),
            db.record_count()
        );
        Ok(db)
    }

    /// Build from raw bytes of the database file.
    ///
    /// 从数据库文件的原始字节构建。
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, QqwryError> {
        Self::parse(DbBytes::Vec(data))
    }
}
