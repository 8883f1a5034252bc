use crate::{DbBytes, Qqwry, QqwryError};
use memmap2::MmapOptions;
use std::{fs::File, io::ErrorKind, path::Path};

impl Qqwry {
    /// Open a database file using memory mapping.
    ///
    /// The file must not be modified while the database is alive.
    ///
    /// 使用内存映射打开数据库文件，数据库存活期间文件不得被修改。
    pub fn open_mmap<P: AsRef<Path>>(db_path: P) -> Result<Self, QqwryError> {
        let db_path = db_path.as_ref();
        let file = File::open(db_path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => QqwryError::DatabaseNotFound(db_path.to_path_buf()),
            _ => QqwryError::DatabaseUnavailable(err),
        })?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        let db = Self::parse(DbBytes::Mmap(mmap))?;
        log::info!(
            "mapped qqwry database from {}: {} records",
            db_path.display(),
            db.record_count()
        );
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::{DbBuilder, ip};
    use std::io::Write;

    #[test]
    fn mapped_database_matches_in_memory() {
        let mut db = DbBuilder::new();
        let a = db.gbk_record("中国", "广东省深圳市");
        let b = db.gbk_record("日本", "CZ88.NET");
        db.index(ip("1.0.0.0"), a);
        db.index(ip("2.0.0.0"), b);
        let bytes = db.build();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let mapped = Qqwry::open_mmap(file.path()).unwrap();
        let memory = Qqwry::from_bytes(bytes).unwrap();
        for addr in ["1.0.0.1", "2.0.0.0", "0.0.0.1", "3.0.0.0"] {
            assert_eq!(mapped.find(addr), memory.find(addr));
        }
        assert_eq!(mapped.find("1.0.0.1").area, "广东省深圳市");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Qqwry::open_mmap(dir.path().join("missing.dat")),
            Err(QqwryError::DatabaseNotFound(_))
        ));
    }
}
