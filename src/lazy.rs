use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use crate::{IpLocation, Qqwry};

/// A database loaded from `path` on first use.
///
/// Concurrent first callers are serialised and the file is read exactly once.
/// A failed load is logged once and leaves the handle without data for its
/// whole lifetime: lookups then return empty results and
/// [`LazyQqwry::record_count`] is 0.
///
/// 首次使用时从 `path` 加载的数据库。加载只进行一次，失败后不再重试，
/// 之后的查询均返回空结果。
#[derive(Debug)]
pub struct LazyQqwry {
    path: PathBuf,
    db: OnceLock<Option<Qqwry>>,
}

impl LazyQqwry {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            db: OnceLock::new(),
        }
    }

    /// Wrap an already loaded database.
    pub fn from_database(db: Qqwry) -> Self {
        Self {
            path: PathBuf::new(),
            db: OnceLock::from(Some(db)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the database, loading it on the first call.
    ///
    /// 返回数据库，首次调用时加载。
    pub fn get(&self) -> Option<&Qqwry> {
        self.db
            .get_or_init(|| match Qqwry::open(&self.path) {
                Ok(db) => Some(db),
                Err(err) => {
                    log::error!(
                        "qqwry database {} unavailable: {err}",
                        self.path.display()
                    );
                    None
                }
            })
            .as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }

    /// Number of index entries, 0 when no data could be loaded.
    pub fn record_count(&self) -> i64 {
        self.get().map_or(0, Qqwry::record_count)
    }

    /// See [`Qqwry::find`].
    pub fn find(&self, ip: &str) -> IpLocation {
        match self.get() {
            Some(db) => db.find(ip),
            None => IpLocation::empty(ip),
        }
    }

    /// See [`Qqwry::find_all`].
    pub fn find_all(&self, ips: &str) -> HashMap<String, IpLocation> {
        match self.get() {
            Some(db) => db.find_all(ips),
            None => ips
                .split(',')
                .map(|ip| (ip.to_string(), IpLocation::empty(ip)))
                .collect(),
        }
    }
}
