//! Byte Storage Module
//!
//! Named byte records backing the cache store. The filesystem implementation
//! is what the server runs on; the in-memory one backs tests.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

// == Byte Store Trait ==
/// Flat namespace of independently writable byte records.
#[async_trait]
pub trait ByteStore: Send + Sync + fmt::Debug {
    /// Reads a record. A missing record is `Ok(None)`, distinct from an
    /// empty one.
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Creates or replaces a record.
    async fn write(&self, name: &str, data: &[u8]) -> io::Result<()>;

    /// Reports whether a record exists.
    async fn exists(&self, name: &str) -> io::Result<bool>;
}

// == Filesystem Store ==
/// One file per record under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    atomic: bool,
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl FsStore {
    /// Creates a store rooted at `root`. With `atomic` set, each write goes
    /// to a temporary sibling that is renamed over the target, so readers
    /// never see a half-written file.
    pub fn new(root: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            root: root.into(),
            atomic,
        }
    }

    /// Creates the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    async fn write_atomic(&self, target: &Path, name: &str, data: &[u8]) -> io::Result<()> {
        let tmp = self.path(&format!(
            ".{}.{}.{}.tmp",
            name,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(err) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err);
        }
        if let Err(err) = tokio::fs::rename(&tmp, target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl ByteStore for FsStore {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(name)).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, name: &str, data: &[u8]) -> io::Result<()> {
        let target = self.path(name);
        if self.atomic {
            self.write_atomic(&target, name, data).await
        } else {
            tokio::fs::write(target, data).await
        }
    }

    async fn exists(&self, name: &str) -> io::Result<bool> {
        tokio::fs::try_exists(self.path(name)).await
    }
}

// == Memory Store ==
/// Records held in a map; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ByteStore for MemoryStore {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn write(&self, name: &str, data: &[u8]) -> io::Result<()> {
        self.records
            .write()
            .await
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn exists(&self, name: &str) -> io::Result<bool> {
        Ok(self.records.read().await.contains_key(name))
    }
}
