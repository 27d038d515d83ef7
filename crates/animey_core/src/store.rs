//! Keyed repositories: one JSON object per file, or an in-memory map.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::Result;

/// Get/put by opaque key. `put` replaces the whole record for that key.
#[async_trait]
pub trait KeyValueStore<V>: Send + Sync
where
    V: Send + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>>;

    async fn put(&self, key: &str, value: V) -> Result<()>;

    /// Returns whether the key existed.
    async fn remove(&self, key: &str) -> Result<bool>;

    async fn entries(&self) -> Result<Vec<(String, V)>>;
}

/// Store backed by a single pretty-printed JSON object on disk.
///
/// A missing file, or one that is not a JSON object, reads as empty. Records
/// are decoded per key: one that does not fit `V` is skipped on read and
/// written back untouched. Every write rewrites the whole file via a temp
/// file and rename; writers in this process queue on a mutex, writers in
/// other processes still race (last one wins).
pub struct JsonFileStore<V> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _value: PhantomData<fn() -> V>,
}

type RawRecords = BTreeMap<String, Value>;

impl<V> JsonFileStore<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<RawRecords> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&data) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable store file, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn decode(&self, key: &str, raw: Value) -> Option<V> {
        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %self.path.display(), key, error = %e, "skipping malformed record");
                None
            }
        }
    }

    async fn write_raw(&self, map: &RawRecords) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(map)?;
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), records = map.len(), "store written");
        Ok(())
    }
}

/// Sibling temp file, unique per process and per write.
fn tmp_path(path: &Path) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[async_trait]
impl<V> KeyValueStore<V> for JsonFileStore<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        let mut map = self.read_raw().await?;
        Ok(map.remove(key).and_then(|raw| self.decode(key, raw)))
    }

    async fn put(&self, key: &str, value: V) -> Result<()> {
        let raw = serde_json::to_value(value)?;
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_raw().await?;
        map.insert(key.to_string(), raw);
        self.write_raw(&map).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_raw().await?;
        if map.remove(key).is_none() {
            return Ok(false);
        }
        self.write_raw(&map).await?;
        Ok(true)
    }

    async fn entries(&self) -> Result<Vec<(String, V)>> {
        Ok(self
            .read_raw()
            .await?
            .into_iter()
            .filter_map(|(key, raw)| self.decode(&key, raw).map(|v| (key, v)))
            .collect())
    }
}

/// In-process store; nothing survives a restart.
pub struct MemoryStore<V> {
    records: RwLock<BTreeMap<String, V>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> KeyValueStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: V) -> Result<()> {
        self.records.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn entries(&self) -> Result<Vec<(String, V)>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
