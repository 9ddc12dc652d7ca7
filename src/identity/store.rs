//! Locally persisted session records.
//!
//! The store is a read-only string-keyed lookup from the resolver's point of
//! view. Writers (sign-in, sign-out, the CLI) go through the concrete types.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::identity::IdentityToken;

/// String-keyed lookup of persisted session records.
pub trait SessionStore: Send + Sync {
    /// Raw record stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// Extract the identity token from a demo-user session record.
///
/// The record must be a JSON object whose `id` is a non-empty string or a
/// number. Anything else yields `None`.
pub fn parse_session_record(raw: &str) -> Option<IdentityToken> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Local session record is not JSON");
            return None;
        }
    };

    let id = match value.as_object().and_then(|obj| obj.get("id")) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            tracing::debug!("Local session record has no usable id");
            return None;
        }
    };

    Some(IdentityToken::new(id))
}

/// A thread-safe in-memory session store.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Store a demo-user record for `user_id` under `key`.
    pub fn set_user(&self, key: impl Into<String>, user_id: &str) {
        self.set(key, serde_json::json!({ "id": user_id }).to_string());
    }

    /// Remove a record (sign-out).
    pub fn remove(&self, key: &str) -> Option<String> {
        self.inner.remove(key).map(|(_, v)| v)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }
}

/// A session store backed by a JSON object file on disk.
#[derive(Clone)]
pub struct FileSessionStore {
    records: MemorySessionStore,
    path: PathBuf,
}

impl FileSessionStore {
    /// Load from file if it exists, otherwise start empty.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = MemorySessionStore::new();
        if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            let map: HashMap<String, Value> = serde_json::from_reader(reader)?;

            for (k, v) in map {
                // Records are stored as strings; nested objects are kept as their JSON text.
                let raw = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                records.set(k, raw);
            }
            tracing::info!(path = ?path, count = records.len(), "Loaded session records");
        }
        Ok(Self { records, path })
    }

    /// Save to file.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);

        let map: HashMap<_, _> = self
            .records
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        serde_json::to_writer(writer, &map)?;
        tracing::debug!(path = ?self.path, count = map.len(), "Saved session records");
        Ok(())
    }

    /// In-memory view, for writes.
    pub fn records(&self) -> &MemorySessionStore {
        &self.records
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.records.get(key)
    }
}
