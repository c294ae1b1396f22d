// Remote Cache Provider
//
// Staging map in front of a volatile, TTL-bounded remote store.
// Reads are fetched once per key; writes are batched until `apply`.

use std::collections::HashMap;

use serde_json::Value;

use crate::codec;
use crate::config::CacheConfig;
use crate::provider::{CacheError, CacheProvider};

pub mod memory;
pub mod store;

pub use memory::InMemoryRemoteStore;
pub use store::RemoteStore;

#[derive(Debug)]
pub struct RemoteCacheProvider<S: RemoteStore> {
    store: S,
    ttl_seconds: u64,
    staged: HashMap<String, Value>,
    pending: Vec<String>,
}

impl<S: RemoteStore> RemoteCacheProvider<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &CacheConfig::default_config())
    }

    pub fn with_config(store: S, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl_seconds: config.remote.ttl_seconds,
            staged: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Keys staged but not yet written, in first-put order.
    pub fn pending_keys(&self) -> &[String] {
        &self.pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load several keys with a single fetch.
    ///
    /// Keys already staged are skipped.
    pub fn prefetch(&mut self, keys: &[&str]) -> Result<(), CacheError> {
        let mut missing: Vec<String> = Vec::new();
        for key in keys {
            if !self.staged.contains_key(*key) && !missing.iter().any(|m| m == key) {
                missing.push(key.to_string());
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        tracing::trace!(keys = missing.len(), "fetching from remote cache");
        let mut found = self.store.fetch_many(&missing)?;

        // Decode everything before staging so a malformed entry stages nothing.
        let mut decoded = Vec::with_capacity(missing.len());
        for key in missing {
            let value = match found.remove(&key) {
                Some(text) => codec::decode(&text).map_err(|source| CacheError::Deserialize {
                    key: key.clone(),
                    source,
                })?,
                None => Value::Null,
            };
            decoded.push((key, value));
        }
        self.staged.extend(decoded);
        Ok(())
    }
}

impl<S: RemoteStore> CacheProvider for RemoteCacheProvider<S> {
    fn get_value(&mut self, key: &str) -> Result<Value, CacheError> {
        if !self.staged.contains_key(key) {
            self.prefetch(&[key])?;
        }
        Ok(self.staged.get(key).cloned().unwrap_or(Value::Null))
    }

    fn put_value(&mut self, key: &str, value: Value) -> Result<(), CacheError> {
        self.staged.insert(key.to_string(), value);
        if !self.pending.iter().any(|k| k == key) {
            self.pending.push(key.to_string());
        }
        Ok(())
    }

    fn apply(&mut self) -> Result<(), CacheError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let entries: HashMap<String, String> = self
            .pending
            .iter()
            .map(|key| {
                let value = self.staged.get(key).unwrap_or(&Value::Null);
                (key.clone(), codec::encode(value))
            })
            .collect();

        tracing::debug!(
            entries = entries.len(),
            ttl_seconds = self.ttl_seconds,
            "writing batch to remote cache"
        );
        self.store.write_many(&entries, self.ttl_seconds)?;

        self.pending.clear();
        Ok(())
    }
}
