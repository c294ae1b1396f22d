// In-Memory Remote Store
//
// Process-local stand-in for the remote cache service.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::store::RemoteStore;
use crate::provider::StoreError;

/// Per-value ceiling of the hosted script cache.
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 100 * 1024;

#[derive(Debug, Clone)]
struct RemoteEntry {
    text: String,
    ttl_seconds: u64,
    expires_at: Instant,
}

/// Remote store backed by a `HashMap` with real TTL expiry.
#[derive(Debug)]
pub struct InMemoryRemoteStore {
    entries: HashMap<String, RemoteEntry>,
    max_entry_bytes: usize,
    fetch_calls: usize,
    write_calls: usize,
    unavailable: bool,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::with_max_entry_bytes(DEFAULT_MAX_ENTRY_BYTES)
    }

    pub fn with_max_entry_bytes(max_entry_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entry_bytes,
            fetch_calls: 0,
            write_calls: 0,
            unavailable: false,
        }
    }

    /// Store raw text directly, bypassing the size check.
    pub fn insert_raw(&mut self, key: &str, text: &str, ttl_seconds: u64) {
        self.entries.insert(
            key.to_string(),
            RemoteEntry {
                text: text.to_string(),
                ttl_seconds,
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
    }

    /// Raw text of a live entry.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.text.as_str())
    }

    /// TTL the entry was last written with.
    pub fn ttl_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.ttl_seconds)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Make every subsequent call fail until reset.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("remote cache offline".into()));
        }
        Ok(())
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn fetch_many(&mut self, keys: &[String]) -> Result<HashMap<String, String>, StoreError> {
        self.check_available()?;
        self.fetch_calls += 1;

        let now = Instant::now();
        self.entries.retain(|_, e| e.expires_at > now);

        Ok(keys
            .iter()
            .filter_map(|k| self.entries.get(k).map(|e| (k.clone(), e.text.clone())))
            .collect())
    }

    fn write_many(
        &mut self,
        entries: &HashMap<String, String>,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        self.check_available()?;

        // Validate the whole batch before touching any entry.
        for (key, text) in entries {
            if text.len() > self.max_entry_bytes {
                return Err(StoreError::EntryTooLarge {
                    key: key.clone(),
                    size: text.len(),
                    limit: self.max_entry_bytes,
                });
            }
        }

        self.write_calls += 1;
        for (key, text) in entries {
            self.insert_raw(key, text, ttl_seconds);
        }
        Ok(())
    }
}
