// Remote Store Abstraction
//
// Defines the contract for a size- and TTL-bounded key/value store.
// Transport, retries and eviction belong to implementations.
//
// This module defines *interfaces only*.

use std::collections::HashMap;

use crate::provider::StoreError;

/// Volatile key/value store used by the remote cache provider.
///
/// Properties required from implementations:
/// - Entries are text
/// - Entries expire after their TTL
/// - A batch write is all-or-nothing
///
/// Implementations own their size ceiling and report violations
/// as `StoreError::EntryTooLarge`.
pub trait RemoteStore {
    /// Fetch several keys at once.
    ///
    /// Absent or expired keys are omitted from the result.
    fn fetch_many(&mut self, keys: &[String]) -> Result<HashMap<String, String>, StoreError>;

    /// Write every entry with the same time-to-live.
    fn write_many(
        &mut self,
        entries: &HashMap<String, String>,
        ttl_seconds: u64,
    ) -> Result<(), StoreError>;
}
