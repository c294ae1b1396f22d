// Sheetcache Kernel
//
// Pluggable key/value caching over a volatile remote cache and a durable
// grid store. Writes are staged in memory and flushed in one batch.

pub mod codec;
pub mod config;
pub mod grid;
pub mod provider;
pub mod remote;

pub use config::CacheConfig;
pub use grid::{GridStore, InMemoryGrid, TabularCacheProvider};
pub use provider::{CacheError, CacheProvider, CacheProviderExt, StoreError};
pub use remote::{InMemoryRemoteStore, RemoteCacheProvider, RemoteStore};
