// Cache Provider Contract
//
// Uniform get/put/apply capability implemented by every backing store.
// Writes are staged in memory and flushed in one batch by `apply`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Failure reported by a backing store collaborator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("entry `{key}` is {size} bytes, limit is {limit}")]
    EntryTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("cell ({row}, {col}) holds {len} UTF-16 units, limit is {limit}")]
    CellTooLarge {
        row: usize,
        col: usize,
        len: usize,
        limit: usize,
    },

    #[error("invalid range: {0}")]
    InvalidRange(String),
}

/// Errors surfaced to callers of a cache provider.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("stored value for `{key}` is malformed: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value for `{key}` cannot be serialized: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value for `{key}` does not match the requested type: {source}")]
    TypeMismatch {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Key/value cache over a backing store.
///
/// Implementations must:
/// - Reflect staged writes in `get_value` before `apply`
/// - Treat unknown keys as null, never as an error
/// - Leave the pending set untouched when `apply` fails
pub trait CacheProvider {
    /// Current value for `key`, `Value::Null` if never set.
    fn get_value(&mut self, key: &str) -> Result<Value, CacheError>;

    /// Stage `value` under `key`. No store write happens here.
    fn put_value(&mut self, key: &str, value: Value) -> Result<(), CacheError>;

    /// Flush every staged write in one batch.
    ///
    /// A no-op when nothing is pending.
    fn apply(&mut self) -> Result<(), CacheError>;
}

/// Typed access over any provider, trait objects included.
pub trait CacheProviderExt: CacheProvider {
    /// Typed read. Null and unknown keys yield `None`.
    fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, CacheError> {
        let value = self.get_value(key)?;
        typed(key, value)
    }

    /// Typed write.
    fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CacheError> {
        let value = untyped(key, value)?;
        self.put_value(key, value)
    }
}

impl<P: CacheProvider + ?Sized> CacheProviderExt for P {}

fn typed<T: DeserializeOwned>(key: &str, value: Value) -> Result<Option<T>, CacheError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| CacheError::TypeMismatch {
            key: key.to_string(),
            source,
        })
}

fn untyped<T: Serialize>(key: &str, value: &T) -> Result<Value, CacheError> {
    serde_json::to_value(value).map_err(|source| CacheError::Serialize {
        key: key.to_string(),
        source,
    })
}
