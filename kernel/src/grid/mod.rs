// Tabular Cache Provider
//
// Durable cache over a grid of text cells. Column 1 holds the key, the
// remaining columns hold the serialized value split into fixed-width chunks.
// Each key owns one row for the lifetime of the provider.

use std::collections::HashMap;

use serde_json::Value;

use crate::codec;
use crate::config::CacheConfig;
use crate::provider::{CacheError, CacheProvider};

pub mod layout;
pub mod memory;
pub mod store;

pub use layout::DirtyRange;
pub use memory::InMemoryGrid;
pub use store::GridStore;

/// Append-only mapping between keys and 0-based row indices.
///
/// Invariant: `keys[rows[k]] == k` for every known key.
#[derive(Debug, Default)]
struct RowIndex {
    rows: HashMap<String, usize>,
    keys: Vec<String>,
}

impl RowIndex {
    fn position(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    /// Index of `key`, assigning the next free row if it has none.
    fn reserve(&mut self, key: &str) -> usize {
        if let Some(index) = self.position(key) {
            return index;
        }
        let index = self.keys.len();
        self.rows.insert(key.to_string(), index);
        self.keys.push(key.to_string());
        index
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }
}

#[derive(Debug)]
pub struct TabularCacheProvider<G: GridStore> {
    grid: G,
    chunk_size: usize,
    loaded: bool,
    cache: HashMap<String, Value>,
    index: RowIndex,
    pending: Vec<String>,
}

impl<G: GridStore> TabularCacheProvider<G> {
    pub fn new(grid: G) -> Self {
        Self::with_config(grid, &CacheConfig::default_config())
    }

    pub fn with_config(grid: G, config: &CacheConfig) -> Self {
        Self {
            grid,
            chunk_size: config.grid.chunk_size,
            loaded: false,
            cache: HashMap::new(),
            index: RowIndex::default(),
            pending: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Keys staged but not yet written, in first-put order.
    pub fn pending_keys(&self) -> &[String] {
        &self.pending
    }

    /// 0-based row index assigned to `key`, if any.
    pub fn row_of(&self, key: &str) -> Option<usize> {
        self.index.position(key)
    }

    pub fn store(&self) -> &G {
        &self.grid
    }

    pub fn store_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn into_store(self) -> G {
        self.grid
    }

    /// Read the whole grid once.
    ///
    /// Nothing is committed unless every row decodes, so a failed load
    /// can be retried.
    fn ensure_loaded(&mut self) -> Result<(), CacheError> {
        if self.loaded {
            return Ok(());
        }

        let rows = self.grid.read_all()?;
        let mut cache = HashMap::new();
        let mut index = RowIndex::default();
        let mut physical: HashMap<&str, usize> = HashMap::new();
        let mut gap: Option<usize> = None;

        for (offset, row) in rows.iter().enumerate() {
            let row_number = offset + 1;
            let Some((key, chunks)) = row.split_first() else {
                gap.get_or_insert(row_number);
                continue;
            };
            if key.is_empty() {
                gap.get_or_insert(row_number);
                continue;
            }

            // A shifted rewrite leaves the stale copy below the current one.
            if let Some(&first_row) = physical.get(key.as_str()) {
                tracing::warn!(
                    key = %key,
                    first_row,
                    duplicate_row = row_number,
                    "key repeated in grid; keeping the first row"
                );
                continue;
            }
            physical.insert(key, row_number);

            if let Some(gap_row) = gap.take() {
                tracing::warn!(
                    gap_row,
                    next_key = %key,
                    "blank grid row before keyed rows; later rows will shift on rewrite"
                );
            }

            let text = chunks.concat();
            let value = codec::decode(&text).map_err(|source| CacheError::Deserialize {
                key: key.clone(),
                source,
            })?;
            index.reserve(key);
            cache.insert(key.clone(), value);
        }

        tracing::debug!(
            rows = rows.len(),
            keys = index.keys().len(),
            "loaded cache grid"
        );

        self.cache = cache;
        self.index = index;
        self.loaded = true;
        Ok(())
    }
}

impl<G: GridStore> CacheProvider for TabularCacheProvider<G> {
    fn get_value(&mut self, key: &str) -> Result<Value, CacheError> {
        self.ensure_loaded()?;
        Ok(self.cache.get(key).cloned().unwrap_or(Value::Null))
    }

    fn put_value(&mut self, key: &str, value: Value) -> Result<(), CacheError> {
        self.ensure_loaded()?;
        self.cache.insert(key.to_string(), value);
        if !self.pending.iter().any(|k| k == key) {
            self.pending.push(key.to_string());
        }
        self.index.reserve(key);
        Ok(())
    }

    fn apply(&mut self) -> Result<(), CacheError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        for key in &self.pending {
            self.index.reserve(key);
        }

        let Some(range) =
            DirtyRange::covering(self.pending.iter().filter_map(|k| self.index.position(k)))
        else {
            return Ok(());
        };

        // Every row in the range is rewritten, pending or not.
        let rows: Vec<(&str, String)> = self.index.keys()[range.indices()]
            .iter()
            .map(|key| {
                let value = self.cache.get(key).unwrap_or(&Value::Null);
                (key.as_str(), codec::encode(value))
            })
            .collect();
        let block = layout::build_block(&rows, self.chunk_size, self.grid.column_count()?);

        tracing::debug!(
            pending = self.pending.len(),
            start_row = range.start_row(),
            rows = range.row_count(),
            columns = block.columns,
            "rewriting dirty grid range"
        );
        self.grid.write_range(
            range.start_row(),
            1,
            range.row_count(),
            block.columns,
            &block.rows,
        )?;

        self.pending.clear();
        Ok(())
    }
}
