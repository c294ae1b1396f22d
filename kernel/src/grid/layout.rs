// Dirty-Range Layout
//
// Pure row and column arithmetic for the tabular provider.
//
// Write policy: every flush rewrites the single contiguous block of rows
// spanning the lowest and highest pending row index. Rows inside that block
// that were not written are rewritten from the in-memory cache. One bounded
// range write is traded for extra rewritten rows; external edits to those
// rows between load and flush are overwritten.

use std::ops::RangeInclusive;

/// Contiguous block of 0-based row indices to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRange {
    pub first: usize,
    pub last: usize,
}

impl DirtyRange {
    /// Smallest range covering every index, `None` if there are none.
    pub fn covering<I>(indices: I) -> Option<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        indices.into_iter().fold(None, |range, index| match range {
            None => Some(Self {
                first: index,
                last: index,
            }),
            Some(r) => Some(Self {
                first: r.first.min(index),
                last: r.last.max(index),
            }),
        })
    }

    pub fn row_count(&self) -> usize {
        self.last - self.first + 1
    }

    /// 1-indexed grid row of the first index.
    pub fn start_row(&self) -> usize {
        self.first + 1
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Length in UTF-16 code units, the unit grid cells are limited in.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Value columns needed for a text of `len` units.
///
/// Exact when no surrogate pair straddles a chunk boundary.
pub fn required_chunks(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}

/// Width of a written block: key column plus the widest value,
/// never narrower than the grid already is.
pub fn column_count(widest_chunks: usize, existing: usize) -> usize {
    (widest_chunks + 1).max(existing)
}

/// Split text into consecutive chunks of at most `chunk_size` UTF-16 units.
///
/// Chunks end on character boundaries, so a surrogate pair that would
/// straddle a boundary starts the next chunk. Empty text has no chunks.
pub fn split_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(required_chunks(text.len(), chunk_size));
    let mut start = 0;
    let mut units = 0;

    for (offset, ch) in text.char_indices() {
        let width = ch.len_utf16();
        if units > 0 && units + width > chunk_size {
            chunks.push(&text[start..offset]);
            start = offset;
            units = 0;
        }
        units += width;
    }
    if units > 0 {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Rows of one range write, all `columns` cells wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub columns: usize,
    pub rows: Vec<Vec<String>>,
}

/// Lay out `(key, text)` pairs as grid rows: key, value chunks, then
/// empty cells up to the block width.
pub fn build_block(entries: &[(&str, String)], chunk_size: usize, existing: usize) -> Block {
    let split: Vec<(&str, Vec<&str>)> = entries
        .iter()
        .map(|(key, text)| (*key, split_chunks(text, chunk_size)))
        .collect();
    let widest = split.iter().map(|(_, chunks)| chunks.len()).max().unwrap_or(0);
    let columns = column_count(widest, existing);

    let rows = split
        .into_iter()
        .map(|(key, chunks)| {
            let mut row = Vec::with_capacity(columns);
            row.push(key.to_string());
            row.extend(chunks.into_iter().map(str::to_string));
            row.resize(columns, String::new());
            row
        })
        .collect();

    Block { columns, rows }
}
