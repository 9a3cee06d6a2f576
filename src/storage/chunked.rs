//! Chunking wrapper for size-limited stores
//!
//! Values longer than `chunk_size` bytes are split across
//! `<key>_chunk_0 .. <key>_chunk_{n-1}` with a `<key>_meta` entry holding
//! `{"chunks": n, "timestamp": ...}`. Reads reassemble by concatenation.
//! Short values are stored under the plain key.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FinanceError;

use super::KeyValueStore;

const META_SUFFIX: &str = "_meta";
const CHUNK_INFIX: &str = "_chunk_";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkMeta {
    chunks: usize,
    timestamp: DateTime<Utc>,
}

fn meta_key(key: &str) -> String {
    format!("{}{}", key, META_SUFFIX)
}

fn chunk_key(key: &str, index: usize) -> String {
    format!("{}{}{}", key, CHUNK_INFIX, index)
}

/// Split on UTF-8 boundaries into pieces of at most `size` bytes
fn split_chunks(value: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

pub struct ChunkedStore<S> {
    inner: S,
    chunk_size: usize,
}

impl<S: KeyValueStore> ChunkedStore<S> {
    pub fn new(inner: S, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn read_meta(&self, key: &str) -> Result<Option<ChunkMeta>, FinanceError> {
        match self.inner.get(&meta_key(key))? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                FinanceError::Storage(format!("Corrupt chunk metadata for '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Number of chunk entries currently present for `key`.
    ///
    /// Falls back to scanning the store when the metadata is unreadable.
    fn existing_chunks(&self, key: &str) -> Result<usize, FinanceError> {
        match self.read_meta(key) {
            Ok(meta) => Ok(meta.map_or(0, |m| m.chunks)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable chunk metadata");
                let prefix = format!("{}{}", key, CHUNK_INFIX);
                let highest = self
                    .inner
                    .keys()?
                    .iter()
                    .filter_map(|k| k.strip_prefix(&prefix)?.parse::<usize>().ok())
                    .max();
                Ok(highest.map_or(0, |i| i + 1))
            }
        }
    }

    fn remove_chunks(&self, key: &str, from: usize, to: usize) -> Result<(), FinanceError> {
        for index in from..to {
            self.inner.remove(&chunk_key(key, index))?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore> KeyValueStore for ChunkedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError> {
        let Some(meta) = self.read_meta(key)? else {
            return self.inner.get(key);
        };

        let mut value = String::new();
        for index in 0..meta.chunks {
            let chunk = self.inner.get(&chunk_key(key, index))?.ok_or_else(|| {
                FinanceError::Storage(format!(
                    "Missing chunk {} of {} for '{}'",
                    index + 1,
                    meta.chunks,
                    key
                ))
            })?;
            value.push_str(&chunk);
        }
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FinanceError> {
        let previous = self.existing_chunks(key)?;

        if value.len() <= self.chunk_size {
            self.inner.set(key, value)?;
            if previous > 0 {
                self.inner.remove(&meta_key(key))?;
                self.remove_chunks(key, 0, previous)?;
            }
            return Ok(());
        }

        let chunks = split_chunks(value, self.chunk_size);
        for (index, chunk) in chunks.iter().enumerate() {
            self.inner.set(&chunk_key(key, index), chunk)?;
        }

        let meta = ChunkMeta {
            chunks: chunks.len(),
            timestamp: Utc::now(),
        };
        let meta_json = serde_json::to_string(&meta)
            .map_err(|e| FinanceError::Storage(format!("Failed to serialize chunk metadata: {}", e)))?;
        self.inner.set(&meta_key(key), &meta_json)?;

        self.remove_chunks(key, chunks.len(), previous)?;
        self.inner.remove(key)?;

        debug!(key, chunks = chunks.len(), bytes = value.len(), "Stored chunked value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), FinanceError> {
        let previous = self.existing_chunks(key)?;
        self.remove_chunks(key, 0, previous)?;
        self.inner.remove(&meta_key(key))?;
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, FinanceError> {
        let raw = self.inner.keys()?;
        let metas: BTreeSet<&str> = raw
            .iter()
            .filter_map(|k| k.strip_suffix(META_SUFFIX))
            .collect();

        let is_chunk = |k: &str| {
            k.rsplit_once(CHUNK_INFIX).is_some_and(|(base, index)| {
                metas.contains(base) && index.parse::<usize>().is_ok()
            })
        };

        let mut keys: BTreeSet<String> = metas.iter().map(|k| k.to_string()).collect();
        keys.extend(
            raw.iter()
                .filter(|k| !k.ends_with(META_SUFFIX) && !is_chunk(k))
                .cloned(),
        );
        Ok(keys.into_iter().collect())
    }
}
