#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Layout persistence for Bastion Planner.
//!
//! Layouts are stored as JSON strings inside a string-keyed store, mirroring
//! how browser builds keep them in local storage. Decoding accepts both the
//! current full payload and the legacy format that was a bare array of
//! ground-level pieces. The [`share`] module additionally offers a compact
//! single-line encoding for clipboard transfer.

use std::{collections::HashMap, error::Error, fmt};

use bastion_core::{LayoutSnapshot, Piece};
use serde::Deserialize;

pub mod share;

/// Store key layouts are saved under unless the caller overrides it.
pub const DEFAULT_LAYOUT_KEY: &str = "bastionBaseLayout";

/// String-keyed storage the persistence layer reads and writes through.
pub trait KeyValueStore {
    /// Retrieves the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Error reported by a key-value store implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Creates a store error carrying the provided message.
    #[must_use]
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store operation failed: {}", self.message)
    }
}

impl Error for StoreError {}

/// In-memory key-value store used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Stored payload shapes accepted by the decoder.
///
/// Early builds persisted a bare array of ground-level pieces; the current
/// format wraps every level plus the base flag in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Full(LayoutSnapshot),
    Legacy(Vec<Piece>),
}

impl StoredLayout {
    fn into_snapshot(self) -> LayoutSnapshot {
        match self {
            Self::Full(snapshot) => snapshot.normalized(),
            Self::Legacy(pieces) => {
                let mut snapshot = LayoutSnapshot::empty();
                snapshot.base_started = !pieces.is_empty();
                snapshot.pieces[0] = pieces;
                snapshot
            }
        }
    }
}

/// Error raised when a stored layout string cannot be parsed.
#[derive(Debug)]
pub struct LayoutDecodeError {
    source: serde_json::Error,
}

impl fmt::Display for LayoutDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse stored layout: {}", self.source)
    }
}

impl Error for LayoutDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Errors that can occur while loading a layout from a store.
#[derive(Debug)]
pub enum LayoutLoadError {
    /// No layout was stored under the requested key.
    Missing {
        /// Key that was probed.
        key: String,
    },
    /// The store failed to service the read.
    Store(StoreError),
    /// The stored string was not a recognizable layout.
    Decode(LayoutDecodeError),
}

impl fmt::Display for LayoutLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "no layout stored under key '{key}'"),
            Self::Store(error) => write!(f, "{error}"),
            Self::Decode(error) => write!(f, "{error}"),
        }
    }
}

impl Error for LayoutLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Store(error) => Some(error),
            Self::Decode(error) => Some(error),
        }
    }
}

/// Serializes a layout into its stored JSON representation.
#[must_use]
pub fn encode_layout(layout: &LayoutSnapshot) -> String {
    serde_json::to_string(layout).expect("layout serialization never fails")
}

/// Parses a stored layout string, accepting the legacy bare-array format.
pub fn decode_layout(value: &str) -> Result<LayoutSnapshot, LayoutDecodeError> {
    let stored: StoredLayout =
        serde_json::from_str(value).map_err(|source| LayoutDecodeError { source })?;
    Ok(stored.into_snapshot())
}

/// Saves a layout into the store under the provided key.
pub fn save_layout<S>(store: &mut S, key: &str, layout: &LayoutSnapshot) -> Result<(), StoreError>
where
    S: KeyValueStore,
{
    store.set(key, &encode_layout(layout))
}

/// Loads the layout stored under the provided key.
pub fn load_layout<S>(store: &S, key: &str) -> Result<LayoutSnapshot, LayoutLoadError>
where
    S: KeyValueStore,
{
    let value = store
        .get(key)
        .map_err(LayoutLoadError::Store)?
        .ok_or_else(|| LayoutLoadError::Missing {
            key: key.to_owned(),
        })?;
    decode_layout(&value).map_err(LayoutLoadError::Decode)
}
