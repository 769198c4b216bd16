//! Case-insensitive multi-valued header storage.
//!
//! # Responsibilities
//! - Store ordered value lists per header name
//! - Case-insensitive lookup, case-preserving iteration
//! - Shared by request header storage and response header storage
//!
//! # Design Decisions
//! - Lookup key is the lower-cased name; the spelling of the first
//!   insertion is what serialization sees
//! - A name whose last value is removed disappears entirely; no empty
//!   entries persist
//! - Value order is insertion order and survives in-place replacement

use std::collections::HashMap;

use thiserror::Error;

/// Error for header operations that target a missing name or value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// The named header, or the value index within it, does not exist.
    #[error("header or header value not found")]
    NotFound,
}

#[derive(Debug, Clone)]
struct HeaderEntry {
    /// Original spelling of the name, from the first insertion.
    name: String,
    values: Vec<String>,
}

/// Case-insensitive header name → ordered list of values.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: HashMap<String, HeaderEntry>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    /// Appends `value` under `name`, creating the entry if absent.
    ///
    /// Returns the 0-based index of the newly added value.
    pub fn add(&mut self, name: &str, value: impl Into<String>) -> usize {
        let entry = self
            .entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            });
        entry.values.push(value.into());
        entry.values.len() - 1
    }

    /// Overwrites the value at `index` in place.
    pub fn replace(
        &mut self,
        name: &str,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), HeaderError> {
        let entry = self
            .entries
            .get_mut(&name.to_ascii_lowercase())
            .ok_or(HeaderError::NotFound)?;
        let slot = entry.values.get_mut(index).ok_or(HeaderError::NotFound)?;
        *slot = value.into();
        Ok(())
    }

    /// Drops every existing value for `name` and sets exactly one.
    pub fn replace_all(&mut self, name: &str, value: impl Into<String>) {
        let entry = self
            .entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            });
        entry.values.clear();
        entry.values.push(value.into());
    }

    /// Removes the value at `index`, shifting later values down.
    ///
    /// Removing the last value removes the name itself.
    pub fn remove(&mut self, name: &str, index: usize) -> Result<(), HeaderError> {
        let key = name.to_ascii_lowercase();
        let entry = self.entries.get_mut(&key).ok_or(HeaderError::NotFound)?;
        if index >= entry.values.len() {
            return Err(HeaderError::NotFound);
        }
        entry.values.remove(index);
        if entry.values.is_empty() {
            self.entries.remove(&key);
        }
        Ok(())
    }

    /// Removes `name` and all of its values.
    pub fn remove_all(&mut self, name: &str) -> Result<(), HeaderError> {
        self.entries
            .remove(&name.to_ascii_lowercase())
            .map(|_| ())
            .ok_or(HeaderError::NotFound)
    }

    /// The value at `index` under `name`, if both exist.
    pub fn get(&self, name: &str, index: usize) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .and_then(|e| e.values.get(index))
            .map(String::as_str)
    }

    /// Number of values stored under `name`; 0 if absent.
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map_or(0, |e| e.values.len())
    }

    /// Total number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visits every `(name, value)` pair, one item per value.
    ///
    /// A name with three values yields three items, in insertion order.
    /// Name order across different headers is not guaranteed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().flat_map(|e| {
            e.values
                .iter()
                .map(move |v| (e.name.as_str(), v.as_str()))
        })
    }
}
