// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Thread-safe, read-mostly registry keyed by name.
//!
//! Parsed schemas are immutable and expensive to load, so they are shared
//! through a registry rather than reloaded per asset.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{PortError, Result};

/// Thread-safe registry of shared values.
///
/// Uses RwLock for concurrent read access with exclusive write access.
pub struct Registry<T> {
    inner: RwLock<HashMap<String, T>>,
}

impl<T> Registry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Register a value under `name`, replacing any previous one.
    pub fn register(&self, name: impl Into<String>, value: T) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        inner.insert(name.into(), value);
        Ok(())
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Result<Option<T>>
    where
        T: Clone,
    {
        let inner = self
            .inner
            .read()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.get(name).cloned())
    }

    /// Get a value by name, building and registering it on first use.
    ///
    /// `load` runs without the lock held; if two callers race, the first
    /// registered value wins and both receive it.
    pub fn get_or_try_insert_with<F>(&self, name: &str, load: F) -> Result<T>
    where
        T: Clone,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.get(name)? {
            return Ok(value);
        }
        let loaded = load()?;
        let mut inner = self
            .inner
            .write()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.entry(name.to_string()).or_insert(loaded).clone())
    }

    /// Check if a value is registered.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.contains_key(name))
    }

    /// Get all registered names.
    pub fn names(&self) -> Result<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.keys().cloned().collect())
    }

    /// Remove a value from the registry.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.remove(name).is_some())
    }

    /// Get the number of registered values.
    pub fn len(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|e| PortError::Other(format!("Registry lock poisoned: {e}")))?;
        Ok(inner.len())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
