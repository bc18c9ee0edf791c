// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Package name tables and the names bound to them.
//!
//! Every string a package refers to lives in its name table. A [`FName`]
//! remembers where it came from:
//! - [`NameOrigin::Bound`] - read from (or added to) a specific table
//! - [`NameOrigin::Dummy`] - created in-process, not yet in any table
//! - [`NameOrigin::Detached`] - no table at all, e.g. freshly deserialized
//!
//! Growing a table is always explicit: [`NameTable::intern`] for new text and
//! [`NameTable::transfer`] for a name that already exists somewhere else.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(u64);

/// Where a name is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrigin {
    /// Present in the table with this id
    Bound(TableId),
    /// Defined in-process; transferable into any table
    Dummy,
    /// Not anchored to any table
    Detached,
}

/// A name reference.
///
/// Equality and hashing look at the text only.
#[derive(Clone)]
pub struct FName {
    value: String,
    origin: NameOrigin,
}

impl FName {
    /// A dummy name, not yet part of any table.
    pub fn dummy(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: NameOrigin::Dummy,
        }
    }

    /// A name with no table behind it.
    pub fn detached(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: NameOrigin::Detached,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> NameOrigin {
        self.origin
    }

    pub fn is_dummy(&self) -> bool {
        self.origin == NameOrigin::Dummy
    }

    /// Whether the name belongs to some table.
    pub fn is_bound(&self) -> bool {
        matches!(self.origin, NameOrigin::Bound(_))
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl PartialEq for FName {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for FName {}

impl Hash for FName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialEq<str> for FName {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for FName {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl fmt::Display for FName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for FName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            NameOrigin::Bound(_) => write!(f, "{:?}", self.value),
            NameOrigin::Dummy => write!(f, "dummy({:?})", self.value),
            NameOrigin::Detached => write!(f, "detached({:?})", self.value),
        }
    }
}

// Names travel as plain strings; anchoring them is the document's job.
impl Serialize for FName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for FName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(FName::detached)
    }
}

/// A package's name table.
#[derive(Debug, Clone)]
pub struct NameTable {
    id: TableId,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl NameTable {
    pub fn new() -> Self {
        Self {
            id: TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)),
            names: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a table from names in their stored order. Duplicates keep their
    /// first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.insert(name.into());
        }
        table
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// Add `value` if absent and return a name bound to this table.
    pub fn intern(&mut self, value: &str) -> FName {
        if !self.index.contains_key(value) {
            self.insert(value.to_string());
        }
        FName {
            value: value.to_string(),
            origin: NameOrigin::Bound(self.id),
        }
    }

    /// Carry a name from another table (or a dummy name) into this one.
    pub fn transfer(&mut self, name: &FName) -> FName {
        self.intern(&name.value)
    }

    /// Whether `name` is anchored to this particular table.
    pub fn owns(&self, name: &FName) -> bool {
        name.origin == NameOrigin::Bound(self.id)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, value: String) {
        if self.index.contains_key(&value) {
            return;
        }
        self.index.insert(value.clone(), self.names.len());
        self.names.push(value);
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Make `candidate` usable in `table`, or fall back.
///
/// A dummy name is always transferred. A detached or empty name is replaced
/// by `fallback`, interned into `table`. Anything else is transferred.
/// The flag is `true` when the fallback was used.
pub fn ensure_name(table: &mut NameTable, candidate: Option<&FName>, fallback: &str) -> (FName, bool) {
    match candidate {
        Some(name) if name.is_dummy() => (table.transfer(name), false),
        Some(name) if name.is_bound() && !name.is_empty() => (table.transfer(name), false),
        _ => (table.intern(fallback), true),
    }
}
