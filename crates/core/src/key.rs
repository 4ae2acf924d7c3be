// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical lock keys and their mapping onto store fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key component, limited to the scalar types a key-value store accepts
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{}", b),
            KeyValue::Int(n) => write!(f, "{}", n),
            KeyValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Str(s.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(s: String) -> Self {
        KeyValue::Str(s)
    }
}

impl From<i64> for KeyValue {
    fn from(n: i64) -> Self {
        KeyValue::Int(n)
    }
}

impl From<bool> for KeyValue {
    fn from(b: bool) -> Self {
        KeyValue::Bool(b)
    }
}

/// Names the logical resource a critical section protects
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockKey {
    pub partition: KeyValue,
    pub sort: Option<KeyValue>,
}

impl LockKey {
    pub fn new(partition: impl Into<KeyValue>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<KeyValue>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "{}/{}", self.partition, sort),
            None => write!(f, "{}", self.partition),
        }
    }
}

/// Describes which store fields hold the components of a [`LockKey`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub partition_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
}

impl Default for KeySchema {
    fn default() -> Self {
        Self {
            partition_field: "lock_key".to_string(),
            sort_field: None,
        }
    }
}

impl KeySchema {
    pub fn new(partition_field: impl Into<String>) -> Self {
        Self {
            partition_field: partition_field.into(),
            sort_field: None,
        }
    }

    pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    /// Store fields written for a key.
    ///
    /// The sort component is only mapped when the schema names a sort field and
    /// the key carries a sort value. Otherwise it is dropped, so keys differing
    /// only in that component address the same lease.
    pub fn fields(&self, key: &LockKey) -> Vec<(String, KeyValue)> {
        let mut fields = vec![(self.partition_field.clone(), key.partition.clone())];
        if let (Some(field), Some(sort)) = (&self.sort_field, &key.sort) {
            fields.push((field.clone(), sort.clone()));
        }
        fields
    }

    /// Canonical address of the record for a key.
    ///
    /// Each value is tagged with its type and length-prefixed, so distinct field
    /// lists never produce the same address.
    pub fn item_key(&self, key: &LockKey) -> String {
        let mut out = String::new();
        for (field, value) in self.fields(key) {
            let (tag, text) = match &value {
                KeyValue::Bool(b) => ('b', b.to_string()),
                KeyValue::Int(n) => ('i', n.to_string()),
                KeyValue::Str(s) => ('s', s.clone()),
            };
            out.push_str(&format!(
                "{}:{}={}{}:{};",
                field.len(),
                field,
                tag,
                text.len(),
                text
            ));
        }
        out
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
