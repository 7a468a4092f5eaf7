// Generic record trait for any storable type

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::config::StoreConfig;

/// Core trait that any storable record must implement
pub trait Record: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Loosely-specified input used by add and update
    type Draft;

    /// Unique identifier for this record
    fn id(&self) -> u64;

    /// Collection name for this record type (e.g., "products", "agenda")
    fn collection_name() -> &'static str
    where
        Self: Sized;

    /// Export column names, in order
    fn columns() -> &'static [&'static str]
    where
        Self: Sized;

    /// Read a field by name for filtering, grouping and export
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Text fields checked by a free-text search
    fn search_fields() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Build a record from a draft, substituting defaults and clamping bounds
    ///
    /// `previous` is the last record in store order at the time of the call.
    fn from_draft(id: u64, draft: Self::Draft, previous: Option<&Self>, config: &StoreConfig) -> Self
    where
        Self: Sized;

    /// Build a record from one loosely-typed JSON object
    fn coerce(id: u64, raw: &Map<String, Value>, config: &StoreConfig) -> Self
    where
        Self: Sized;
}

/// Field value types exposed by records
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    /// Numeric view, for range filters and aggregates
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}
