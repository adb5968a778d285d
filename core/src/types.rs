//! Domain types for cleaning calls: categories, inputs, extraction rules and
//! projected outputs.
//!
//! # Design
//! Inputs keep the caller's keys in insertion order (`IndexMap`). The same
//! order drives the outgoing JSON array and the positional matching of the
//! response array, so keys never travel over the wire.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Data category handled by a `/clean/{segment}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanKind {
    Name,
    Phone,
    Passport,
    Email,
    Birthdate,
    Vehicle,
}

impl CleanKind {
    pub const ALL: [CleanKind; 6] = [
        CleanKind::Name,
        CleanKind::Phone,
        CleanKind::Passport,
        CleanKind::Email,
        CleanKind::Birthdate,
        CleanKind::Vehicle,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            CleanKind::Name => "name",
            CleanKind::Phone => "phone",
            CleanKind::Passport => "passport",
            CleanKind::Email => "email",
            CleanKind::Birthdate => "birthdate",
            CleanKind::Vehicle => "vehicle",
        }
    }

    /// Response field read for each item.
    ///
    /// Passports yield `series` alone; callers wanting series and number
    /// together pass their own rule to `Api::clean_with`.
    pub fn result_field(self) -> &'static str {
        match self {
            CleanKind::Name => "result",
            CleanKind::Phone => "phone",
            CleanKind::Passport => "series",
            CleanKind::Email => "email",
            CleanKind::Birthdate => "birthdate",
            CleanKind::Vehicle => "vehicle",
        }
    }

    pub fn default_rule(self) -> ExtractionRule {
        ExtractionRule::field(self.result_field())
    }
}

impl fmt::Display for CleanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Key of one item in a batch: its position in a plain sequence, or the
/// name the caller gave it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Index(index) => write!(f, "{index}"),
            ItemKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ItemKey {
    fn from(index: usize) -> Self {
        ItemKey::Index(index)
    }
}

impl From<&str> for ItemKey {
    fn from(name: &str) -> Self {
        ItemKey::Name(name.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(name: String) -> Self {
        ItemKey::Name(name)
    }
}

/// What the caller submits: one item, or an ordered batch of keyed items.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanInput {
    Single(Value),
    Batch(IndexMap<ItemKey, Value>),
}

impl CleanInput {
    /// Values in the order they are sent.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            CleanInput::Single(value) => vec![value],
            CleanInput::Batch(items) => items.values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CleanInput::Single(_) => 1,
            CleanInput::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for CleanInput {
    fn from(value: &str) -> Self {
        CleanInput::Single(Value::from(value))
    }
}

impl From<String> for CleanInput {
    fn from(value: String) -> Self {
        CleanInput::Single(Value::from(value))
    }
}

/// Arrays become indexed batches and objects keyed batches; anything else is
/// a single item.
impl From<Value> for CleanInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => CleanInput::Batch(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (ItemKey::Index(index), item))
                    .collect(),
            ),
            Value::Object(items) => CleanInput::Batch(
                items
                    .into_iter()
                    .map(|(name, item)| (ItemKey::Name(name), item))
                    .collect(),
            ),
            other => CleanInput::Single(other),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for CleanInput {
    fn from(items: Vec<T>) -> Self {
        CleanInput::Batch(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (ItemKey::Index(index), item.into()))
                .collect(),
        )
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for CleanInput {
    fn from(items: [T; N]) -> Self {
        CleanInput::from(Vec::from(items))
    }
}

impl<K: Into<String>, T: Into<Value>> From<IndexMap<K, T>> for CleanInput {
    fn from(items: IndexMap<K, T>) -> Self {
        CleanInput::Batch(
            items
                .into_iter()
                .map(|(name, item)| (ItemKey::Name(name.into()), item.into()))
                .collect(),
        )
    }
}

/// Projection over the whole parsed response.
pub type ProjectionFn = dyn Fn(&Value) -> Option<Value> + Send + Sync;

/// How a per-item result is derived from the response.
#[derive(Clone)]
pub enum ExtractionRule {
    /// Read this field from the item's response object.
    Field(String),
    /// Compute the value from the entire response, not just the item.
    Projection(Arc<ProjectionFn>),
}

impl ExtractionRule {
    pub fn field(name: impl Into<String>) -> Self {
        ExtractionRule::Field(name.into())
    }

    pub fn projection<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        ExtractionRule::Projection(Arc::new(f))
    }
}

impl fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionRule::Field(name) => f.debug_tuple("Field").field(name).finish(),
            ExtractionRule::Projection(_) => f.write_str("Projection(..)"),
        }
    }
}

/// Projected result. `None` marks an item whose field was absent; that is
/// a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutput {
    Single(Option<Value>),
    Batch(IndexMap<ItemKey, Option<Value>>),
}

impl CleanOutput {
    pub fn single(&self) -> Option<&Value> {
        match self {
            CleanOutput::Single(value) => value.as_ref(),
            CleanOutput::Batch(_) => None,
        }
    }

    pub fn batch(&self) -> Option<&IndexMap<ItemKey, Option<Value>>> {
        match self {
            CleanOutput::Single(_) => None,
            CleanOutput::Batch(items) => Some(items),
        }
    }

    /// Value stored under `key` in a batch result.
    pub fn get(&self, key: impl Into<ItemKey>) -> Option<&Value> {
        self.batch()
            .and_then(|items| items.get(&key.into()))
            .and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        match self {
            CleanOutput::Single(_) => 1,
            CleanOutput::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A projected value together with the raw parsed response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub projected: T,
    pub raw: Value,
}

/// Body of a `/clean` structure request.
#[derive(Debug, Serialize)]
pub(crate) struct StructureRequest<'a> {
    pub structure: &'a Value,
    pub data: &'a Value,
}
