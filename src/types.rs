//! Core value types shared across the controller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Item identity as delivered by the server: either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    /// Parse user input, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => ItemId::Number(n),
            Err(_) => ItemId::Text(raw.trim().to_string()),
        }
    }

    /// Read an identifier out of a JSON value (`5`, `"5"`, `"abc"`).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ItemId::Number),
            Value::String(s) if !s.is_empty() => Some(ItemId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// An opaque record from the collection. Only `id` is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub record: Value,
}

impl Item {
    pub fn from_record(record: Value) -> Option<Self> {
        let id = record.get("id").and_then(ItemId::from_json)?;
        Some(Self { id, record })
    }
}

/// Server-issued navigation position. Tokens are sent back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    pub next_token: Option<String>,
    pub prev_token: Option<String>,
    pub current_page_marker: String,
}

/// Normalized outcome of one successful list fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub elements: Vec<Item>,
    pub total_count: Option<u64>,
    /// Absent when pagination is disabled for the deployment
    pub cursor: Option<PaginationCursor>,
}
