//! Response adapters: raw server payload to normalized list data.
//!
//! Deployments shape their responses differently, so the mapping is a trait. The stock
//! `PointerAdapter` reads JSON pointers from `ApiConfig` and understands the common
//! `next_page_url` / `prev_page_url` / `current_page` pagination envelope.

use crate::config::ApiConfig;
use crate::error::ListError;
use crate::types::{FetchResult, Item, ItemId, PaginationCursor};
use serde_json::Value;

/// Pagination data extracted from one list response.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData {
    pub cursor: PaginationCursor,
    pub total_count: Option<u64>,
}

/// Maps raw payloads to list data.
pub trait ResponseAdapter: Send + Sync {
    /// The element records of a list response.
    fn elements(&self, payload: &Value) -> Result<Vec<Item>, ListError>;

    /// Cursor and total count of a list response (paginated deployments only).
    fn page_data(&self, payload: &Value) -> Result<PageData, ListError>;

    /// Identifier list of an all-ids response.
    fn ids(&self, payload: &Value) -> Result<Vec<ItemId>, ListError>;

    /// Human-readable message carried by an error payload.
    fn message(&self, payload: &Value) -> Option<String>;
}

/// Apply an adapter to a list payload.
///
/// With pagination disabled the element count is the total and no cursor is produced.
pub fn adapt_list_response(
    adapter: &dyn ResponseAdapter,
    payload: &Value,
    pagination_enabled: bool,
) -> Result<FetchResult, ListError> {
    let elements = adapter.elements(payload)?;
    if !pagination_enabled {
        let total_count = Some(elements.len() as u64);
        return Ok(FetchResult {
            elements,
            total_count,
            cursor: None,
        });
    }

    let page = adapter.page_data(payload)?;
    Ok(FetchResult {
        elements,
        total_count: page.total_count,
        cursor: Some(page.cursor),
    })
}

/// JSON-pointer driven adapter.
#[derive(Debug, Clone)]
pub struct PointerAdapter {
    api: ApiConfig,
}

impl PointerAdapter {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }

    fn locate<'a>(&self, payload: &'a Value, pointer: &str, what: &str) -> Result<&'a Value, ListError> {
        payload.pointer(pointer).ok_or_else(|| {
            ListError::Decode(format!("{} not found at '{}'", what, pointer))
        })
    }
}

impl From<&ApiConfig> for PointerAdapter {
    fn from(api: &ApiConfig) -> Self {
        Self::new(api.clone())
    }
}

// A page token is a non-empty string; null or "" mean "no such page".
fn token(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn marker(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl ResponseAdapter for PointerAdapter {
    fn elements(&self, payload: &Value) -> Result<Vec<Item>, ListError> {
        let records = self
            .locate(payload, &self.api.elements_path, "element list")?
            .as_array()
            .ok_or_else(|| {
                ListError::Decode(format!(
                    "element list at '{}' is not an array",
                    self.api.elements_path
                ))
            })?;

        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                Item::from_record(record.clone())
                    .ok_or_else(|| ListError::Decode(format!("element {} has no usable id", i)))
            })
            .collect()
    }

    fn page_data(&self, payload: &Value) -> Result<PageData, ListError> {
        let envelope = self.locate(payload, &self.api.pagination_path, "pagination data")?;
        if !envelope.is_object() {
            return Err(ListError::Decode(format!(
                "pagination data at '{}' is not an object",
                self.api.pagination_path
            )));
        }

        let cursor = PaginationCursor {
            next_token: token(envelope.get("next_page_url")),
            prev_token: token(envelope.get("prev_page_url")),
            current_page_marker: marker(envelope.get("current_page")),
        };
        let total_count = if self.api.total_count_path.is_empty() {
            None
        } else {
            payload.pointer(&self.api.total_count_path).and_then(count)
        };

        Ok(PageData {
            cursor,
            total_count,
        })
    }

    fn ids(&self, payload: &Value) -> Result<Vec<ItemId>, ListError> {
        let ids = self
            .locate(payload, &self.api.ids_path, "id list")?
            .as_array()
            .ok_or_else(|| {
                ListError::Decode(format!("id list at '{}' is not an array", self.api.ids_path))
            })?;

        ids.iter()
            .map(|v| {
                ItemId::from_json(v)
                    .ok_or_else(|| ListError::Decode(format!("'{}' is not an identifier", v)))
            })
            .collect()
    }

    fn message(&self, payload: &Value) -> Option<String> {
        if self.api.message_path.is_empty() {
            return None;
        }
        payload
            .pointer(&self.api.message_path)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}
