//! List Views
//!
//! Read-only snapshot of controller state for the view layer, plus the count summary and
//! page report lines it shows above and below the rows.

use crate::config::Customization;
use crate::error::ErrorNotice;
use crate::query::QueryState;
use crate::selection::SelectionState;
use crate::types::{Item, ItemId, PaginationCursor};
use std::fmt;

/// Point-in-time copy of everything the view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub query: QueryState,
    /// Last successfully loaded elements (kept while loading and after errors)
    pub elements: Vec<Item>,
    pub total_count: Option<u64>,
    pub cursor: Option<PaginationCursor>,
    /// A query change or refresh is waiting for its result
    pub loading: bool,
    /// A next/prev request is in flight
    pub navigating: bool,
    pub last_error: Option<ErrorNotice>,
    pub selection: SelectionState,
}

impl ListSnapshot {
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selection.ids()
    }

    /// Loaded, and nothing matched.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.elements.is_empty()
    }

    /// "N items in total. Showing M items per page."
    pub fn count_summary(&self, customization: &Customization) -> Option<String> {
        if customization.hide_count_summary {
            return None;
        }
        let total = self
            .total_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        Some(format!(
            "{} items in total. Showing {} items per page.",
            total, self.query.page_size
        ))
    }

    pub fn page_report(&self, customization: &Customization) -> Option<PageReport> {
        if customization.hide_page_report || customization.disable_pagination {
            return None;
        }
        self.cursor.as_ref().map(|cursor| PageReport {
            current_page: cursor.current_page_marker.clone(),
            has_prev: cursor.prev_token.is_some(),
            has_next: cursor.next_token.is_some(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub current_page: String,
    pub has_prev: bool,
    pub has_next: bool,
}

impl fmt::Display for PageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}", self.current_page)?;
        match (self.has_prev, self.has_next) {
            (true, true) => write!(f, " (prev/next available)"),
            (true, false) => write!(f, " (last page)"),
            (false, true) => write!(f, " (next available)"),
            (false, false) => Ok(()),
        }
    }
}
