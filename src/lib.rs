//! Crudlist: Client-Side List Controller
//!
//! Drives a paginated, filterable, sortable view over a remote collection. Query changes are
//! debounced into a single fetch, late responses from superseded requests are discarded,
//! pages are walked through opaque server tokens, and selection spans nothing, the current
//! page, or everything matching the query.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod controller;
pub mod delete;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod logging;
pub mod navigator;
pub mod query;
pub mod scheduler;
pub mod selection;
pub mod transport;
pub mod types;
pub mod views;

pub use controller::{ListController, ListControllerBuilder};
pub use error::{ErrorNotice, FetchError, ListError, TransportFailure};
pub use events::ListEvent;
pub use query::{FilterClause, QueryState, Scope, Sort, SortDirection};
pub use selection::SelectionState;
pub use types::{FetchResult, Item, ItemId, PaginationCursor};
