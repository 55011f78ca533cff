//! CLI route: single route table and run context. Drives a `ListController` for each
//! command and hands results to presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_ids, format_page_json, format_page_text};
use crate::config::{ConfigLoader, ListConfig};
use crate::controller::ListController;
use crate::error::{ListError, TransportFailure};
use crate::events::ListEvent;
use crate::query::{FilterClause, Sort, SortDirection};
use crate::selection::{AllMatching, SelectionState};
use crate::types::ItemId;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// Runtime context for CLI execution: the effective configuration.
pub struct RunContext {
    config: ListConfig,
}

impl RunContext {
    /// Load configuration from `dir` (or an explicit file) and apply the endpoint override.
    pub fn new(
        dir: PathBuf,
        config_path: Option<PathBuf>,
        endpoint: Option<String>,
    ) -> Result<Self, ListError> {
        let mut config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&dir)?,
        };
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint;
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, ListError> {
        let started = Instant::now();
        let result = self.execute_inner(command).await;
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, ListError> {
        match command {
            Commands::List {
                keyword,
                filters,
                sort,
                page_size,
                pages,
                format,
            } => {
                self.handle_list(
                    keyword.as_deref(),
                    filters,
                    sort.as_deref(),
                    *page_size,
                    *pages,
                    format,
                )
                .await
            }
            Commands::Ids { keyword, filters } => {
                self.handle_ids(keyword.as_deref(), filters).await
            }
            Commands::Delete { id, yes } => self.handle_delete(id, *yes).await,
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ListError::Configuration(e.to_string())),
        }
    }

    /// Connect and apply the query; the debounced refresh coalesces all of it into one fetch.
    fn open(
        &self,
        keyword: Option<&str>,
        filters: &[String],
        sort: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<(ListController, UnboundedReceiver<ListEvent>), ListError> {
        let controller = ListController::connect(self.config.clone())?;
        let events = controller.subscribe();

        if let Some(size) = page_size {
            controller.set_page_size(size)?;
        }
        if let Some(keyword) = keyword {
            controller.set_keyword(keyword);
        }
        if !filters.is_empty() {
            let clauses = filters
                .iter()
                .map(|raw| parse_filter(raw))
                .collect::<Result<Vec<_>, _>>()?;
            controller.set_filters(clauses);
        }
        if let Some(raw) = sort {
            controller.set_sort(Some(parse_sort(raw)?));
        }
        controller.refresh();
        Ok((controller, events))
    }

    async fn handle_list(
        &self,
        keyword: Option<&str>,
        filters: &[String],
        sort: Option<&str>,
        page_size: Option<u32>,
        pages: u32,
        format: &str,
    ) -> Result<String, ListError> {
        let (controller, mut events) = self.open(keyword, filters, sort, page_size)?;
        let customization = &self.config.customization;
        let mut rendered = Vec::new();

        for page in 0..pages.max(1) {
            if page > 0 && !controller.go_next() {
                debug!(page, "No next page");
                break;
            }
            if let Err(notice) = wait_for_page(&mut events).await {
                // Pages already printed stay useful; a failed first page is an error
                if rendered.is_empty() {
                    return Err(fetch_failed(notice));
                }
                break;
            }
            let snapshot = controller.snapshot();
            rendered.push(if format == "json" {
                format_page_json(&snapshot)?
            } else {
                format_page_text(&snapshot, customization)
            });
        }

        Ok(rendered.join("\n"))
    }

    async fn handle_ids(
        &self,
        keyword: Option<&str>,
        filters: &[String],
    ) -> Result<String, ListError> {
        let (controller, mut events) = self.open(keyword, filters, None, None)?;
        if let Err(notice) = wait_for_page(&mut events).await {
            return Err(fetch_failed(notice));
        }

        controller.select_all_matching()?;
        // Resolves synchronously when pagination is disabled
        if let SelectionState::AllMatching(AllMatching::Resolved(ids)) = controller.selection() {
            return Ok(format_ids(&ids.into_iter().collect::<Vec<_>>()));
        }

        while let Some(event) = events.recv().await {
            match event {
                // The empty announcement of the pending state comes first
                ListEvent::SelectionChanged { ids } => {
                    if controller.selection() != SelectionState::AllMatching(AllMatching::Pending) {
                        return Ok(format_ids(&ids));
                    }
                }
                ListEvent::AllIdsFailed(notice) => {
                    return Err(fetch_failed(notice.message));
                }
                _ => {}
            }
        }
        Err(ListError::NotReady)
    }

    async fn handle_delete(&self, raw_id: &str, yes: bool) -> Result<String, ListError> {
        let id = ItemId::parse(raw_id);
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete item {}?", id))
                .default(false)
                .interact()
                .map_err(|e| ListError::InvalidArgument(format!("Prompt failed: {}", e)))?;
            if !confirmed {
                return Ok("Cancelled.".to_string());
            }
        }

        let controller = ListController::connect(self.config.clone())?;
        controller.delete_item(&id).await?;
        Ok(format!("Deleted item {}", id))
    }
}

fn fetch_failed(message: Option<String>) -> ListError {
    let reason = message.unwrap_or_else(|| "request failed".to_string());
    ListError::Transport(TransportFailure::new(None, Value::Null, reason))
}

/// Wait for the next applied list result. The error side carries the notice message.
async fn wait_for_page(events: &mut UnboundedReceiver<ListEvent>) -> Result<(), Option<String>> {
    while let Some(event) = events.recv().await {
        match event {
            ListEvent::Loaded { .. } => return Ok(()),
            ListEvent::FetchFailed(notice) => return Err(notice.message),
            _ => {}
        }
    }
    Err(None)
}

/// Parse `name=value` into an active filter clause.
pub fn parse_filter(raw: &str) -> Result<FilterClause, ListError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok(FilterClause::new(name.trim(), value.trim()))
        }
        _ => Err(ListError::InvalidArgument(format!(
            "Invalid filter '{}' (expected name=value)",
            raw
        ))),
    }
}

/// Parse `field` or `field:asc|desc`.
pub fn parse_sort(raw: &str) -> Result<Sort, ListError> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, direction)) => (
            field,
            direction
                .parse::<SortDirection>()
                .map_err(ListError::InvalidArgument)?,
        ),
        None => (raw, SortDirection::Asc),
    };
    if field.trim().is_empty() {
        return Err(ListError::InvalidArgument(format!(
            "Invalid sort '{}' (expected field[:asc|desc])",
            raw
        )));
    }
    Ok(Sort::new(field.trim(), direction))
}
