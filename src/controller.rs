//! List Controller
//!
//! Owns the query state and wires the scheduler, fetcher, navigator and selection
//! coordinator together behind the mutation API used by the view layer.
//!
//! The controller is a cheap `Clone` handle. All state lives behind one mutex that is never
//! held across an `.await`; the only suspension points are the debounce timer and
//! transport completion. Methods that start work (`set_*`, `refresh`, `go_next`,
//! `go_prev`, `select_all_matching`) spawn onto the ambient tokio runtime and must be
//! called from within one.

use crate::adapter::{PointerAdapter, ResponseAdapter};
use crate::config::ListConfig;
use crate::delete::ItemDeleter;
use crate::error::{ErrorNotice, FetchError, ListError};
use crate::events::{EventBus, ListEvent};
use crate::fetcher::{InFlight, ListFetcher, RequestGeneration};
use crate::navigator::{Direction, PaginationNavigator};
use crate::query::{FilterClause, QueryState, Scope, Sort};
use crate::scheduler::{readiness, DebouncedScheduler, ReadinessGate};
use crate::selection::{SelectionChange, SelectionCoordinator, SelectionState, SelectionTicket};
use crate::transport::{HttpTransport, RequestDescriptor, Transport};
use crate::types::{FetchResult, Item, ItemId};
use crate::views::ListSnapshot;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Query,
    Navigation,
}

impl Origin {
    fn as_str(self) -> &'static str {
        match self {
            Origin::Query => "query",
            Origin::Navigation => "navigation",
        }
    }
}

struct ControllerState {
    query: QueryState,
    elements: Vec<Item>,
    total_count: Option<u64>,
    loading: bool,
    last_error: Option<ErrorNotice>,
    navigator: PaginationNavigator,
    selection: SelectionCoordinator,
    /// Parameters of the last dispatched list request, reused for token navigation
    last_request: Option<RequestDescriptor>,
}

struct Inner {
    config: ListConfig,
    fetcher: ListFetcher,
    scheduler: DebouncedScheduler,
    gate: ReadinessGate,
    deleter: ItemDeleter,
    events: EventBus,
    state: Mutex<ControllerState>,
}

/// Builder for [`ListController`].
pub struct ListControllerBuilder {
    config: ListConfig,
    adapter: Option<Arc<dyn ResponseAdapter>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ListControllerBuilder {
    /// Replace the JSON-pointer adapter derived from `config.api`.
    pub fn adapter(mut self, adapter: Arc<dyn ResponseAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Without a transport the controller starts detached; see [`ListController::attach`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the configuration and build the controller.
    pub fn build(self) -> Result<ListController, ListError> {
        self.config.ensure_valid()?;

        let adapter: Arc<dyn ResponseAdapter> = match self.adapter {
            Some(adapter) => adapter,
            None => Arc::new(PointerAdapter::from(&self.config.api)),
        };
        let (gate, ready) = readiness(self.transport.is_some());
        let fetcher = ListFetcher::new(
            self.config.base_endpoint(),
            !self.config.customization.disable_pagination,
            Arc::clone(&adapter),
            self.transport,
        );
        let deleter = ItemDeleter::new(self.config.base_endpoint(), adapter);
        let scheduler = DebouncedScheduler::new(self.config.debounce_window(), ready);
        let query = QueryState::new(self.config.page_size.initial, self.config.scope.clone());

        info!(
            endpoint = %self.config.base_endpoint(),
            page_size = query.page_size,
            pagination = !self.config.customization.disable_pagination,
            ready = fetcher.is_ready(),
            "List controller created"
        );

        Ok(ListController {
            inner: Arc::new(Inner {
                config: self.config,
                fetcher,
                scheduler,
                gate,
                deleter,
                events: EventBus::new(),
                state: Mutex::new(ControllerState {
                    query,
                    elements: Vec::new(),
                    total_count: None,
                    loading: true,
                    last_error: None,
                    navigator: PaginationNavigator::new(),
                    selection: SelectionCoordinator::new(),
                    last_request: None,
                }),
            }),
        })
    }
}

#[derive(Clone)]
pub struct ListController {
    inner: Arc<Inner>,
}

impl ListController {
    pub fn builder(config: ListConfig) -> ListControllerBuilder {
        ListControllerBuilder {
            config,
            adapter: None,
            transport: None,
        }
    }

    /// Controller talking HTTP to `config.endpoint`.
    pub fn connect(config: ListConfig) -> Result<Self, ListError> {
        let transport = HttpTransport::new(&config.http)?;
        Self::builder(config).transport(Arc::new(transport)).build()
    }

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> UnboundedReceiver<ListEvent> {
        self.inner.events.subscribe()
    }

    /// Supply the transport of a detached controller; a parked refresh proceeds.
    pub fn attach(&self, transport: Arc<dyn Transport>) {
        self.inner.fetcher.attach(transport);
        self.inner.gate.open();
        debug!("Transport attached");
    }

    pub fn is_ready(&self) -> bool {
        self.inner.fetcher.is_ready()
    }

    pub fn current_generation(&self) -> RequestGeneration {
        self.inner.fetcher.current()
    }

    pub fn query(&self) -> QueryState {
        self.inner.state.lock().query.clone()
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.state.lock().selection.state().clone()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.inner.state.lock();
        ListSnapshot {
            query: state.query.clone(),
            elements: state.elements.clone(),
            // Unknown until the pending query answers; kept for display after a failure
            total_count: if state.loading {
                None
            } else {
                state.total_count
            },
            cursor: state.navigator.cursor().cloned(),
            loading: state.loading,
            navigating: state.navigator.is_navigating(),
            last_error: state.last_error.clone(),
            selection: state.selection.state().clone(),
        }
    }

    pub fn set_keyword(&self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.mutate_query("keyword", move |query| query.keyword = keyword);
    }

    pub fn set_filters(&self, filters: Vec<FilterClause>) {
        self.mutate_query("filters", move |query| query.filters = filters);
    }

    pub fn set_sort(&self, sort: Option<Sort>) {
        self.mutate_query("sort", move |query| query.sort = sort);
    }

    pub fn set_page_size(&self, size: u32) -> Result<(), ListError> {
        if size == 0 {
            return Err(ListError::InvalidArgument(
                "page size must be greater than zero".to_string(),
            ));
        }
        self.mutate_query("page_size", move |query| query.page_size = size);
        Ok(())
    }

    pub fn set_scope(&self, scope: Option<Scope>) {
        self.mutate_query("scope", move |query| query.scope = scope);
    }

    /// Requery the current query state from the first page.
    pub fn refresh(&self) {
        self.mutate_query("refresh", |_| {});
    }

    /// Fetch the page behind the next token. No-op (returns false) without a token or while
    /// another navigation is in flight.
    pub fn go_next(&self) -> bool {
        Inner::navigate(&self.inner, Direction::Next)
    }

    pub fn go_prev(&self) -> bool {
        Inner::navigate(&self.inner, Direction::Prev)
    }

    /// Select the ids of the loaded page.
    pub fn select_page(&self) -> Result<(), ListError> {
        self.inner.ensure_selectable()?;
        let mut state = self.inner.state.lock();
        let change = {
            let ControllerState {
                selection,
                elements,
                ..
            } = &mut *state;
            selection.select_page(elements)
        };
        self.inner.announce(change);
        Ok(())
    }

    /// Select every item matching the current keyword, filters and scope.
    ///
    /// With pagination disabled the loaded elements already are "all", so this resolves on
    /// the spot. Otherwise one all-ids request is issued and the selection stays pending
    /// until it answers.
    pub fn select_all_matching(&self) -> Result<(), ListError> {
        self.inner.ensure_selectable()?;
        let mut state = self.inner.state.lock();

        if self.inner.config.customization.disable_pagination {
            let (ticket, pending) = state.selection.begin_all_matching();
            self.inner.announce(pending);
            let ids: Vec<ItemId> = state.elements.iter().map(|item| item.id.clone()).collect();
            if let Some(change) = state.selection.resolve_all_matching(ticket, ids) {
                self.inner.announce(change);
            }
            return Ok(());
        }

        let request = self.inner.fetcher.fetch_all_ids(&state.query)?;
        let (ticket, pending) = state.selection.begin_all_matching();
        self.inner.announce(pending);
        drop(state);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = request.await;
            inner.settle_all_ids(ticket, result);
        });
        Ok(())
    }

    pub fn clear_selection(&self) {
        let mut state = self.inner.state.lock();
        if let Some(change) = state.selection.clear() {
            self.inner.announce(change);
        }
    }

    /// An individual item was unchecked in the view.
    pub fn on_item_deselected(&self, id: &ItemId) {
        let mut state = self.inner.state.lock();
        if let Some(change) = state.selection.on_item_deselected(id) {
            self.inner.announce(change);
        }
    }

    /// Delete one item; on success the list is refreshed.
    pub async fn delete_item(&self, id: &ItemId) -> Result<(), ListError> {
        if self.inner.config.customization.disable_delete {
            return Err(ListError::Disabled("delete"));
        }
        let transport = self.inner.fetcher.transport()?;

        match self.inner.deleter.delete(transport.as_ref(), id).await {
            Ok(()) => {
                self.inner
                    .events
                    .emit(ListEvent::DeleteSucceeded { id: id.clone() });
                self.refresh();
                Ok(())
            }
            Err((err, notice)) => {
                self.inner.events.emit(ListEvent::DeleteFailed {
                    id: id.clone(),
                    notice,
                });
                Err(err)
            }
        }
    }

    /// Ask the surrounding application to open its insert form.
    pub fn request_insert(&self) -> Result<(), ListError> {
        if self.inner.config.customization.disable_insert {
            return Err(ListError::Disabled("insert"));
        }
        self.inner.events.emit(ListEvent::InsertRequested);
        Ok(())
    }

    fn mutate_query(&self, field: &'static str, mutate: impl FnOnce(&mut QueryState)) {
        {
            let mut state = self.inner.state.lock();
            mutate(&mut state.query);
            self.inner.begin_reload(&mut state, field);
        }
        self.request_refresh();
    }

    fn request_refresh(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.request_refresh(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::dispatch_query(&inner);
            }
        });
    }
}

impl Inner {
    fn ensure_selectable(&self) -> Result<(), ListError> {
        if self.config.customization.hide_checkbox_selection {
            return Err(ListError::Disabled("selection"));
        }
        Ok(())
    }

    fn announce(&self, change: SelectionChange) {
        self.events
            .emit(ListEvent::SelectionChanged { ids: change.ids });
    }

    // The cursor and any in-flight response belong to the old query.
    fn begin_reload(&self, state: &mut ControllerState, field: &'static str) {
        state.loading = true;
        state.navigator.invalidate();
        self.fetcher.seal();
        if let Some(change) = state.selection.clear() {
            self.announce(change);
        }
        debug!(
            field,
            keyword = %state.query.keyword,
            page_size = state.query.page_size,
            filters = state.query.filters.len(),
            "Query state changed"
        );
        self.events.emit(ListEvent::LoadingStarted);
    }

    fn notice_for(&self, cause: &ListError) -> ErrorNotice {
        match cause {
            ListError::Transport(failure) => {
                let message = self
                    .fetcher
                    .adapter()
                    .message(&failure.payload)
                    .or_else(|| Some(failure.reason.clone()));
                ErrorNotice::new(failure.payload.clone(), message)
            }
            other => ErrorNotice::new(Value::Null, Some(other.to_string())),
        }
    }

    fn dispatch_query(inner: &Arc<Inner>) {
        let mut state = inner.state.lock();
        let request = inner.fetcher.list_request(&state.query);

        match inner.fetcher.dispatch(request.clone()) {
            Ok(in_flight) => {
                state.last_request = Some(request);
                drop(state);
                Inner::spawn_completion(inner, in_flight, Origin::Query);
            }
            Err(err) => {
                warn!(error = %err, "List request could not be dispatched");
                let notice = inner.notice_for(&err);
                state.loading = false;
                state.last_error = Some(notice.clone());
                inner.events.emit(ListEvent::FetchFailed(notice));
            }
        }
    }

    fn navigate(inner: &Arc<Inner>, direction: Direction) -> bool {
        let mut state = inner.state.lock();
        let Some(token) = state.navigator.target(direction).map(str::to_owned) else {
            debug!(
                direction = direction.as_str(),
                navigating = state.navigator.is_navigating(),
                "Navigation ignored"
            );
            return false;
        };

        let request = match &state.last_request {
            Some(last) => last.redirect(token),
            None => RequestDescriptor::get(token, Vec::new()),
        };
        match inner.fetcher.dispatch(request) {
            Ok(in_flight) => {
                state.navigator.mark_in_flight(in_flight.generation);
                drop(state);
                debug!(direction = direction.as_str(), "Navigating");
                Inner::spawn_completion(inner, in_flight, Origin::Navigation);
                true
            }
            Err(err) => {
                warn!(direction = direction.as_str(), error = %err, "Navigation failed to dispatch");
                false
            }
        }
    }

    fn spawn_completion(inner: &Arc<Inner>, in_flight: InFlight<FetchResult>, origin: Origin) {
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let InFlight {
                generation,
                response,
            } = in_flight;
            let result = response.await;
            inner.apply(generation, result, origin);
        });
    }

    fn apply(
        &self,
        generation: RequestGeneration,
        result: Result<FetchResult, FetchError>,
        origin: Origin,
    ) {
        let mut state = self.state.lock();
        if origin == Origin::Navigation {
            state.navigator.settle(generation);
        }

        if !self.fetcher.accepts(generation) {
            let current = self.fetcher.current();
            debug!(
                generation = generation.as_u64(),
                current = current.as_u64(),
                origin = origin.as_str(),
                "Discarding stale list response"
            );
            self.events.emit(ListEvent::StaleResponseDiscarded {
                generation: generation.as_u64(),
                current: current.as_u64(),
            });
            return;
        }

        state.loading = false;
        match result {
            Ok(result) => {
                info!(
                    generation = generation.as_u64(),
                    origin = origin.as_str(),
                    elements = result.elements.len(),
                    total = ?result.total_count,
                    "List loaded"
                );
                let element_count = result.elements.len();
                state.elements = result.elements;
                state.total_count = result.total_count;
                state.navigator.replace(result.cursor);
                state.last_error = None;
                self.events.emit(ListEvent::Loaded {
                    generation: generation.as_u64(),
                    total_count: state.total_count,
                    element_count,
                });
            }
            Err(err) => {
                warn!(
                    generation = generation.as_u64(),
                    origin = origin.as_str(),
                    error = %err,
                    "List fetch failed; keeping previous elements"
                );
                let notice = self.notice_for(&err.cause);
                state.last_error = Some(notice.clone());
                self.events.emit(ListEvent::FetchFailed(notice));
            }
        }
    }

    fn settle_all_ids(&self, ticket: SelectionTicket, result: Result<Vec<ItemId>, FetchError>) {
        let mut state = self.state.lock();
        match result {
            Ok(ids) => match state.selection.resolve_all_matching(ticket, ids) {
                Some(change) => self.announce(change),
                None => debug!("Discarding superseded all-ids response"),
            },
            Err(err) => {
                warn!(error = %err, "All-ids request failed");
                match state.selection.fail_all_matching(ticket) {
                    Some(change) => {
                        self.announce(change);
                        let notice = self.notice_for(&err.cause);
                        self.events.emit(ListEvent::AllIdsFailed(notice));
                    }
                    None => debug!("Discarding superseded all-ids failure"),
                }
            }
        }
    }
}
