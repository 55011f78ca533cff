//! List Data Fetcher
//!
//! Builds request descriptors from query state, stamps each dispatched list request with a
//! `RequestGeneration`, and turns transport payloads into `FetchResult`s through the
//! response adapter. The generation fence decides at apply time whether a response is
//! still wanted: only the most recently stamped request passes, and a query change seals
//! the fence so that nothing in flight is applied until the next dispatch.

use crate::adapter::{adapt_list_response, ResponseAdapter};
use crate::error::{FetchError, ListError};
use crate::query::QueryState;
use crate::transport::{RequestDescriptor, Transport};
use crate::types::{FetchResult, ItemId};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Monotonic stamp carried by every dispatched list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct GenerationFence {
    issued: u64,
    sealed: bool,
}

/// A dispatched request and the future that resolves it.
pub struct InFlight<T> {
    pub generation: RequestGeneration,
    pub response: BoxFuture<'static, Result<T, FetchError>>,
}

pub struct ListFetcher {
    endpoint: String,
    pagination_enabled: bool,
    adapter: Arc<dyn ResponseAdapter>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    fence: Mutex<GenerationFence>,
}

impl ListFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        pagination_enabled: bool,
        adapter: Arc<dyn ResponseAdapter>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            pagination_enabled,
            adapter,
            transport: RwLock::new(transport),
            fence: Mutex::new(GenerationFence::default()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn adapter(&self) -> &Arc<dyn ResponseAdapter> {
        &self.adapter
    }

    pub fn attach(&self, transport: Arc<dyn Transport>) {
        *self.transport.write() = Some(transport);
    }

    pub fn is_ready(&self) -> bool {
        self.transport.read().is_some()
    }

    pub fn transport(&self) -> Result<Arc<dyn Transport>, ListError> {
        self.transport.read().clone().ok_or(ListError::NotReady)
    }

    pub fn list_request(&self, query: &QueryState) -> RequestDescriptor {
        RequestDescriptor::get(self.endpoint.clone(), query.list_params())
    }

    pub fn all_ids_request(&self, query: &QueryState) -> RequestDescriptor {
        RequestDescriptor::get(format!("{}/allids", self.endpoint), query.all_ids_params())
    }

    /// Issue a new generation; it becomes the only one whose response is applied.
    pub fn stamp(&self) -> RequestGeneration {
        let mut fence = self.fence.lock();
        fence.issued += 1;
        fence.sealed = false;
        RequestGeneration(fence.issued)
    }

    /// Reject every response until the next `stamp`.
    pub fn seal(&self) {
        self.fence.lock().sealed = true;
    }

    pub fn current(&self) -> RequestGeneration {
        RequestGeneration(self.fence.lock().issued)
    }

    pub fn accepts(&self, generation: RequestGeneration) -> bool {
        let fence = self.fence.lock();
        !fence.sealed && generation.0 == fence.issued
    }

    /// Build and dispatch the list request for `query` (parameter assembly and stamping in
    /// one step).
    pub fn do_fetch(&self, query: &QueryState) -> Result<InFlight<FetchResult>, ListError> {
        self.dispatch(self.list_request(query))
    }

    /// Stamp and dispatch an already-built list request.
    pub fn dispatch(&self, request: RequestDescriptor) -> Result<InFlight<FetchResult>, ListError> {
        let transport = self.transport()?;
        let adapter = Arc::clone(&self.adapter);
        let pagination_enabled = self.pagination_enabled;
        let generation = self.stamp();

        debug!(
            generation = generation.as_u64(),
            url = %request.url,
            "Dispatching list request"
        );

        let response = async move {
            let payload = transport.execute(request).await?;
            adapt_list_response(adapter.as_ref(), &payload, pagination_enabled)
                .map_err(FetchError::from)
        }
        .boxed();

        Ok(InFlight {
            generation,
            response,
        })
    }

    /// Dispatch the all-ids request for `query`. Not stamped: selection has its own ticket.
    pub fn fetch_all_ids(
        &self,
        query: &QueryState,
    ) -> Result<BoxFuture<'static, Result<Vec<ItemId>, FetchError>>, ListError> {
        let transport = self.transport()?;
        let adapter = Arc::clone(&self.adapter);
        let request = self.all_ids_request(query);

        debug!(url = %request.url, "Dispatching all-ids request");

        Ok(async move {
            let payload = transport.execute(request).await?;
            adapter.ids(&payload).map_err(FetchError::from)
        }
        .boxed())
    }
}
