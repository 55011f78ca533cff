//! View notifications and the in-process bus that fans them out.

use crate::error::ErrorNotice;
use crate::types::ItemId;
use parking_lot::Mutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// Everything the view layer can be told.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// A query change or refresh put the list into its loading state
    LoadingStarted,
    /// A fetch result was applied
    Loaded {
        generation: u64,
        total_count: Option<u64>,
        element_count: usize,
    },
    /// The current fetch failed; previous elements are kept
    FetchFailed(ErrorNotice),
    /// A response arrived for a superseded request and was dropped
    StaleResponseDiscarded { generation: u64, current: u64 },
    /// Selection moved to a new resolved id set (empty when cleared)
    SelectionChanged { ids: Vec<ItemId> },
    /// The all-ids request failed; selection fell back to none
    AllIdsFailed(ErrorNotice),
    DeleteSucceeded { id: ItemId },
    DeleteFailed { id: ItemId, notice: ErrorNotice },
    InsertRequested,
}

impl ListEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ListEvent::LoadingStarted => "loading_started",
            ListEvent::Loaded { .. } => "loaded",
            ListEvent::FetchFailed(_) => "fetch_failed",
            ListEvent::StaleResponseDiscarded { .. } => "stale_response_discarded",
            ListEvent::SelectionChanged { .. } => "selection_changed",
            ListEvent::AllIdsFailed(_) => "all_ids_failed",
            ListEvent::DeleteSucceeded { .. } => "delete_succeeded",
            ListEvent::DeleteFailed { .. } => "delete_failed",
            ListEvent::InsertRequested => "insert_requested",
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<UnboundedSender<ListEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> UnboundedReceiver<ListEvent> {
        let (sender, receiver) = unbounded_channel();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Deliver to every live subscriber; dropped receivers are pruned.
    pub fn emit(&self, event: ListEvent) {
        trace!(event = event.kind(), "Emitting list event");
        self.subscribers
            .lock()
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
