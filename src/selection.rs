//! Selection Coordinator
//!
//! Tri-state selection: nothing, the current page, or everything matching the current
//! query. The all-matching id set may still be on its way from the server (`Pending`); a
//! ticket issued on entry lets the late result be matched against the state it was meant
//! for. Any transition bumps the ticket, so a result arriving after the user (or a query
//! change) moved on is ignored.
//!
//! Every transition returns a [`SelectionChange`] for the caller to announce. Entering
//! `Pending` announces an empty id set; the resolution announces the real one.

use crate::types::{Item, ItemId};
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllMatching {
    Pending,
    Resolved(BTreeSet<ItemId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Page {
        ids: BTreeSet<ItemId>,
    },
    AllMatching(AllMatching),
}

impl SelectionState {
    pub fn kind(&self) -> &'static str {
        match self {
            SelectionState::None => "none",
            SelectionState::Page { .. } => "page",
            SelectionState::AllMatching(AllMatching::Pending) => "all_matching_pending",
            SelectionState::AllMatching(AllMatching::Resolved(_)) => "all_matching",
        }
    }

    /// Resolved ids; empty for `None` and while pending.
    pub fn ids(&self) -> Vec<ItemId> {
        match self {
            SelectionState::Page { ids }
            | SelectionState::AllMatching(AllMatching::Resolved(ids)) => {
                ids.iter().cloned().collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Identifies one all-matching request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket(u64);

/// A settled transition to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub ids: Vec<ItemId>,
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
    epoch: u64,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.state.ids()
    }

    fn transition(&mut self, next: SelectionState) -> SelectionChange {
        self.epoch += 1;
        info!(from = self.state.kind(), to = next.kind(), "Selection changed");
        self.state = next;
        SelectionChange {
            ids: self.state.ids(),
        }
    }

    /// Select the ids of the currently loaded elements.
    pub fn select_page(&mut self, elements: &[Item]) -> SelectionChange {
        let ids = elements.iter().map(|item| item.id.clone()).collect();
        self.transition(SelectionState::Page { ids })
    }

    /// Enter `AllMatching(Pending)`; resolve with the returned ticket.
    pub fn begin_all_matching(&mut self) -> (SelectionTicket, SelectionChange) {
        let change = self.transition(SelectionState::AllMatching(AllMatching::Pending));
        (SelectionTicket(self.epoch), change)
    }

    fn is_pending_for(&self, ticket: SelectionTicket) -> bool {
        ticket.0 == self.epoch
            && matches!(self.state, SelectionState::AllMatching(AllMatching::Pending))
    }

    /// Deliver the all-matching id set. Ignored if the ticket is no longer current.
    pub fn resolve_all_matching(
        &mut self,
        ticket: SelectionTicket,
        ids: impl IntoIterator<Item = ItemId>,
    ) -> Option<SelectionChange> {
        if !self.is_pending_for(ticket) {
            return None;
        }
        let ids = ids.into_iter().collect();
        Some(self.transition(SelectionState::AllMatching(AllMatching::Resolved(ids))))
    }

    /// The all-matching request failed: fall back to `None`. Ignored if superseded.
    pub fn fail_all_matching(&mut self, ticket: SelectionTicket) -> Option<SelectionChange> {
        if !self.is_pending_for(ticket) {
            return None;
        }
        Some(self.transition(SelectionState::None))
    }

    /// Clear to `None`. Returns `None` when nothing was selected.
    pub fn clear(&mut self) -> Option<SelectionChange> {
        if self.state == SelectionState::None {
            return None;
        }
        Some(self.transition(SelectionState::None))
    }

    /// A single item was unchecked. Any aggregate selection then no longer means "all", so
    /// it collapses to `None`; it is never re-derived. The id is not matched against the set,
    /// since row ids and all-ids results may disagree in representation.
    pub fn on_item_deselected(&mut self, id: &ItemId) -> Option<SelectionChange> {
        if self.state == SelectionState::None {
            return None;
        }
        info!(id = %id, "Item deselected during aggregate selection");
        Some(self.transition(SelectionState::None))
    }
}
