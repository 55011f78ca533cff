//! Pagination Navigator
//!
//! Holds the cursor from the last applied fetch and hands out the opaque next/prev token.
//! Only one navigation may be in flight; repeat taps are ignored until it settles.

use crate::fetcher::RequestGeneration;
use crate::types::PaginationCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

#[derive(Debug, Default)]
pub struct PaginationNavigator {
    cursor: Option<PaginationCursor>,
    in_flight: Option<RequestGeneration>,
}

impl PaginationNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<&PaginationCursor> {
        self.cursor.as_ref()
    }

    pub fn is_navigating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has(&self, direction: Direction) -> bool {
        self.token(direction).is_some()
    }

    fn token(&self, direction: Direction) -> Option<&str> {
        let cursor = self.cursor.as_ref()?;
        match direction {
            Direction::Next => cursor.next_token.as_deref(),
            Direction::Prev => cursor.prev_token.as_deref(),
        }
    }

    /// Token to fetch for `direction`, or `None` when absent or a navigation is in flight.
    pub fn target(&self, direction: Direction) -> Option<&str> {
        if self.in_flight.is_some() {
            return None;
        }
        self.token(direction)
    }

    pub fn mark_in_flight(&mut self, generation: RequestGeneration) {
        self.in_flight = Some(generation);
    }

    /// Release the in-flight guard if `generation` is the navigation being waited on.
    pub fn settle(&mut self, generation: RequestGeneration) {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
    }

    pub fn replace(&mut self, cursor: Option<PaginationCursor>) {
        self.cursor = cursor;
    }

    /// Forget the cursor and any pending navigation (the query it belonged to is gone).
    pub fn invalidate(&mut self) {
        self.cursor = None;
        self.in_flight = None;
    }
}
