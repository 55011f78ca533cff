//! Property-based tests for scheduling and staleness guarantees

mod debounce;
mod fence;
