//! Property-based tests for debounce coalescing

use async_trait::async_trait;
use crudlist::config::ListConfig;
use crudlist::scheduler::{readiness, DebouncedScheduler};
use crudlist::transport::{RequestDescriptor, Transport};
use crudlist::{ListController, TransportFailure};
use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const WINDOW_MS: u64 = 200;

// Gaps stay clear of the exact window edge, where timer and trigger would tie.
fn gap() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..190, 210u64..600]
}

/// Every burst (triggers closer than the window) fires exactly once, with its last value.
#[test]
fn test_bursts_fire_once_with_last_value() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(gap(), 1..20), |gaps| {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            let fired = runtime.block_on(async {
                let (_gate, ready) = readiness(true);
                let scheduler = DebouncedScheduler::new(Duration::from_millis(WINDOW_MS), ready);
                let fired = Arc::new(Mutex::new(Vec::new()));

                for (i, gap) in gaps.iter().enumerate() {
                    let sink = Arc::clone(&fired);
                    scheduler.request_refresh(move || sink.lock().push(i));
                    tokio::time::sleep(Duration::from_millis(*gap)).await;
                }
                tokio::time::sleep(Duration::from_millis(WINDOW_MS * 2)).await;
                let fired = fired.lock().clone();
                fired
            });

            // A trigger fires iff the next one came at least a window later (or never came)
            let expected: Vec<usize> = gaps
                .iter()
                .enumerate()
                .filter(|(i, gap)| *i == gaps.len() - 1 || **gap >= WINDOW_MS)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(fired, expected);
            Ok(())
        })
        .unwrap();
}

#[derive(Default)]
struct Recording {
    requests: Mutex<Vec<RequestDescriptor>>,
}

#[async_trait]
impl Transport for Recording {
    async fn execute(&self, request: RequestDescriptor) -> Result<Value, TransportFailure> {
        self.requests.lock().push(request);
        Ok(json!({"data": {"data": [], "total": 0, "current_page": 1}}))
    }
}

#[derive(Debug, Clone)]
enum Mutation {
    Keyword(String),
    PageSize(u32),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Mutation::Keyword),
        (1u32..200).prop_map(Mutation::PageSize),
    ]
}

/// Mutations spaced under the window reach the server as one GET carrying the final values.
#[test]
fn test_mutation_burst_sends_final_query_once() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec((mutation(), 0u64..190), 1..15),
            |steps| {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .start_paused(true)
                    .build()
                    .unwrap();

                let (requests, query) = runtime.block_on(async {
                    let transport = Arc::new(Recording::default());
                    let controller =
                        ListController::builder(ListConfig::for_endpoint("https://api.example.test/items"))
                            .transport(transport.clone())
                            .build()
                            .unwrap();

                    for (mutation, gap) in &steps {
                        match mutation {
                            Mutation::Keyword(keyword) => controller.set_keyword(keyword.clone()),
                            Mutation::PageSize(size) => controller.set_page_size(*size).unwrap(),
                        }
                        tokio::time::sleep(Duration::from_millis(*gap)).await;
                    }
                    tokio::time::sleep(Duration::from_millis(WINDOW_MS * 2)).await;
                    let requests = transport.requests.lock().clone();
                    (requests, controller.query())
                });

                prop_assert_eq!(requests.len(), 1);
                prop_assert_eq!(requests[0].param("keyword"), Some(query.keyword.as_str()));
                let page_size = query.page_size.to_string();
                prop_assert_eq!(requests[0].param("per_page"), Some(page_size.as_str()));
                Ok(())
            },
        )
        .unwrap();
}
