//! Property-based tests for the request generation fence

use crudlist::adapter::PointerAdapter;
use crudlist::config::ApiConfig;
use crudlist::fetcher::{ListFetcher, RequestGeneration};
use proptest::prelude::*;
use std::sync::Arc;

/// Only the latest stamp is accepted, and only while no seal followed it.
#[test]
fn test_only_latest_unsealed_generation_is_accepted() {
    let mut runner = proptest::test_runner::TestRunner::default();

    // true = stamp a new request, false = seal (query changed)
    runner
        .run(&prop::collection::vec(any::<bool>(), 1..40), |ops| {
            let fetcher = ListFetcher::new(
                "https://api.example.test/items",
                true,
                Arc::new(PointerAdapter::new(ApiConfig::default())),
                None,
            );
            let mut issued: Vec<RequestGeneration> = Vec::new();
            let mut sealed = false;

            for stamp in &ops {
                if *stamp {
                    issued.push(fetcher.stamp());
                    sealed = false;
                } else {
                    fetcher.seal();
                    sealed = true;
                }
            }

            for (i, generation) in issued.iter().enumerate() {
                let latest = i == issued.len() - 1;
                prop_assert_eq!(fetcher.accepts(*generation), latest && !sealed);
            }
            Ok(())
        })
        .unwrap();
}
