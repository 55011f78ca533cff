//! Integration tests for debounced refresh scheduling

use crate::integration::test_utils::*;
use crudlist::{FilterClause, ListController, ListError, Scope, Sort, SortDirection};

fn empty_page_transport() -> std::sync::Arc<ScriptedTransport> {
    ScriptedTransport::auto(|_| Ok(page(&[], 0, 1, None, None)))
}

#[tokio::test(start_paused = true)]
async fn test_keyword_burst_issues_single_request() {
    let transport = empty_page_transport();
    let controller = controller(config(), transport.clone());

    controller.set_keyword("a");
    advance(100).await;
    controller.set_keyword("ab");
    advance(150).await;
    // 250ms after "a" but only 150ms after "ab"
    assert_eq!(transport.request_count(), 0);

    advance(100).await;
    assert_eq!(transport.request_count(), 1);
    let request = transport.request(0);
    assert_eq!(request.url, ENDPOINT);
    assert_eq!(request.param("keyword"), Some("ab"));
    assert_eq!(request.param("per_page"), Some("50"));

    advance(1_000).await;
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_mutations_coalesce_into_one_request() {
    let transport = empty_page_transport();
    let mut config = config();
    config.scope = Some(Scope::new("projects", "7"));
    let controller = controller(config, transport.clone());

    controller.set_keyword("report");
    controller.set_filters(vec![FilterClause::new("status", "open")]);
    controller.set_sort(Some(Sort::new("name", SortDirection::Desc)));
    controller.set_page_size(25).unwrap();
    advance(250).await;

    assert_eq!(transport.request_count(), 1);
    let request = transport.request(0);
    assert_eq!(request.param("keyword"), Some("report"));
    assert_eq!(request.param("per_page"), Some("25"));
    assert_eq!(request.param("filters[0][name]"), Some("status"));
    assert_eq!(request.param("filters[0][value]"), Some("open"));
    assert_eq!(request.param("filters[0][active]"), Some("true"));
    assert_eq!(request.param("sortField"), Some("name"));
    assert_eq!(request.param("sortDirection"), Some("desc"));
    assert_eq!(request.param("belongsTo"), Some("projects"));
    assert_eq!(request.param("relationId"), Some("7"));
}

#[tokio::test(start_paused = true)]
async fn test_quiet_windows_each_fire() {
    let transport = empty_page_transport();
    let controller = controller(config(), transport.clone());

    controller.set_keyword("first");
    advance(250).await;
    controller.set_keyword("second");
    advance(250).await;

    let keywords: Vec<String> = transport
        .requests()
        .iter()
        .filter_map(|r| r.param("keyword").map(str::to_string))
        .collect();
    assert_eq!(keywords, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn test_detached_controller_waits_for_transport() {
    let controller = ListController::builder(config()).build().unwrap();
    assert!(!controller.is_ready());

    controller.set_keyword("late");
    advance(5_000).await;
    assert!(controller.snapshot().loading);
    assert_eq!(controller.current_generation().as_u64(), 0);

    let transport = empty_page_transport();
    controller.attach(transport.clone());
    settle().await;

    assert!(controller.is_ready());
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.request(0).param("keyword"), Some("late"));
    assert!(!controller.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn test_zero_page_size_is_rejected() {
    let transport = empty_page_transport();
    let controller = controller(config(), transport.clone());

    let err = controller.set_page_size(0).unwrap_err();
    assert!(matches!(err, ListError::InvalidArgument(_)));
    assert_eq!(controller.query().page_size, 50);

    advance(500).await;
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_window_from_config() {
    let transport = empty_page_transport();
    let mut config = config();
    config.debounce_ms = 1_000;
    let controller = controller(config, transport.clone());

    controller.refresh();
    advance(900).await;
    assert_eq!(transport.request_count(), 0);
    advance(200).await;
    assert_eq!(transport.request_count(), 1);
}
