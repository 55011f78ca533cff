//! Integration tests for token-based page navigation

use crate::integration::test_utils::*;
use crudlist::{ItemId, ListEvent};
use std::sync::Arc;

const PAGE_2: &str = "https://api.example.test/items?page=2";
const PAGE_1: &str = "https://api.example.test/items?page=1";

fn two_pages() -> Arc<ScriptedTransport> {
    ScriptedTransport::auto(|request| {
        if request.url == PAGE_2 {
            Ok(page(&[3], 3, 2, None, Some(PAGE_1)))
        } else {
            Ok(page(&[1, 2], 3, 1, Some(PAGE_2), None))
        }
    })
}

fn first_ids(controller: &crudlist::ListController) -> Vec<ItemId> {
    controller
        .snapshot()
        .elements
        .iter()
        .map(|item| item.id.clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_go_next_follows_token_with_same_query() {
    let transport = two_pages();
    let controller = controller(config(), transport.clone());

    controller.set_keyword("widgets");
    advance(250).await;
    let cursor = controller.snapshot().cursor.unwrap();
    assert_eq!(cursor.next_token.as_deref(), Some(PAGE_2));
    assert_eq!(cursor.prev_token, None);
    assert!(!controller.go_prev());

    assert!(controller.go_next());
    settle().await;

    let request = transport.request(1);
    assert_eq!(request.url, PAGE_2);
    assert_eq!(request.param("keyword"), Some("widgets"));
    assert_eq!(request.param("per_page"), Some("50"));

    let snapshot = controller.snapshot();
    assert_eq!(first_ids(&controller), vec![ItemId::Number(3)]);
    assert_eq!(snapshot.cursor.as_ref().unwrap().current_page_marker, "2");
    assert!(!snapshot.navigating);
    // Navigation is not a query change
    assert_eq!(snapshot.query.keyword, "widgets");
}

#[tokio::test(start_paused = true)]
async fn test_go_next_without_token_is_a_no_op() {
    let transport = two_pages();
    let controller = controller(config(), transport.clone());

    // Nothing loaded yet
    assert!(!controller.go_next());

    controller.refresh();
    advance(250).await;
    assert!(controller.go_next());
    settle().await;
    assert_eq!(transport.request_count(), 2);

    // Last page
    assert!(!controller.go_next());
    settle().await;
    assert_eq!(transport.request_count(), 2);

    assert!(controller.go_prev());
    settle().await;
    assert_eq!(transport.request(2).url, PAGE_1);
}

#[tokio::test(start_paused = true)]
async fn test_repeat_navigation_ignored_while_in_flight() {
    let transport = ScriptedTransport::manual();
    let controller = controller(config(), transport.clone());

    controller.refresh();
    advance(250).await;
    transport.respond(0, Ok(page(&[1, 2], 4, 1, Some(PAGE_2), None)));
    settle().await;

    assert!(controller.go_next());
    assert!(controller.snapshot().navigating);
    assert!(!controller.go_next());
    settle().await;
    assert_eq!(transport.request_count(), 2);

    transport.respond(1, Ok(page(&[3, 4], 4, 2, None, Some(PAGE_1))));
    settle().await;
    assert!(!controller.snapshot().navigating);
    assert_eq!(first_ids(&controller), vec![ItemId::Number(3), ItemId::Number(4)]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_navigation_releases_guard() {
    let transport = ScriptedTransport::manual();
    let controller = controller(config(), transport.clone());

    controller.refresh();
    advance(250).await;
    transport.respond(0, Ok(page(&[1], 2, 1, Some(PAGE_2), None)));
    settle().await;

    assert!(controller.go_next());
    settle().await;
    transport.respond(1, Err(server_error("gone")));
    settle().await;

    let snapshot = controller.snapshot();
    assert!(!snapshot.navigating);
    assert_eq!(first_ids(&controller), vec![ItemId::Number(1)]);
    assert!(controller.go_next());
}

#[tokio::test(start_paused = true)]
async fn test_query_change_discards_navigation_response() {
    let transport = ScriptedTransport::manual();
    let controller = controller(config(), transport.clone());
    let mut events = controller.subscribe();

    controller.refresh();
    advance(250).await;
    transport.respond(0, Ok(page(&[1, 2], 4, 1, Some(PAGE_2), None)));
    settle().await;

    assert!(controller.go_next());
    settle().await;
    controller.set_keyword("x");

    // The cursor belonged to the old query
    let snapshot = controller.snapshot();
    assert!(snapshot.cursor.is_none());
    assert!(!snapshot.navigating);
    assert!(!controller.go_next());

    transport.respond(1, Ok(page(&[3, 4], 4, 2, None, Some(PAGE_1))));
    settle().await;
    assert_eq!(first_ids(&controller), vec![ItemId::Number(1), ItemId::Number(2)]);
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, ListEvent::StaleResponseDiscarded { .. })));

    advance(250).await;
    assert_eq!(transport.request(2).param("keyword"), Some("x"));
}

#[tokio::test(start_paused = true)]
async fn test_refresh_keeps_elements_but_drops_cursor_and_total() {
    let transport = two_pages();
    let controller = controller(config(), transport.clone());
    let customization = controller.config().customization.clone();

    controller.refresh();
    advance(250).await;
    assert_eq!(controller.snapshot().total_count, Some(3));
    controller.set_keyword("other");

    let snapshot = controller.snapshot();
    assert!(snapshot.loading);
    assert!(snapshot.cursor.is_none());
    assert_eq!(snapshot.elements.len(), 2);
    // The old total does not describe the new query
    assert_eq!(snapshot.total_count, None);
    assert_eq!(
        snapshot.count_summary(&customization).as_deref(),
        Some("? items in total. Showing 50 items per page.")
    );

    advance(250).await;
    assert_eq!(controller.snapshot().total_count, Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_pagination_has_no_cursor() {
    let transport = ScriptedTransport::auto(|_| {
        Ok(serde_json::json!({"data": {"data": [{"id": 1}, {"id": 2}, {"id": 3}]}}))
    });
    let mut config = config();
    config.customization.disable_pagination = true;
    let customization = config.customization.clone();
    let controller = controller(config, transport.clone());

    controller.refresh();
    advance(250).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.total_count, Some(3));
    assert!(snapshot.cursor.is_none());
    assert!(snapshot.page_report(&customization).is_none());
    assert!(!controller.go_next());
    assert_eq!(
        snapshot.count_summary(&customization).as_deref(),
        Some("3 items in total. Showing 50 items per page.")
    );
}
