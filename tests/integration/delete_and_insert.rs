//! Integration tests for item deletion and insert requests

use crate::integration::test_utils::*;
use crudlist::transport::Method;
use crudlist::{ItemId, ListError, ListEvent, TransportFailure};
use serde_json::{json, Value};

fn delete_responder(
    delete_reply: Result<Value, TransportFailure>,
) -> std::sync::Arc<ScriptedTransport> {
    ScriptedTransport::auto(move |request| match request.method {
        Method::Delete => delete_reply.clone(),
        Method::Get => Ok(page(&[1, 2], 2, 1, None, None)),
    })
}

#[tokio::test(start_paused = true)]
async fn test_delete_success_refreshes_list() {
    let transport = delete_responder(Ok(Value::Null));
    let controller = controller(config(), transport.clone());
    let mut events = controller.subscribe();

    controller.delete_item(&ItemId::Number(2)).await.unwrap();

    let request = transport.request(0);
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.url, "https://api.example.test/items/2");
    assert!(request.params.is_empty());

    let events_now = drain(&mut events);
    assert_eq!(
        events_now.first(),
        Some(&ListEvent::DeleteSucceeded {
            id: ItemId::Number(2)
        })
    );

    advance(250).await;
    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.request(1).method, Method::Get);
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, ListEvent::Loaded { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_delete_failure_reports_server_message() {
    let transport = delete_responder(Err(TransportFailure::new(
        Some(409),
        json!({"message": "Item is still referenced"}),
        "status 409",
    )));
    let controller = controller(config(), transport.clone());
    let mut events = controller.subscribe();

    let err = controller
        .delete_item(&ItemId::Text("abc".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ListError::Transport(ref f) if f.status == Some(409)));

    match drain(&mut events).as_slice() {
        [ListEvent::DeleteFailed { id, notice }] => {
            assert_eq!(id, &ItemId::Text("abc".to_string()));
            assert_eq!(notice.message.as_deref(), Some("Item is still referenced"));
        }
        other => panic!("unexpected events {:?}", other),
    }

    // No refresh after a failed delete
    advance(500).await;
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delete_failure_default_message() {
    let transport = delete_responder(Err(TransportFailure::new(
        Some(500),
        json!({"error": true}),
        "status 500",
    )));
    let controller = controller(config(), transport);
    let mut events = controller.subscribe();

    assert!(controller.delete_item(&ItemId::Number(1)).await.is_err());
    match drain(&mut events).as_slice() {
        [ListEvent::DeleteFailed { notice, .. }] => {
            assert_eq!(notice.message.as_deref(), Some("Error on delete"))
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_delete_disabled_by_customization() {
    let transport = delete_responder(Ok(Value::Null));
    let mut config = config();
    config.customization.disable_delete = true;
    let controller = controller(config, transport.clone());

    let err = controller.delete_item(&ItemId::Number(1)).await.unwrap_err();
    assert!(matches!(err, ListError::Disabled("delete")));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_insert_request() {
    let transport = delete_responder(Ok(Value::Null));
    let controller = controller(config(), transport.clone());
    let mut events = controller.subscribe();

    controller.request_insert().unwrap();
    assert_eq!(drain(&mut events), vec![ListEvent::InsertRequested]);

    let mut config = config();
    config.customization.disable_insert = true;
    let disabled = crate::integration::test_utils::controller(config, transport);
    assert!(matches!(
        disabled.request_insert(),
        Err(ListError::Disabled("insert"))
    ));
}
