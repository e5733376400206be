// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: provider API, admin API, and status callbacks driven
//! through `TestHarness` against a temp database.

use std::time::Duration;

use serde_json::{Value, json};

use smssink_test_utils::{CallbackSink, TestHarness};

const WAIT: Duration = Duration::from_secs(5);

fn sms() -> Value {
    json!({
        "from": "+15550001111",
        "to": "+15550002222",
        "text": "Hello from the test suite",
        "messaging_profile_id": "profile-123"
    })
}

async fn harness() -> TestHarness {
    TestHarness::builder().build().await.unwrap()
}

#[tokio::test]
async fn e2e_required_fields_are_named() {
    let harness = harness().await;
    for field in ["from", "to", "messaging_profile_id"] {
        let mut body = sms();
        body.as_object_mut().unwrap().remove(field);
        let (status, json) = harness.send_message(&body).await.unwrap();
        assert_eq!(status.as_u16(), 422, "missing {field}");
        assert_eq!(json["errors"][0]["code"], "10005");
        assert_eq!(
            json["errors"][0]["detail"],
            format!("The '{field}' parameter is required.")
        );
    }
    let (_, messages) = harness.admin_get("/api/messages").await.unwrap();
    assert_eq!(messages, json!([]));
}

#[tokio::test]
async fn e2e_only_missing_text_and_media_fails() {
    let harness = harness().await;
    let cases = [
        (json!("hi"), json!(null), 200),
        (json!(null), json!(["https://example.com/a.png"]), 200),
        (json!("hi"), json!(["https://example.com/a.png"]), 200),
        (json!(null), json!(null), 422),
        (json!(""), json!([]), 422),
    ];
    for (text, media, expected) in cases {
        let mut body = sms();
        body["text"] = text.clone();
        body["media_urls"] = media.clone();
        let (status, _) = harness.send_message(&body).await.unwrap();
        assert_eq!(status.as_u16(), expected, "text={text} media={media}");
    }
}

#[tokio::test]
async fn e2e_to_forms_normalize_identically() {
    let harness = harness().await;
    let mut as_array = sms();
    as_array["to"] = json!(["+15550002222"]);

    let (_, single) = harness.send_message(&sms()).await.unwrap();
    let (_, array) = harness.send_message(&as_array).await.unwrap();
    assert_eq!(single["data"]["to"][0]["phone_number"], "+15550002222");
    assert_eq!(array["data"]["to"], single["data"]["to"]);

    let (_, messages) = harness.admin_get("/api/messages").await.unwrap();
    assert_eq!(messages[0]["recipient"], messages[1]["recipient"]);
}

#[tokio::test]
async fn e2e_auth_header_forms() {
    let harness = harness().await;
    let api = || harness.api();
    let message = sms();
    let body = Some(&message);

    for (auth, expected) in [
        (None, 401),
        (Some("Bearer wrong"), 401),
        (Some(""), 401),
        (Some("Bearer test-token"), 200),
        (Some("test-token"), 200),
    ] {
        let (status, json) =
            TestHarness::request(api(), "POST", "/v2/messages", auth, body).await.unwrap();
        assert_eq!(status.as_u16(), expected, "auth={auth:?}");
        if expected == 401 {
            assert_eq!(json["errors"][0]["code"], "10001");
        }
    }
}

#[tokio::test]
async fn e2e_history_round_trip() {
    let harness = harness().await;
    let (status, _) = harness.send_message(&sms()).await.unwrap();
    assert_eq!(status.as_u16(), 200);
    let (status, received) = harness
        .push_inbound(&json!({"from": "+15550002222", "to": "+15550001111", "text": "reply"}))
        .await
        .unwrap();
    assert_eq!(status.as_u16(), 200);
    assert_eq!(received, json!({"status": "received"}));

    let (_, messages) = harness.admin_get("/api/messages").await.unwrap();
    let directions: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["direction"].as_str().unwrap())
        .collect();
    assert_eq!(directions, vec!["inbound", "outbound"]);

    let (_, cleared) = harness.admin_delete("/api/messages").await.unwrap();
    assert_eq!(cleared, json!({"status": "success"}));
    let (_, messages) = harness.admin_get("/api/messages").await.unwrap();
    assert_eq!(messages, json!([]));
}

#[tokio::test]
async fn e2e_sms_and_mms_responses() {
    let harness = harness().await;
    let (_, sms_response) = harness.send_message(&sms()).await.unwrap();
    let data = &sms_response["data"];
    assert_eq!(data["type"], "SMS");
    assert_eq!(data["parts"], 1);
    assert_eq!(data["media"], json!([]));
    assert_eq!(data["direction"], "outbound");
    assert_eq!(data["to"][0]["status"], "queued");

    let mut mms = sms();
    mms["media_urls"] = json!(["https://example.com/cat.jpg"]);
    let (_, mms_response) = harness.send_message(&mms).await.unwrap();
    assert_eq!(mms_response["data"]["type"], "MMS");
    assert_eq!(
        mms_response["data"]["media"],
        json!(["https://example.com/cat.jpg"])
    );
    assert_ne!(mms_response["data"]["id"], data["id"]);
}

#[tokio::test]
async fn e2e_callbacks_arrive_in_order() {
    let harness = harness().await;
    let sink = CallbackSink::accepting().await;

    let mut body = sms();
    body["webhook_url"] = json!(sink.url());
    let (status, response) = harness.send_message(&body).await.unwrap();
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["webhook_url"], sink.url());

    let callbacks = sink.wait_for(2, WAIT).await;
    assert_eq!(callbacks.len(), 2);
    assert_eq!(
        sink.event_types().await,
        vec!["message.sent".to_string(), "message.delivered".to_string()]
    );
    let message_id = &response["data"]["id"];
    for callback in &callbacks {
        assert_eq!(&callback["data"]["payload"]["id"], message_id);
    }
    assert_eq!(callbacks[1]["data"]["payload"]["status"], "delivered");

    // Nothing more arrives after the sequence.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(sink.requests().await.len(), 2);

    let journal = harness.journal_messages().await.unwrap();
    let delivered = journal
        .iter()
        .filter(|m| *m == "Webhook sent successfully")
        .count();
    assert_eq!(delivered, 2);
}

#[tokio::test]
async fn e2e_failover_receives_each_event_once() {
    let harness = harness().await;
    let primary = CallbackSink::responding_with(500).await;
    let failover = CallbackSink::accepting().await;

    let mut body = sms();
    body["webhook_url"] = json!(primary.url());
    body["webhook_failover_url"] = json!(failover.url());
    let (status, _) = harness.send_message(&body).await.unwrap();
    assert_eq!(status.as_u16(), 200);

    let delivered = failover.wait_for(2, WAIT).await;
    assert_eq!(delivered.len(), 2);
    assert_eq!(primary.requests().await.len(), 2);
    assert_eq!(
        failover.event_types().await,
        vec!["message.sent".to_string(), "message.delivered".to_string()]
    );

    let journal = harness.journal_messages().await.unwrap();
    assert!(journal.contains(&"Primary webhook URL failed".to_string()));
    assert!(journal.contains(&"Webhook sent to failover URL".to_string()));
}

#[tokio::test]
async fn e2e_no_webhook_url_means_no_callbacks() {
    let harness = harness().await;
    let sink = CallbackSink::accepting().await;
    let (status, response) = harness.send_message(&sms()).await.unwrap();
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["webhook_url"], "");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(sink.requests().await.is_empty());
}

#[tokio::test]
async fn e2e_rotated_key_persists() {
    let harness = harness().await;
    let (status, _) = harness
        .admin_post("/api/credentials", &json!({"api_key": "rotated"}))
        .await
        .unwrap();
    assert_eq!(status.as_u16(), 200);

    let (status, _) = harness.send_message(&sms()).await.unwrap();
    assert_eq!(status.as_u16(), 401);

    let (status, _) = TestHarness::request(
        harness.api(),
        "POST",
        "/v2/messages",
        Some("Bearer rotated"),
        Some(&sms()),
    )
    .await
    .unwrap();
    assert_eq!(status.as_u16(), 200);
}

#[tokio::test]
async fn e2e_debug_mode_journals_raw_body() {
    let harness = harness().await;
    let (_, settings) = harness
        .admin_post("/api/settings", &json!({"debug_mode": true}))
        .await
        .unwrap();
    assert_eq!(settings["debug_mode"], true);

    harness.send_message(&sms()).await.unwrap();
    let journal = harness.journal_messages().await.unwrap();
    assert!(journal.contains(&"Raw request body received".to_string()));
    assert!(journal.contains(&"Debug mode changed".to_string()));
}

#[tokio::test]
async fn e2e_malformed_json_is_400() {
    let harness = harness().await;
    let (status, json) = TestHarness::request_raw(
        harness.api(),
        "POST",
        "/v2/messages",
        Some("Bearer test-token"),
        Some("{not json".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(status.as_u16(), 400);
    assert!(
        json["errors"][0]["detail"]
            .as_str()
            .unwrap()
            .starts_with("[SmsSink] Invalid JSON payload: ")
    );
}
