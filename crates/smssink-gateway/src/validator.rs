// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization and field checks for outbound sends.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. `Authorization` header present
//! 2. token matches the stored API key
//! 3. `from` non-empty
//! 4. `to` non-empty after normalization
//! 5. `messaging_profile_id` non-empty
//! 6. `text` or `media_urls` non-empty

use smssink_core::MessageType;

use crate::error::ApiError;
use crate::request::{SendMessageRequest, normalize_to};

/// A send request that passed every rule, with `to` resolved to one number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage {
    pub from: String,
    pub to: String,
    pub text: Option<String>,
    pub media_urls: Vec<String>,
    pub messaging_profile_id: String,
    pub message_type: MessageType,
    pub webhook_url: Option<String>,
    pub webhook_failover_url: Option<String>,
    pub use_profile_webhooks: Option<bool>,
}

/// Strip a `Bearer ` or `Basic ` scheme; anything else is the raw key.
pub fn extract_token(header: &str) -> &str {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Basic "))
        .unwrap_or(header)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Check `request` against the rules above.
pub fn validate(
    auth_header: Option<&str>,
    request: &SendMessageRequest,
    stored_key: &str,
) -> Result<ValidatedMessage, ApiError> {
    let Some(header) = auth_header.filter(|h| !h.is_empty()) else {
        return Err(ApiError::unauthorized("Authorization header is required."));
    };
    if extract_token(header) != stored_key {
        return Err(ApiError::unauthorized("Invalid API key."));
    }

    let Some(from) = non_empty(request.from.as_ref()) else {
        return Err(ApiError::invalid_parameter(
            "The 'from' parameter is required.",
        ));
    };

    let to = normalize_to(request.to.as_ref());
    if to.is_empty() {
        return Err(ApiError::invalid_parameter("The 'to' parameter is required."));
    }

    let Some(profile) = non_empty(request.messaging_profile_id.as_ref()) else {
        return Err(ApiError::invalid_parameter(
            "The 'messaging_profile_id' parameter is required.",
        ));
    };

    let text = non_empty(request.text.as_ref()).map(str::to_string);
    let media_urls = request.media_urls.clone().unwrap_or_default();
    if text.is_none() && media_urls.is_empty() {
        return Err(ApiError::invalid_parameter(
            "Either 'text' or 'media_urls' parameter is required.",
        ));
    }

    Ok(ValidatedMessage {
        from: from.to_string(),
        to: to.to_string(),
        text,
        message_type: MessageType::classify(&media_urls),
        media_urls,
        messaging_profile_id: profile.to_string(),
        webhook_url: non_empty(request.webhook_url.as_ref()).map(str::to_string),
        webhook_failover_url: non_empty(request.webhook_failover_url.as_ref())
            .map(str::to_string),
        use_profile_webhooks: request.use_profile_webhooks,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    const KEY: &str = "test-token";

    fn request(json: serde_json::Value) -> SendMessageRequest {
        serde_json::from_value(json).unwrap()
    }

    fn full() -> serde_json::Value {
        serde_json::json!({
            "from": "+15550001111",
            "to": "+15550002222",
            "text": "hello",
            "messaging_profile_id": "profile-1"
        })
    }

    fn rejection(auth: Option<&str>, body: serde_json::Value) -> ApiError {
        validate(auth, &request(body), KEY).unwrap_err()
    }

    #[test]
    fn token_extraction() {
        assert_eq!(extract_token("Bearer abc"), "abc");
        assert_eq!(extract_token("Basic abc"), "abc");
        assert_eq!(extract_token("abc"), "abc");
        assert_eq!(extract_token("bearer abc"), "bearer abc");
    }

    #[test]
    fn accepts_bearer_basic_and_raw_keys() {
        for header in ["Bearer test-token", "Basic test-token", "test-token"] {
            assert!(validate(Some(header), &request(full()), KEY).is_ok(), "{header}");
        }
    }

    #[test]
    fn missing_or_empty_auth_header() {
        for auth in [None, Some("")] {
            let err = rejection(auth, full());
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.code, "10001");
            assert_eq!(err.detail, "Authorization header is required.");
        }
    }

    #[test]
    fn wrong_key() {
        let err = rejection(Some("Bearer nope"), full());
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.detail, "Invalid API key.");
    }

    #[test]
    fn auth_is_checked_before_fields() {
        let err = rejection(None, serde_json::json!({}));
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn each_required_field_is_named() {
        let cases = [
            ("from", "The 'from' parameter is required."),
            ("to", "The 'to' parameter is required."),
            (
                "messaging_profile_id",
                "The 'messaging_profile_id' parameter is required.",
            ),
        ];
        for (field, detail) in cases {
            let mut body = full();
            body.as_object_mut().unwrap().remove(field);
            let err = rejection(Some(KEY), body);
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
            assert_eq!(err.code, "10005");
            assert_eq!(err.title, "Invalid parameter");
            assert_eq!(err.detail, detail);
        }
    }

    #[test]
    fn first_failing_rule_wins() {
        let err = rejection(Some(KEY), serde_json::json!({}));
        assert_eq!(err.detail, "The 'from' parameter is required.");
        let err = rejection(Some(KEY), serde_json::json!({"from": "+1", "to": []}));
        assert_eq!(err.detail, "The 'to' parameter is required.");
    }

    #[test]
    fn only_missing_text_and_media_fails() {
        let mut body = full();
        body.as_object_mut().unwrap().remove("text");
        let err = rejection(Some(KEY), body.clone());
        assert_eq!(
            err.detail,
            "Either 'text' or 'media_urls' parameter is required."
        );

        body["text"] = serde_json::json!("");
        body["media_urls"] = serde_json::json!([]);
        assert!(validate(Some(KEY), &request(body.clone()), KEY).is_err());

        body["media_urls"] = serde_json::json!(["https://x/a.jpg"]);
        let ok = validate(Some(KEY), &request(body.clone()), KEY).unwrap();
        assert_eq!(ok.message_type, MessageType::Mms);
        assert!(ok.text.is_none());

        body["text"] = serde_json::json!("both");
        let ok = validate(Some(KEY), &request(body), KEY).unwrap();
        assert_eq!(ok.message_type, MessageType::Mms);
    }

    #[test]
    fn text_only_is_sms() {
        let ok = validate(Some(KEY), &request(full()), KEY).unwrap();
        assert_eq!(ok.message_type, MessageType::Sms);
        assert!(ok.media_urls.is_empty());
        assert_eq!(ok.to, "+15550002222");
    }

    #[test]
    fn empty_webhook_urls_are_dropped() {
        let mut body = full();
        body["webhook_url"] = serde_json::json!("");
        body["webhook_failover_url"] = serde_json::json!("http://backup");
        let ok = validate(Some(KEY), &request(body), KEY).unwrap();
        assert!(ok.webhook_url.is_none());
        assert_eq!(ok.webhook_failover_url.as_deref(), Some("http://backup"));
    }
}
