// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider-style error envelope: `{"errors":[{"code","title","detail"}]}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

pub const CODE_INTERNAL: &str = "10000";
pub const CODE_UNAUTHORIZED: &str = "10001";
pub const CODE_METHOD_NOT_ALLOWED: &str = "10003";
pub const CODE_INVALID_PARAMETER: &str = "10005";

/// A single entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorObject>,
}

/// An HTTP-facing failure rendered as the provider error envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} {code}: {detail}", status.as_u16())]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub title: &'static str,
    pub detail: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            title,
            detail: detail.into(),
        }
    }

    /// 401, code `10001`.
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, "Unauthorized", detail)
    }

    /// 422, code `10005`.
    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            CODE_INVALID_PARAMETER,
            "Invalid parameter",
            detail,
        )
    }

    /// 400, code `10005`: unparseable or structurally incomplete bodies.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_PARAMETER,
            "Invalid parameter",
            detail,
        )
    }

    /// 500, code `10000`.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL,
            "Internal Server Error",
            detail,
        )
    }

    /// 405, code `10003`.
    pub fn method_not_allowed(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            CODE_METHOD_NOT_ALLOWED,
            "Method not allowed",
            detail,
        )
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            errors: vec![ErrorObject {
                code: self.code.to_string(),
                title: self.title.to_string(),
                detail: self.detail.clone(),
            }],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_status_and_code() {
        let err = ApiError::invalid_parameter("The 'to' parameter is required.");
        assert_eq!(err.to_string(), "422 10005: The 'to' parameter is required.");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn envelope_shape() {
        let err = ApiError::invalid_parameter("The 'to' parameter is required.");
        let json = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errors": [{
                "code": "10005",
                "title": "Invalid parameter",
                "detail": "The 'to' parameter is required."
            }]})
        );
    }

    #[test]
    fn statuses_and_titles() {
        assert_eq!(ApiError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::unauthorized("x").title, "Unauthorized");
        assert_eq!(ApiError::bad_request("x").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::bad_request("x").code, "10005");
        assert_eq!(ApiError::internal("x").title, "Internal Server Error");
        assert_eq!(ApiError::method_not_allowed("x").code, "10003");
    }

    #[test]
    fn into_response_sets_status() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
