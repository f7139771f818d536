//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lisan_common::Page;
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
            error: None,
        }
    }

    /// Create a success response for a newly created resource (201).
    pub const fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.error.is_some() {
            StatusCode::BAD_REQUEST
        } else {
            self.status
        };
        (status, Json(self)).into_response()
    }
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// List response envelope: `{ "data": [...], "pagination": {...} }`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Build the envelope from a result page.
    pub fn from_page<M>(page: Page<M>, f: impl Fn(M) -> T) -> Self {
        let pagination = Pagination {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages(),
        };

        Self {
            data: page.items.into_iter().map(f).collect(),
            pagination,
        }
    }
}

impl<T: Serialize> IntoResponse for PaginatedResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_serialization() {
        let response = ApiResponse::ok(serde_json::json!({"id": "123"}));
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"data\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_ok_response_is_200() {
        let response = ApiResponse::ok(serde_json::json!({"id": "123"}));
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_created_response_is_201() {
        let response = ApiResponse::created(serde_json::json!({"id": "123"}));
        assert_eq!(response.into_response().status(), StatusCode::CREATED);
    }

    #[test]
    fn test_paginated_response_envelope() {
        let page = Page::new(vec![1, 2, 3], 45, lisan_common::PageRequest::new(2, 3));
        let response = PaginatedResponse::from_page(page, |n| n * 10);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"], serde_json::json!([10, 20, 30]));
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["limit"], 3);
        assert_eq!(json["pagination"]["total"], 45);
        assert_eq!(json["pagination"]["totalPages"], 15);
    }
}
