use axum::{http::StatusCode, response::Response};
use serde_json::json;

use crate::api::{json_response, ApiError};

/// GET /ping - 健康检查
pub async fn ping() -> Result<Response, ApiError> {
    json_response(
        StatusCode::OK,
        &json!({
            "ok": true,
            "api": "search",
            "endpoints": ["/countrysearch", "/citysearch"]
        }),
    )
}

/// Unmatched path or method / 未匹配的路径或方法
pub async fn not_found() -> Result<Response, ApiError> {
    json_response(StatusCode::NOT_FOUND, &json!({ "error": "not_found" }))
}
