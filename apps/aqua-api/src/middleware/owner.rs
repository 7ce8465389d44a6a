//! 请求上下文与所有者身份
//!
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - require_owner：从网关注入的 `x-user-id` 头构造 OwnerContext
//! - require_tank：验证水族箱属于当前用户，返回限定到该水族箱的上下文
//!
//! 认证由上游网关完成；缺少身份头即视为未认证。

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use aqua_storage::TankRecord;
use aqua_telemetry::new_request_ids;
use domain::OwnerContext;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, not_found_error, storage_error};

pub const USER_ID_HEADER: &str = "x-user-id";

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从身份头提取所有者上下文
pub fn require_owner(headers: &HeaderMap) -> Result<OwnerContext, Response> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    match user_id {
        Some(user_id) => Ok(OwnerContext::new(user_id, None)),
        None => Err(auth_error(StatusCode::UNAUTHORIZED)),
    }
}

/// 验证水族箱归属（不属于当前用户时按不存在处理）
pub async fn require_tank(
    state: &AppState,
    headers: &HeaderMap,
    tank_id: &str,
) -> Result<(OwnerContext, TankRecord), Response> {
    let ctx = require_owner(headers)?;
    match state.stores.tanks.find_tank(&ctx, tank_id).await {
        Ok(Some(tank)) => Ok((ctx.scoped_to(tank_id), tank)),
        Ok(None) => Err(not_found_error()),
        Err(err) => Err(storage_error(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_comes_from_user_header() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" user-1 "));
        let ctx = require_owner(&headers).expect("owner");
        assert_eq!(ctx.user_id, "user-1");
        assert!(ctx.tank_scope.is_none());
    }

    #[test]
    fn missing_or_blank_header_is_unauthorized() {
        let response = require_owner(&HeaderMap::new()).expect_err("unauthorized");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        let response = require_owner(&headers).expect_err("unauthorized");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
