use std::time::Instant;

use actix_web::{web, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    services::rate_limiter::RateLimiter,
};

/// Proxy headers consulted for the caller's address, most trusted first.
const CLIENT_ADDRESS_HEADERS: &[&str] = &[
    "x-forwarded-for",
    "x-real-ip",
    "x-nf-client-connection-ip",
    "client-ip",
];

/// Best-effort caller identity for rate limiting. Only the first entry of a
/// forwarded chain is used.
pub fn client_key(req: &HttpRequest) -> Option<String> {
    CLIENT_ADDRESS_HEADERS.iter().find_map(|name| {
        req.headers()
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Counts the request against the caller's window and rejects it once the
/// window's allowance is spent.
pub fn enforce_rate_limit(req: &HttpRequest, limiter: &RateLimiter) -> AppResult<()> {
    let decision = limiter.check(client_key(req).as_deref());
    if decision.allowed {
        return Ok(());
    }
    Err(AppError::RateLimited {
        retry_after_secs: decision.retry_after_secs(Instant::now()),
    })
}

/// Parses a request body that must be a JSON object. An empty body is
/// treated as `{}` so the normalizer can report the missing field by name.
pub fn parse_json_body<T: DeserializeOwned>(body: &web::Bytes) -> AppResult<T> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body)
            .map_err(|_| AppError::ValidationError("Invalid JSON body".to_string()))?
    };

    if !value.is_object() {
        return Err(AppError::ValidationError("Invalid JSON body".to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON body: {}", e)))
}

/// Fallback for any non-POST method on a POST-only route.
pub async fn method_not_allowed() -> AppResult<actix_web::HttpResponse> {
    Err(AppError::MethodNotAllowed)
}
