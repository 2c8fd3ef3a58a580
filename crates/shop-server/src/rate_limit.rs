//! Per-IP Rate Limiting
//!
//! Fixed-window counters kept in process memory. Two instances run in the
//! router: a global one for every route and a stricter one wrapping the
//! checkout endpoints.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// One IP's usage within the current window.
#[derive(Clone, Copy, Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window per-IP limiter.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    message: &'static str,
    hits: RwLock<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, message: &'static str) -> Self {
        Self {
            max_requests,
            window,
            message,
            hits: RwLock::new(HashMap::new()),
        }
    }

    /// Global limit: 100 requests per 15 minutes per IP.
    pub fn global() -> Self {
        Self::new(
            100,
            Duration::from_secs(15 * 60),
            "Too many requests from this IP, please try again later.",
        )
    }

    /// Checkout limit: 5 attempts per 15 minutes per IP.
    pub fn checkout() -> Self {
        Self::new(
            5,
            Duration::from_secs(15 * 60),
            "Too many checkout attempts, please try again later.",
        )
    }

    /// Count a request against `ip`. Returns false once the window's
    /// budget is spent; a fresh window starts after it elapses.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().unwrap();

        let window = hits.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }

        window.count += 1;
        true
    }
}

#[derive(Serialize)]
struct RateLimitedResponse {
    error: &'static str,
    #[serde(rename = "retryAfter")]
    retry_after: &'static str,
}

/// Axum middleware enforcing a limiter. Requires the router to be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire(addr.ip()) {
        return next.run(request).await;
    }

    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    tracing::warn!(
        correlation_id = %correlation_id,
        ip = %addr.ip(),
        path = %request.uri().path(),
        "Rate limit exceeded"
    );

    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitedResponse {
            error: limiter.message,
            retry_after: "15 minutes",
        }),
    )
        .into_response()
}
