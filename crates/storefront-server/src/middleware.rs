use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
/// Longest caller-supplied request ID that is kept.
const MAX_REQUEST_ID_LEN: usize = 128;
/// Tracked shoppers before expired windows are pruned.
const PRUNE_THRESHOLD: usize = 4096;

/// Correlates one product page request across logs, the response envelope
/// and the `x-request-id` response header.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Uses the caller's `x-request-id` when it is printable ASCII of
    /// reasonable length, otherwise a fresh `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| {
                !v.is_empty()
                    && v.len() <= MAX_REQUEST_ID_LEN
                    && v.bytes().all(|b| b.is_ascii_graphic())
            });
        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }
}

#[derive(Debug, Clone)]
struct ShopperWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limit on product page lookups, counted per shopper so one
/// busy client cannot exhaust the catalog backend for everyone.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    shoppers: Arc<Mutex<HashMap<String, ShopperWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            shoppers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request for `shopper`. Returns the time left in the
    /// shopper's window when the request is over budget.
    async fn admit(&self, shopper: &str) -> Option<Duration> {
        let mut shoppers = self.shoppers.lock().await;
        let now = Instant::now();

        if shoppers.len() >= PRUNE_THRESHOLD {
            shoppers.retain(|_, w| now.duration_since(w.started_at) < self.window);
        }

        let window = shoppers
            .entry(shopper.to_owned())
            .or_insert(ShopperWindow {
                started_at: now,
                count: 0,
            });
        let elapsed = now.duration_since(window.started_at);
        if elapsed >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return Some(self.window.saturating_sub(elapsed));
        }
        window.count += 1;
        None
    }
}

/// The first `x-forwarded-for` hop, else the peer address, else one shared
/// bucket for unidentifiable callers.
fn shopper_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(hop) = forwarded {
        return hop.to_owned();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "anonymous".to_owned(), |info| info.0.ip().to_string())
}

/// Attaches a [`RequestId`] to the request, runs the rest of the stack
/// inside a span carrying it, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let span = tracing::info_span!(
        "storefront_request",
        request_id = %id.0,
        path = %req.uri().path()
    );
    let header_value = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).instrument(span).await;

    if let Some(val) = header_value {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects a shopper's lookups past the per-window budget with the API's
/// `rate_limited` error envelope and a `Retry-After` header.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let shopper = shopper_key(&req);
    let Some(retry_in) = rate_limit.admit(&shopper).await else {
        return next.run(req).await;
    };

    let retry_secs = retry_in.as_secs() + u64::from(retry_in.subsec_nanos() > 0);
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    tracing::warn!(
        shopper = %shopper,
        path = %req.uri().path(),
        retry_secs,
        "product lookup rate limit exceeded"
    );

    let mut res = ApiError::new(
        request_id,
        "rate_limited",
        format!("too many product requests; retry in {retry_secs}s"),
    )
    .into_response();
    res.headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
    res
}
