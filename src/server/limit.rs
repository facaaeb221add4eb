use crate::server::router::QuotidianState;
use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use tracing::debug;

/// In-process request limiter for the `/api/v1/*` surface: a shared
/// per-client quota plus a tighter per-route burst cap, both keyed on the
/// client network address.
pub struct ApiLimits {
    shared: DefaultKeyedRateLimiter<IpAddr>,
    burst: DefaultKeyedRateLimiter<(IpAddr, String)>,
}

impl ApiLimits {
    pub fn new(rate_per_minute: u32, burst_per_second: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_per_minute).unwrap_or(NonZeroU32::MIN);
        let per_second = NonZeroU32::new(burst_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            shared: RateLimiter::keyed(Quota::per_minute(per_minute)),
            burst: RateLimiter::keyed(Quota::per_second(per_second)),
        }
    }

    /// Admits the request only when both the shared quota and the per-route
    /// burst cap have capacity for this client.
    pub fn check(&self, client: IpAddr, route: &str) -> bool {
        if self.shared.check_key(&client).is_err() {
            return false;
        }
        self.burst.check_key(&(client, route.to_string())).is_ok()
    }
}

/// Axum middleware enforcing `ApiLimits`. Denials are a plain 429, outside
/// the response envelope; the limiter is treated as external middleware.
pub async fn throttle(
    State(state): State<QuotidianState>,
    req: Request,
    next: Next,
) -> Response {
    // Connect info is absent when the router is driven directly (tests);
    // those requests all share the loopback key.
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |info| info.0.ip());

    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_string(),
        |m| m.as_str().to_string(),
    );

    if !state.limits.check(client, &route) {
        debug!(%client, %route, "request rate limited");
        return (StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded").into_response();
    }

    next.run(req).await
}
