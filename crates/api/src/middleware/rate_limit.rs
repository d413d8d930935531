//! Rate limiting middleware.
//!
//! Per-client limits for anonymous write endpoints (feedback). State lives in
//! process memory, so each instance enforces its own budget.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovRateLimiter,
};
use std::num::NonZeroU32;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::client_key_from_headers;
use crate::middleware::metrics::record_feedback_rate_limited;

type KeyedLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

const FALLBACK_PER_HOUR: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// Hourly request budget keyed by client key.
pub struct RateLimiterState {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    limit_per_hour: u32,
}

impl RateLimiterState {
    /// A limit of zero falls back to 5 per hour.
    pub fn per_hour(limit_per_hour: u32) -> Self {
        let quota = Quota::per_hour(NonZeroU32::new(limit_per_hour).unwrap_or(FALLBACK_PER_HOUR));
        Self {
            limiter: GovRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            limit_per_hour,
        }
    }

    pub fn limit_per_hour(&self) -> u32 {
        self.limit_per_hour
    }

    /// Ok if the client still has budget, else the seconds until it has.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                Err(wait.as_secs().max(1))
            }
        }
    }

    /// Drops state for clients whose budget has fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("limit_per_hour", &self.limit_per_hour)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Route layer for POST /api/feedback.
pub async fn feedback_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(limiter) = state.feedback_limiter.as_ref() {
        let key = client_key_from_headers(req.headers());
        if let Err(retry_after) = limiter.check(&key) {
            tracing::info!(retry_after, "Feedback rate limit exceeded");
            record_feedback_rate_limited();
            return rate_limited(limiter.limit_per_hour(), retry_after).into_response();
        }
    }

    next.run(req).await
}

fn rate_limited(limit: u32, retry_after_secs: u64) -> ApiError {
    ApiError::RateLimited {
        message: format!("Limit of {} submissions per hour exceeded", limit),
        retry_after_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let state = RateLimiterState::per_hour(3);
        for i in 0..3 {
            assert!(state.check("203.0.113.7").is_ok(), "request {} refused", i);
        }
        let retry = state.check("203.0.113.7").unwrap_err();
        assert!(retry >= 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let state = RateLimiterState::per_hour(1);
        assert!(state.check("a").is_ok());
        assert!(state.check("b").is_ok());
        assert!(state.check("a").is_err());
        assert!(state.check("b").is_err());
        assert!(state.check("c").is_ok());
    }

    #[test]
    fn test_zero_limit_falls_back() {
        let state = RateLimiterState::per_hour(0);
        for _ in 0..5 {
            assert!(state.check("k").is_ok());
        }
        assert!(state.check("k").is_err());
    }

    #[test]
    fn test_retry_after_is_spacing_of_quota() {
        // 60/hour refills one cell per minute.
        let state = RateLimiterState::per_hour(60);
        for _ in 0..60 {
            state.check("k").unwrap();
        }
        let retry = state.check("k").unwrap_err();
        assert!((1..=60).contains(&retry));
    }

    #[test]
    fn test_tracks_and_prunes() {
        let state = RateLimiterState::per_hour(10);
        state.check("a").unwrap();
        state.check("b").unwrap();
        assert_eq!(state.tracked_clients(), 2);
        state.prune();
        assert!(state.tracked_clients() <= 2);
    }

    #[test]
    fn test_debug_output() {
        let state = RateLimiterState::per_hour(5);
        let debug = format!("{:?}", state);
        assert!(debug.contains("limit_per_hour: 5"));
    }

    #[test]
    fn test_rate_limited_response() {
        use axum::http::{header, StatusCode};

        let response = rate_limited(5, 720).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "720");
    }
}
