//! Per-address request budget for the `/api` routes.
//!
//! A sliding window of request instants is kept for every client address.
//! Addresses whose window has emptied are swept every `cleanup_interval`
//! requests, and the number of tracked addresses is capped so a flood of
//! distinct sources cannot grow the map without bound.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::error::PortalError;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
    /// Sweep idle addresses every this many requests.
    pub cleanup_interval: u64,
    pub max_tracked_ips: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            cleanup_interval: 100,
            max_tracked_ips: 10_000,
        }
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: RwLock<HashMap<IpAddr, Vec<Instant>>>,
    request_count: AtomicU64,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: RwLock::new(HashMap::new()),
            request_count: AtomicU64::new(0),
        }
    }

    fn cutoff(&self, now: Instant) -> Instant {
        now.checked_sub(self.config.window).unwrap_or(now)
    }

    /// Records a request from `ip`, or rejects it with
    /// [`PortalError::RateLimited`] when the address has used up its budget
    /// (or when a new address arrives while the tracking cap is reached).
    pub fn check(&self, ip: IpAddr) -> Result<(), PortalError> {
        let now = Instant::now();
        let cutoff = self.cutoff(now);

        let count = self.request_count.fetch_add(1, Ordering::Relaxed);
        if count > 0 && count % self.config.cleanup_interval == 0 {
            self.cleanup();
        }

        let tracked = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(timestamps) = state.get(&ip) {
                if timestamps.iter().filter(|&&t| t > cutoff).count() >= self.config.max_requests
                {
                    tracing::warn!(ip = %ip, max = self.config.max_requests, "rate limit exceeded");
                    return Err(PortalError::RateLimited);
                }
                true
            } else {
                false
            }
        };

        if !tracked && self.tracked_ips() >= self.config.max_tracked_ips {
            self.cleanup();
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.contains_key(&ip) && state.len() >= self.config.max_tracked_ips {
            tracing::warn!(ip = %ip, tracked_ips = state.len(), "rate limiter is full");
            return Err(PortalError::RateLimited);
        }

        let timestamps = state.entry(ip).or_default();
        timestamps.retain(|&t| t > cutoff);
        if timestamps.len() >= self.config.max_requests {
            tracing::warn!(ip = %ip, max = self.config.max_requests, "rate limit exceeded");
            return Err(PortalError::RateLimited);
        }
        timestamps.push(now);
        Ok(())
    }

    /// Drops addresses with no requests inside the window.
    pub fn cleanup(&self) {
        let cutoff = self.cutoff(Instant::now());
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.retain(|_, timestamps| {
            timestamps.retain(|&t| t > cutoff);
            !timestamps.is_empty()
        });
    }

    #[must_use]
    pub fn tracked_ips(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Middleware charging each request to its peer address.
///
/// Requests served without connection info (as in router tests) are charged
/// to `0.0.0.0`.
pub async fn limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match state.limiter.check(ip) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, last))
    }

    fn limiter(max_requests: usize, window: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window,
            ..Default::default()
        })
    }

    #[test]
    fn default_budget_is_100_per_15_minutes() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window, Duration::from_secs(900));
    }

    #[test]
    fn hundred_and_first_request_is_rejected() {
        let limiter = limiter(100, Duration::from_secs(900));
        for _ in 0..100 {
            assert!(limiter.check(ip(1)).is_ok());
        }
        assert!(matches!(limiter.check(ip(1)), Err(PortalError::RateLimited)));
    }

    #[test]
    fn addresses_have_separate_budgets() {
        let limiter = limiter(2, Duration::from_secs(60));
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_err());

        assert!(limiter.check(ip(2)).is_ok());
        assert!(limiter.check(ip(2)).is_ok());
        assert!(limiter.check(ip(2)).is_err());
    }

    #[test]
    fn budget_returns_after_the_window() {
        let limiter = limiter(2, Duration::from_millis(200));
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_err());

        thread::sleep(Duration::from_millis(250));
        assert!(limiter.check(ip(1)).is_ok());
    }

    #[test]
    fn cleanup_forgets_idle_addresses() {
        let limiter = limiter(10, Duration::from_millis(200));
        for i in 0..5 {
            limiter.check(ip(i)).unwrap();
        }
        assert_eq!(limiter.tracked_ips(), 5);

        thread::sleep(Duration::from_millis(250));
        limiter.cleanup();
        assert_eq!(limiter.tracked_ips(), 0);
    }

    #[test]
    fn concurrent_requests_share_one_budget() {
        let limiter = Arc::new(limiter(100, Duration::from_secs(60)));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    for _ in 0..10 {
                        let _ = limiter.check(ip(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(limiter.check(ip(1)).is_err());
    }

    #[test]
    fn new_addresses_are_refused_once_full() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 100,
            window: Duration::from_secs(60),
            cleanup_interval: 1000,
            max_tracked_ips: 3,
        });
        for i in 0..3 {
            limiter.check(ip(i)).unwrap();
        }
        assert!(limiter.check(ip(9)).is_err());
        assert_eq!(limiter.tracked_ips(), 3);
        assert!(limiter.check(ip(0)).is_ok());
    }
}
