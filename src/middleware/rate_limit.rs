use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::app_state::AppState;
use crate::config::RateLimitConfig;
use crate::error::AppError;

/// Fixed-window per-IP request counter.
///
/// A throttle against form spam and login brute force, not a correctness
/// mechanism; limits are per process.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, WindowSlot>>,
}

struct WindowSlot {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        if hits.len() > 1024 {
            let window = self.window;
            hits.retain(|_, slot| slot.started.elapsed() < window);
        }

        let slot = hits.entry(ip).or_insert(WindowSlot {
            started: Instant::now(),
            count: 0,
        });
        if slot.started.elapsed() >= self.window {
            slot.started = Instant::now();
            slot.count = 0;
        }
        slot.count += 1;
        slot.count <= self.max
    }
}

pub struct RateLimits {
    pub submit: RateLimiter,
    pub login: RateLimiter,
}

impl RateLimits {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs);
        Self {
            submit: RateLimiter::new(config.submit_max, window),
            login: RateLimiter::new(config.login_max, window),
        }
    }
}

/// Throttle for the public booking submission endpoint.
pub async fn submit_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);
    if !state.limits.submit.try_acquire(ip) {
        warn!(%ip, "booking submission rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}

/// Throttle for the admin login endpoint.
pub async fn login_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);
    if !state.limits.login.try_acquire(ip) {
        warn!(%ip, "login rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
