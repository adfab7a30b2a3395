use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

// Fixed one-second window. Scroll events can arrive in bursts, so the roster
// API sits behind this rather than per-route budgets.
#[derive(Debug)]
struct Window {
    opened: Instant,
    hits: u32,
}

#[derive(Clone, Debug)]
pub struct ApiRateLimiter {
    rps: u32,
    window: Arc<Mutex<Window>>,
}

impl ApiRateLimiter {
    fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                hits: 0,
            })),
        }
    }

    fn allow(&self) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(window.opened) >= Duration::from_secs(1) {
            window.opened = now;
            window.hits = 0;
        }
        if window.hits < self.rps {
            window.hits += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<ApiRateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.allow() {
        return (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32) -> ApiRateLimiter {
    ApiRateLimiter::new(rps)
}
