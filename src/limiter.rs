// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by client address.
//!
//! Each client gets one window: a request count and the instant the window
//! opened. The count resets entirely when the window elapses, rather than
//! sliding. The map behind the limiter is the only shared mutable state in
//! the process and nothing outside this module touches it.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result of an admission check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is admitted
    Allowed {
        /// Remaining requests in the current window
        remaining: u32,
    },
    /// Request is rejected
    Limited {
        /// Time until the client's window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    /// Seconds until retry, rounded up. Only meaningful on `Limited`.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Allowed { .. } => None,
            Self::Limited { retry_after } => Some(retry_after.as_secs_f64().ceil() as u64),
        }
    }
}

/// One client's window state.
#[derive(Debug)]
struct ClientWindow {
    /// Requests seen in the current window, always >= 1
    count: u32,
    /// When the current window opened
    window_start: Instant,
}

/// Thread-safe fixed-window rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Per-client windows, bounded by `config.max_clients`
    windows: RwLock<HashMap<IpAddr, ClientWindow>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Admit or reject a request from `client`, stamped with the current time.
    pub async fn admit(&self, client: IpAddr) -> RateLimitResult {
        self.admit_at(client, Instant::now()).await
    }

    /// Admission check against an explicit clock reading.
    ///
    /// `now` must not move backwards across calls for the same client.
    pub(crate) async fn admit_at(&self, client: IpAddr, now: Instant) -> RateLimitResult {
        let window_len = self.config.window_duration();
        let mut windows = self.windows.write().await;

        let Some(window) = windows.get_mut(&client) else {
            if windows.len() >= self.config.max_clients {
                Self::evict(&mut *windows, self.config.max_clients, window_len, now);
            }
            windows.insert(
                client,
                ClientWindow {
                    count: 1,
                    window_start: now,
                },
            );
            return RateLimitResult::Allowed {
                remaining: self.config.max_requests.saturating_sub(1),
            };
        };

        let elapsed = now.duration_since(window.window_start);

        if elapsed > window_len {
            window.count = 1;
            window.window_start = now;
            return RateLimitResult::Allowed {
                remaining: self.config.max_requests.saturating_sub(1),
            };
        }

        if window.count >= self.config.max_requests {
            let retry_after = window_len - elapsed;
            debug!(%client, ?retry_after, "Client rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        window.count += 1;
        RateLimitResult::Allowed {
            remaining: self.config.max_requests.saturating_sub(window.count),
        }
    }

    /// Drop expired windows (should be called periodically).
    pub async fn cleanup(&self) {
        self.cleanup_at(Instant::now()).await;
    }

    pub(crate) async fn cleanup_at(&self, now: Instant) {
        let window_len = self.config.window_duration();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.window_start) <= window_len);
        let dropped = before - windows.len();
        if dropped > 0 {
            debug!(dropped, tracked = windows.len(), "Dropped expired client windows");
        }
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Make room in a full map: drop expired windows first, then the client
    /// whose window opened longest ago.
    fn evict(
        windows: &mut HashMap<IpAddr, ClientWindow>,
        max_clients: usize,
        window_len: Duration,
        now: Instant,
    ) {
        windows.retain(|_, w| now.duration_since(w.window_start) <= window_len);
        if windows.len() >= max_clients {
            if let Some(oldest) = windows
                .iter()
                .min_by_key(|(_, w)| w.window_start)
                .map(|(client, _)| *client)
            {
                warn!(evicted = %oldest, "Client map full, evicting oldest window");
                windows.remove(&oldest);
            }
        }
    }
}
