//! Per-client sliding-window limiter for the login endpoint.
//!
//! Owned by the application state: built at startup from
//! [`LoginLimiterConfig`], with a janitor task that is aborted on shutdown.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::config::LoginLimiterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct LoginLimiter {
    window: Duration,
    max_requests: u32,
    status_code: u16,
    message: String,
    log_file: String,
    trusted_proxy_ips: Vec<String>,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl LoginLimiter {
    #[must_use]
    pub fn new(config: &LoginLimiterConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_seconds),
            max_requests: config.max_requests,
            status_code: config.status_code,
            message: config.message.clone(),
            log_file: config.log_file.clone(),
            trusted_proxy_ips: config.trusted_proxy_ips.clone(),
            hits: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    #[must_use]
    pub fn trusts_proxy(&self, peer_ip: &str) -> bool {
        self.trusted_proxy_ips.iter().any(|ip| ip == peer_ip)
    }

    /// Records a hit for `key` unless the key already used up its window.
    /// Rejected hits are not recorded, so a blocked client is admitted again
    /// once its oldest admitted hit leaves the window.
    pub async fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let entry = hits.entry(key.to_string()).or_default();

        while entry
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            entry.pop_front();
        }

        let used = u32::try_from(entry.len()).unwrap_or(u32::MAX);
        if used >= self.max_requests {
            let retry_after = entry
                .front()
                .map_or(self.window, |oldest| {
                    self.window.saturating_sub(now.duration_since(*oldest))
                });
            return Decision::Limited { retry_after };
        }

        entry.push_back(now);
        Decision::Allowed {
            remaining: self.max_requests - used - 1,
        }
    }

    /// Drops expired hits and forgets keys with none left. Returns the number
    /// of keys removed.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let before = hits.len();

        hits.retain(|_, entry| {
            entry.retain(|t| now.duration_since(*t) < self.window);
            !entry.is_empty()
        });

        before - hits.len()
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.hits.lock().await.len()
    }

    /// Periodically prunes idle keys until the returned handle is aborted.
    pub fn spawn_janitor(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = self.prune().await;
                if removed > 0 {
                    debug!(removed, "Pruned idle login limiter keys");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_seconds: u64, max_requests: u32) -> LoginLimiter {
        LoginLimiter::new(&LoginLimiterConfig {
            window_seconds,
            max_requests,
            ..LoginLimiterConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_sixth_request_in_window_is_limited() {
        let limiter = limiter(60, 5);

        for expected_remaining in (0..5).rev() {
            assert_eq!(
                limiter.check("10.0.0.1").await,
                Decision::Allowed {
                    remaining: expected_remaining
                }
            );
        }

        assert!(matches!(
            limiter.check("10.0.0.1").await,
            Decision::Limited { .. }
        ));

        // Other clients have their own budget.
        assert!(matches!(
            limiter.check("10.0.0.2").await,
            Decision::Allowed { remaining: 4 }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = limiter(60, 2);

        limiter.check("k").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check("k").await;

        match limiter.check("k").await {
            Decision::Limited { retry_after } => assert_eq!(retry_after, Duration::from_secs(30)),
            Decision::Allowed { .. } => panic!("third hit should be limited"),
        }

        // First hit leaves the window; one slot opens up.
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(
            limiter.check("k").await,
            Decision::Allowed { remaining: 0 }
        );
        assert!(matches!(limiter.check("k").await, Decision::Limited { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_forgets_idle_keys() {
        let limiter = limiter(60, 5);
        limiter.check("a").await;
        limiter.check("b").await;
        assert_eq!(limiter.tracked_keys().await, 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        limiter.check("b").await;

        assert_eq!(limiter.prune().await, 1);
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[test]
    fn test_trusted_proxies() {
        let limiter = LoginLimiter::new(&LoginLimiterConfig {
            trusted_proxy_ips: vec!["127.0.0.1".to_string()],
            ..LoginLimiterConfig::default()
        });
        assert!(limiter.trusts_proxy("127.0.0.1"));
        assert!(!limiter.trusts_proxy("10.0.0.1"));
        assert_eq!(limiter.status_code(), 429);
        assert_eq!(limiter.log_file(), "errLog.log");
    }
}
