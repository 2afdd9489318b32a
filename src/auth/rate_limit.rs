use actix_web::HttpRequest;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Fixed-window request counter keyed by client address.
///
/// The registration and login endpoints share one instance; the window
/// resets as a whole rather than sliding, matching the usual
/// "N requests per window" contract of reverse-proxy limiters. Expired
/// windows are swept on every acquire, so the map never outgrows the
/// set of clients seen in the current window.
#[derive(Clone)]
pub struct RateLimiter {
    max_hits: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

impl RateLimiter {
    pub fn new(max_hits: u32, window: Duration) -> Self {
        Self {
            max_hits,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a hit for `key`.
    /// Returns false when the window budget is already spent.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();

        // Evict every expired window, the caller's included; a fresh
        // entry below then starts a new window for this key.
        windows.retain(|_, window| now.duration_since(window.started) < self.window);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });

        if window.hits < self.max_hits {
            window.hits += 1;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}

/// Limiter key for a request: the peer IP without the ephemeral port
pub fn client_key(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::net::SocketAddr;

    #[test]
    fn budget_is_enforced_per_key() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.try_acquire("10.0.0.1"));
        }
        assert!(!limiter.try_acquire("10.0.0.1"));

        // A different client still has its full budget
        assert!(limiter.try_acquire("10.0.0.2"));
    }

    #[test]
    fn window_expiry_restores_the_budget() {
        let limiter = RateLimiter::new(2, Duration::from_millis(20));

        assert!(limiter.try_acquire("10.0.0.1"));
        assert!(limiter.try_acquire("10.0.0.1"));
        assert!(!limiter.try_acquire("10.0.0.1"));

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire("10.0.0.1"));
    }

    #[test]
    fn stale_windows_are_swept_from_the_map() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));

        assert!(limiter.try_acquire("10.0.0.1"));
        assert!(limiter.try_acquire("10.0.0.2"));
        assert_eq!(limiter.tracked_clients(), 2);

        std::thread::sleep(Duration::from_millis(30));

        // The next acquire drops both stale entries before adding its own
        assert!(limiter.try_acquire("10.0.0.3"));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn clones_share_one_window_map() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let other = limiter.clone();

        assert!(limiter.try_acquire("10.0.0.1"));
        assert!(!other.try_acquire("10.0.0.1"));
    }

    #[test]
    fn client_key_drops_the_port() {
        let addr: SocketAddr = "192.168.1.5:40312".parse().unwrap();
        let req = TestRequest::default().peer_addr(addr).to_http_request();
        assert_eq!(client_key(&req), "192.168.1.5");
    }

    #[test]
    fn client_key_without_a_peer_is_stable() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_key(&req), "unknown");
    }
}
