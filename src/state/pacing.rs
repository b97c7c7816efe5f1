use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Per-host request pacing
///
/// Tracks when each host was last requested and computes how long a new
/// request has to wait to keep `delay` between requests on the same host.
///
/// Two modes are supported:
///
/// - **relaxed** (default): callers wait for the remaining delay, fetch, and
///   then record the completion time. Concurrent fetches to one host can pass
///   the check together before any of them records a timestamp, so spacing
///   is best-effort.
/// - **strict**: the next start slot (`max(now, last + delay)`) is reserved
///   under the lock before sleeping, so request starts on one host are always
///   at least `delay` apart.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    strict: bool,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    /// Creates a best-effort limiter
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            strict: false,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a limiter that reserves start slots per host
    pub fn strict(delay: Duration) -> Self {
        Self {
            strict: true,
            ..Self::new(delay)
        }
    }

    /// Minimum spacing between requests to one host
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the time left before `host` may be requested, if any
    pub fn time_until_next_request(&self, host: &str, now: Instant) -> Option<Duration> {
        let last_request = self.lock();
        let last = last_request.get(host)?;
        let ready_at = *last + self.delay;
        (ready_at > now).then(|| ready_at - now)
    }

    /// Suspends until `host` may be requested again
    pub async fn wait_turn(&self, host: &str) {
        let now = Instant::now();

        let wait = if self.strict {
            let mut last_request = self.lock();
            let slot = match last_request.get(host) {
                Some(last) => (*last + self.delay).max(now),
                None => now,
            };
            last_request.insert(host.to_string(), slot);
            slot.saturating_duration_since(now)
        } else {
            self.time_until_next_request(host, now)
                .unwrap_or(Duration::ZERO)
        };

        if !wait.is_zero() {
            tracing::trace!("Pacing {} for {:?}", host, wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a request to `host` finished at `at`
    ///
    /// In strict mode the reserved start slot is authoritative and this is a
    /// no-op.
    pub fn record_request(&self, host: &str, at: Instant) {
        if self.strict {
            return;
        }
        self.lock().insert(host.to_string(), at);
    }

    /// Timestamp of the last recorded (or reserved) request to `host`
    pub fn last_request(&self, host: &str) -> Option<Instant> {
        self.lock().get(host).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instant>> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
