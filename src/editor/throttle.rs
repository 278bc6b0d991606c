use std::time::{Duration, Instant};

/// Rate limiter for change notifications. The first request fires at once;
/// requests inside the interval are coalesced into one trailing fire that
/// `poll` releases once the interval has passed.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn ready(&self, now: Instant) -> bool {
        self.last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Ask to fire. Returns true when the caller should notify right now.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.last_fired = Some(now);
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Release a coalesced request whose interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.ready(now) {
            self.last_fired = Some(now);
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Drop any pending trailing fire.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
