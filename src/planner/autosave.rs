use std::time::{Duration, Instant};

/// Wait after a failed save under `Immediate` before `tick` tries again.
pub const FAILED_SAVE_RETRY: Duration = Duration::from_secs(5);

/// When accepted changes are written to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutosavePolicy {
    /// Save synchronously after every accepted change.
    Immediate,
    /// Save from `tick` once no change has arrived for the given delay.
    Debounced(Duration),
}

impl AutosavePolicy {
    /// `0` selects `Immediate`.
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            AutosavePolicy::Immediate
        } else {
            AutosavePolicy::Debounced(Duration::from_millis(ms))
        }
    }

    /// How long `tick` waits after a failed save before trying again.
    pub fn retry_delay(&self) -> Duration {
        match self {
            AutosavePolicy::Immediate => FAILED_SAVE_RETRY,
            AutosavePolicy::Debounced(delay) => *delay,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Changed in memory, not yet persisted. Holds the time of the last change.
    Dirty(Instant),
    /// Changed in memory and the last save failed. No attempt before the
    /// held instant, whatever the policy.
    RetryAt(Instant),
}

impl SessionState {
    pub fn is_dirty(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// State after a failed save at `now`.
    pub fn failed(policy: AutosavePolicy, now: Instant) -> Self {
        SessionState::RetryAt(now + policy.retry_delay())
    }

    /// True when a flush is due at `now`.
    pub fn flush_due(&self, policy: AutosavePolicy, now: Instant) -> bool {
        match (self, policy) {
            (SessionState::Idle, _) => false,
            (SessionState::RetryAt(at), _) => now >= *at,
            (SessionState::Dirty(_), AutosavePolicy::Immediate) => true,
            (SessionState::Dirty(since), AutosavePolicy::Debounced(delay)) => {
                now.saturating_duration_since(*since) >= delay
            }
        }
    }
}

/// Result of the save step that follows an accepted change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveState {
    Saved,
    /// Waiting for the debounce delay.
    Pending,
    /// The change is kept in memory but is not on disk yet.
    Failed(String),
}
