use std::{
    collections::{HashMap, VecDeque},
    sync::OnceLock,
    time::{Duration, Instant},
};

use regex::Regex;

use crate::domain::{UserId, Username};

// ============== Identity Sanitizer ==============

/// GitHub caps usernames at 39 characters.
pub const MAX_USERNAME_LEN: usize = 39;

/// Strip every character outside `[A-Za-z0-9_-]`.
///
/// Pure and infallible; the result may be empty. Callers must reject empty or
/// over-length results before any network call.
pub fn sanitize_username(raw: &str) -> String {
    // Compiled once; this runs on every inbound message.
    static STRIP: OnceLock<Regex> = OnceLock::new();
    let re = STRIP.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid regex"));
    re.replace_all(raw, "").to_string()
}

/// Sanitize and validate a caller-supplied username.
///
/// Returns `None` when the sanitized result is empty or longer than GitHub's
/// username limit.
pub fn validate_username(raw: &str) -> Option<Username> {
    let clean = sanitize_username(raw);
    if clean.is_empty() || clean.len() > MAX_USERNAME_LEN {
        return None;
    }
    Some(Username(clean))
}

// ============== Admission Controller ==============

/// Outcome of an admission check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// Refused; the caller may retry after this duration.
    Refused { retry_after: Duration },
}

#[derive(Clone, Debug, Default)]
struct CallerState {
    /// Timestamps of recently admitted requests, oldest first.
    /// Bounded to `max_messages` entries.
    window: VecDeque<Instant>,
    blocked_until: Option<Instant>,
}

/// Per-caller sliding-window limiter with a temporary-block state machine.
///
/// A caller that issues `max_messages` admitted requests within `window` gets
/// the next request refused and a block of `block_duration` installed. Blocks
/// expire lazily; there is no cleanup task. Callers must wrap this in a mutex
/// so the read-check-update sequence is atomic per caller.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    enabled: bool,
    max_messages: usize,
    window: Duration,
    block_duration: Duration,
    callers: HashMap<UserId, CallerState>,
}

impl RateLimiter {
    pub fn new(
        enabled: bool,
        max_messages: usize,
        window: Duration,
        block_duration: Duration,
    ) -> Self {
        Self {
            enabled,
            max_messages: max_messages.max(1),
            window,
            block_duration,
            callers: HashMap::new(),
        }
    }

    pub fn check(&mut self, user_id: UserId) -> Admission {
        self.check_at(user_id, Instant::now())
    }

    pub fn check_at(&mut self, user_id: UserId, now: Instant) -> Admission {
        if !self.enabled {
            return Admission::Admitted;
        }

        let state = self.callers.entry(user_id).or_default();

        // Block gate: refuse without touching the window.
        if let Some(until) = state.blocked_until {
            if now < until {
                return Admission::Refused {
                    retry_after: until - now,
                };
            }
            state.blocked_until = None;
        }

        // Window full and the oldest entry is still recent: install a block.
        // Refusals do not consume a window slot.
        if state.window.len() >= self.max_messages {
            if let Some(&oldest) = state.window.front() {
                if now.duration_since(oldest) < self.window {
                    state.blocked_until = Some(now + self.block_duration);
                    return Admission::Refused {
                        retry_after: self.block_duration,
                    };
                }
            }
        }

        state.window.push_back(now);
        while state.window.len() > self.max_messages {
            state.window.pop_front();
        }
        Admission::Admitted
    }
}
