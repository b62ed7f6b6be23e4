//! Throttle policy: when to pause between page requests, and for how long.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bigcommerce_api::RateLimitState;

/// Default reserved buffer of requests left in the quota window.
pub const DEFAULT_THRESHOLD: u64 = 1;

/// How the pause length is derived from a response's rate-limit headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelayFormula {
    /// Wait until the quota window resets (`reset_ms`).
    #[default]
    UntilReset,
    /// Wait one request's share of the window (`window_ms / requests_quota`).
    WindowShare,
}

impl DelayFormula {
    fn delay(&self, rate_limit: &RateLimitState) -> Option<Duration> {
        match self {
            DelayFormula::UntilReset => rate_limit.reset_ms.map(Duration::from_millis),
            DelayFormula::WindowShare => match (rate_limit.window_ms, rate_limit.requests_quota) {
                (Some(window), Some(quota)) if quota > 0 => {
                    Some(Duration::from_millis(window / quota))
                }
                _ => None,
            },
        }
    }
}

impl FromStr for DelayFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "until-reset" => Ok(DelayFormula::UntilReset),
            "window-share" | "window_share" => Ok(DelayFormula::WindowShare),
            other => Err(format!("unknown throttle delay formula: {}", other)),
        }
    }
}

impl fmt::Display for DelayFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayFormula::UntilReset => write!(f, "reset"),
            DelayFormula::WindowShare => write!(f, "window-share"),
        }
    }
}

/// Decides whether a page response leaves too little quota to continue
/// without pausing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Pause once `requests_left` is at or below this value.
    pub threshold: u64,
    pub delay: DelayFormula,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            delay: DelayFormula::UntilReset,
        }
    }
}

impl ThrottlePolicy {
    pub fn new(threshold: u64, delay: DelayFormula) -> Self {
        Self { threshold, delay }
    }

    /// Paces requests at one window share once three or fewer remain.
    pub fn window_share() -> Self {
        Self::new(3, DelayFormula::WindowShare)
    }

    /// The pause to take before the next request, if any.
    ///
    /// An unknown `requests_left` never pauses. A known value at or below the
    /// threshold pauses for the formula's delay; if that delay cannot be
    /// computed from the headers, there is no pause.
    pub fn pause_for(&self, rate_limit: &RateLimitState) -> Option<Duration> {
        match rate_limit.requests_left {
            Some(left) if left <= self.threshold => {
                self.delay.delay(rate_limit).filter(|d| !d.is_zero())
            }
            Some(_) | None => None,
        }
    }
}
