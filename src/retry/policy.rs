use std::time::Duration;

use async_trait::async_trait;

use crate::constants::{
    DEFAULT_CONTENT_POLICY_DELAY, DEFAULT_RETRY_INITIAL_DELAY, DEFAULT_RETRY_MAX_DELAY,
    DEFAULT_RETRY_MAX_ROUNDS,
};

/// Retry parameters for one model-calling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry round.
    pub initial_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
    /// Retry rounds after the first pass over the model list.
    pub max_rounds: u32,
    /// Fixed delay before the single content-policy retry.
    pub content_policy_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
            max_rounds: DEFAULT_RETRY_MAX_ROUNDS,
            content_policy_delay: DEFAULT_CONTENT_POLICY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_delay > self.max_delay {
            return Err(format!(
                "initial delay {:?} exceeds max delay {:?}",
                self.initial_delay, self.max_delay
            ));
        }
        Ok(())
    }

    /// A policy that never sleeps for long; useful in tests and demos.
    pub fn immediate(max_rounds: u32) -> Self {
        Self {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            max_rounds,
            content_policy_delay: Duration::from_millis(1),
        }
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.initial_delay,
            max: self.max_delay,
            rounds_left: self.max_rounds,
            rounds_taken: 0,
        }
    }
}

/// Mutable backoff state for one retry loop.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    rounds_left: u32,
    rounds_taken: u32,
}

impl Backoff {
    /// Delay before the next round, or `None` once the ceiling is reached.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.rounds_left == 0 {
            return None;
        }
        self.rounds_left -= 1;
        self.rounds_taken += 1;

        let delay = self.next.min(self.max);
        self.next = self.next.saturating_mul(2).min(self.max);
        Some(delay)
    }

    pub fn rounds_taken(&self) -> u32 {
        self.rounds_taken
    }
}

#[async_trait]
/// Clock seam for backoff delays.
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays without sleeping.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
