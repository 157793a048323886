//! Bounded retry with capped exponential backoff

use crate::{error::ConfigError, generator::GenerationError};
use std::{thread, time::Duration};
use thiserror::Error;

/// Default number of attempts per generation call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the second attempt
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(4);

/// Default upper bound for any single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Outcome of a call that did not succeed within the policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// Every attempt failed transiently
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last: GenerationError,
    },

    /// An attempt failed with an error that is not retried
    #[error(transparent)]
    Rejected(GenerationError),
}

/// Retry schedule for a single generation call
///
/// The delay after failed attempt `n` (1-based) is `base_delay * 2^(n-1)`,
/// capped at `max_delay`. Only transient errors are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` must be at least 1
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if max_delay < base_delay {
            return Err(ConfigError::Invalid(format!(
                "retry max_delay ({max_delay:?}) is shorter than base_delay ({base_delay:?})"
            )));
        }

        Ok(Self {
            max_attempts,
            base_delay,
            max_delay,
        })
    }

    /// A policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Result<Self, ConfigError> {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// A policy that makes exactly one attempt
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Maximum number of attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the second attempt
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Cap applied to every delay
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of
    /// attempts. The closure receives the 1-based attempt number.
    pub fn run<T, F>(&self, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Result<T, GenerationError>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(RetryError::Rejected(err)),
                Err(err) if attempt >= self.max_attempts => {
                    log::warn!("attempt {attempt}/{} failed, giving up: {err}", self.max_attempts);
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    let delay = self.delay_after(attempt);
                    log::warn!(
                        "attempt {attempt}/{} failed, retrying in {delay:?}: {err}",
                        self.max_attempts
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
