// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded retry with exponential backoff and jitter.
//!
//! Each attempt reports an explicit [`Attempt`] so callers decide which failures are
//! worth retrying. A [`Attempt::Permanent`] failure stops the loop immediately.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::constants::retry::{
    RECONCILE_ATTEMPTS, RECONCILE_INITIAL_DELAY_SECS, TOKEN_ATTEMPTS, TOKEN_INITIAL_DELAY_SECS,
};
use crate::error::ProvisionError;

/// Attempt budget and first delay for one call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Backoff {
    pub const fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Budget for namespace, role and binding operations
    pub const fn reconcile() -> Self {
        Self::new(
            RECONCILE_ATTEMPTS,
            Duration::from_secs(RECONCILE_INITIAL_DELAY_SECS),
        )
    }

    /// Budget for polling a service account token secret
    pub const fn token() -> Self {
        Self::new(TOKEN_ATTEMPTS, Duration::from_secs(TOKEN_INITIAL_DELAY_SECS))
    }
}

/// Result of a single invocation of a retried operation
#[derive(Debug)]
pub enum Attempt<T, E> {
    Success(T),
    Transient(E),
    Permanent(E),
}

impl<T> From<crate::error::Result<T>> for Attempt<T, ProvisionError> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => Attempt::Success(value),
            Err(e) if e.is_permanent() => Attempt::Permanent(e),
            Err(e) => Attempt::Transient(e),
        }
    }
}

/// Why the executor gave up
#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation opted out of retrying; carries its error untouched
    Permanent(E),
    /// Every attempt failed; carries the last error seen
    Exhausted { attempts: u32, last: E },
}

impl RetryError<ProvisionError> {
    /// Permanent errors pass through as-is; exhaustion records the step and resource.
    pub fn into_provision_error(
        self,
        step: &'static str,
        resource: impl Into<String>,
    ) -> ProvisionError {
        match self {
            RetryError::Permanent(e) => e,
            RetryError::Exhausted { attempts, last } => ProvisionError::ExhaustedRetries {
                step,
                resource: resource.into(),
                attempts,
                source: Box::new(last),
            },
        }
    }
}

/// Sleep before the next attempt: `delay` plus a uniform jitter in `[0, delay/2)`.
pub fn jittered<R: Rng>(delay: Duration, rng: &mut R) -> Duration {
    let max_jitter = (delay / 2).as_nanos() as u64;
    if max_jitter == 0 {
        return delay;
    }
    delay + Duration::from_nanos(rng.random_range(0..max_jitter))
}

/// Run `operation` until it succeeds, fails permanently, or the attempt budget is spent.
///
/// The base delay doubles after each failed attempt. A budget of zero is treated as one
/// attempt.
pub async fn retry<T, E, F, Fut, R>(
    backoff: &Backoff,
    rng: &mut R,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
    E: Display,
    R: Rng,
{
    let max_attempts = backoff.max_attempts.max(1);
    let mut delay = backoff.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let err = match operation().await {
            Attempt::Success(value) => return Ok(value),
            Attempt::Permanent(e) => {
                error!(
                    operation = %operation_name,
                    attempt = attempt,
                    error = %e,
                    "Operation failed permanently, not retrying"
                );
                return Err(RetryError::Permanent(e));
            }
            Attempt::Transient(e) => e,
        };

        if attempt >= max_attempts {
            error!(
                operation = %operation_name,
                attempt = attempt,
                error = %err,
                "Operation failed after max retries"
            );
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        let wait = jittered(delay, rng);
        warn!(
            operation = %operation_name,
            attempt = attempt,
            error = %err,
            delay_ms = wait.as_millis() as u64,
            "Operation failed, retrying"
        );
        sleep(wait).await;

        delay *= 2;
    }
}
