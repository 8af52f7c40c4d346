//! Fallback execution
//!
//! Runs a primary operation and, only if it fails, a standby operation.
//! An attempt fails when it returns an error, outlives the configured
//! timeout, or panics. Panics are captured and reported as failures.

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptError<E> {
    Failed(E),
    TimedOut(Duration),
    Panicked(String),
}

impl<E> AttemptError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::TimedOut(_))
    }
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Failed(e) => write!(f, "{}", e),
            AttemptError::TimedOut(d) => write!(f, "timed out after {:.1}s", d.as_secs_f64()),
            AttemptError::Panicked(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AttemptError<E> {}

/// Both the primary and the fallback attempt failed.
///
/// Carries the primary's failure augmented with the fallback's.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackError<E> {
    pub primary: AttemptError<E>,
    pub fallback: AttemptError<E>,
}

impl<E: fmt::Display> fmt::Display for FallbackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (fallback also failed: {})",
            self.primary, self.fallback
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for FallbackError<E> {}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs attempts under an optional per-attempt timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExecutor {
    timeout: Option<Duration>,
}

impl FallbackExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run a single attempt.
    pub async fn execute<T, E, F>(&self, attempt: F) -> Result<T, AttemptError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let guarded = AssertUnwindSafe(attempt).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(AttemptError::TimedOut(limit)),
            },
            None => guarded.await,
        };

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AttemptError::Failed(e)),
            Err(payload) => Err(AttemptError::Panicked(panic_message(payload))),
        }
    }

    /// Run `primary`; if it fails, build and run `fallback`.
    ///
    /// `fallback` is only constructed when needed.
    pub async fn execute_with_fallback<T, E, P, F, Fut>(
        &self,
        primary: P,
        fallback: F,
    ) -> Result<T, FallbackError<E>>
    where
        P: Future<Output = Result<T, E>>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let primary_error = match self.execute(primary).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        debug!("Primary attempt failed ({}), running fallback", primary_error);

        match self.execute(fallback()).await {
            Ok(value) => Ok(value),
            Err(fallback_error) => {
                warn!(
                    "Primary and fallback attempts failed: {} / {}",
                    primary_error, fallback_error
                );
                Err(FallbackError {
                    primary: primary_error,
                    fallback: fallback_error,
                })
            }
        }
    }
}

/// [`FallbackExecutor::execute_with_fallback`] without a timeout.
pub async fn execute_with_fallback<T, E, P, F, Fut>(
    primary: P,
    fallback: F,
) -> Result<T, FallbackError<E>>
where
    P: Future<Output = Result<T, E>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    FallbackExecutor::default()
        .execute_with_fallback(primary, fallback)
        .await
}
