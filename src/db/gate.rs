//! Startup gate: keep the service from serving until the database answers.
//!
//! Fixed-interval polling only. Every attempt goes through
//! [`Database::probe`], the same primitive `/ping` uses at request time.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("database unreachable after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

pub async fn wait_for_database(db: &Database) -> Result<(), GateError> {
    let policy = &db.config().startup;
    wait_until_ready(policy.max_retries, policy.delay, || db.probe()).await
}

/// Calls `probe` until it succeeds or `max_retries` attempts have failed,
/// sleeping `delay` between attempts. A `max_retries` of zero still makes one
/// attempt.
pub async fn wait_until_ready<P, Fut, E>(
    max_retries: u32,
    delay: Duration,
    mut probe: P,
) -> Result<(), GateError>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let attempts = max_retries.max(1);
    let mut attempt = 1;

    loop {
        match probe().await {
            Ok(()) => {
                tracing::info!(attempt, "database reachable");
                return Ok(());
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    max_retries = attempts,
                    error = %err,
                    "waiting for database"
                );
                if attempt >= attempts {
                    return Err(GateError::Exhausted {
                        attempts,
                        last_error: err.to_string(),
                    });
                }
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn returns_immediately_when_first_probe_succeeds() {
        let calls = Cell::new(0u32);
        let started = Instant::now();

        let result = wait_until_ready(5, Duration::from_secs(30), || {
            calls.set(calls.get() + 1);
            async { Ok::<(), String>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn retries_until_probe_succeeds() {
        let calls = Cell::new(0u32);

        let result = wait_until_ready(5, Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(format!("refused #{n}"))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries_with_last_error() {
        let calls = Cell::new(0u32);

        let result = wait_until_ready(4, Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Err::<(), _>(format!("refused #{n}")) }
        })
        .await;

        assert_eq!(calls.get(), 4);
        match result {
            Err(GateError::Exhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, "refused #4");
            }
            Ok(()) => panic!("expected the gate to give up"),
        }
    }

    #[tokio::test]
    async fn zero_retries_still_probes_once() {
        let calls = Cell::new(0u32);

        let result = wait_until_ready(0, Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            async { Err::<(), _>("down") }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
