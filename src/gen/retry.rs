//! Bounded retry policy shared by every generation operation.

use std::future::Future;

use thiserror::Error;

use super::backend::BackendError;

/// A generation request that did not produce a usable result.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The capability has no backend binding at all. Returned
    /// immediately, never retried.
    #[error("no generation backend is configured")]
    Unavailable,

    /// Transient failures persisted through every allowed attempt. The
    /// last underlying error is carried along with the attempt count.
    #[error("backend failed after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: BackendError },

    /// The backend rejected the request outright; retrying would not
    /// help.
    #[error("backend rejected the request: {0}")]
    Rejected(BackendError),

    /// Generation succeeded but the artifact could not be written out.
    #[error("failed to persist generated artifact: {0}")]
    Artifact(#[from] std::io::Error),
}

/// Run `op` up to `max_attempts` times (including the first), retrying
/// immediately whenever the classifier deems the failure transient. A
/// non-transient failure returns on first occurrence without further
/// attempts.
pub async fn retry_transient<T, Op, Fut>(
    max_attempts: u32,
    is_transient: impl Fn(&BackendError) -> bool,
    mut op: Op,
) -> Result<T, GenerateError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_transient(&err) => return Err(GenerateError::Rejected(err)),
            Err(err) if attempt >= max_attempts => {
                return Err(GenerateError::Exhausted {
                    attempts: attempt,
                    source: err,
                });
            }
            Err(err) => {
                tracing::warn!(
                    "Transient backend error (attempt {}/{}): {}",
                    attempt,
                    max_attempts,
                    err
                );
            }
        }
    }
}
