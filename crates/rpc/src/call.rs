//! Deadline plus retry around a single unary call.

use std::future::Future;
use std::time::Duration;

use placement::RemoteError;
use tonic::{Code, Status};

use crate::retry::RetryPolicy;

/// How a remote call is bounded and retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPolicy {
    /// Bound on the whole call, retries and backoff included.
    pub deadline: Duration,
    pub retry: RetryPolicy,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}

impl CallPolicy {
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline,
            ..Self::default()
        }
    }

    /// Runs `call` under the retry policy, bounded by the deadline.
    pub async fn execute<F, Fut, T>(&self, service: &'static str, call: F) -> Result<T, RemoteError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        match tokio::time::timeout(self.deadline, self.retry.run(service, call)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(status)) => {
                if status.code() == Code::DeadlineExceeded {
                    tracing::warn!(service, message = status.message(), "remote deadline exceeded");
                }
                Err(remote_error_from_status(&status, self.deadline))
            }
            Err(_) => {
                tracing::warn!(service, deadline = ?self.deadline, "deadline exceeded");
                Err(RemoteError::DeadlineExceeded(self.deadline))
            }
        }
    }
}

/// Maps a final gRPC status to a [`RemoteError`].
pub fn remote_error_from_status(status: &Status, deadline: Duration) -> RemoteError {
    let message = status.message().to_string();
    match status.code() {
        Code::DeadlineExceeded => RemoteError::DeadlineExceeded(deadline),
        Code::Unavailable | Code::ResourceExhausted => RemoteError::Unavailable(message),
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            RemoteError::Rejected(message)
        }
        code => RemoteError::Failed(format!("{code:?}: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let deadline = Duration::from_secs(2);

        assert_eq!(
            remote_error_from_status(&Status::deadline_exceeded("slow"), deadline),
            RemoteError::DeadlineExceeded(deadline)
        );
        assert_eq!(
            remote_error_from_status(&Status::unavailable("down"), deadline),
            RemoteError::Unavailable("down".to_string())
        );
        assert_eq!(
            remote_error_from_status(&Status::resource_exhausted("busy"), deadline),
            RemoteError::Unavailable("busy".to_string())
        );
        assert_eq!(
            remote_error_from_status(&Status::failed_precondition("no funds"), deadline),
            RemoteError::Rejected("no funds".to_string())
        );
        assert!(matches!(
            remote_error_from_status(&Status::internal("boom"), deadline),
            RemoteError::Failed(msg) if msg.contains("boom")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_covers_retries() {
        let policy = CallPolicy::default();

        // Five attempts 1s apart need 4s, past the 2s deadline.
        let result: Result<(), RemoteError> = policy
            .execute("test", |_| async { Err(Status::unavailable("down")) })
            .await;

        assert_eq!(
            result,
            Err(RemoteError::DeadlineExceeded(Duration::from_secs(2)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_hits_deadline() {
        let policy = CallPolicy::with_deadline(Duration::from_millis(200));

        let result: Result<(), RemoteError> = policy
            .execute("test", |_| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(())
            })
            .await;

        assert!(result.unwrap_err().is_deadline_exceeded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_within_deadline() {
        let policy = CallPolicy::default();

        let result = policy
            .execute("test", |attempt| async move {
                if attempt == 1 {
                    Err(Status::unavailable("warming up"))
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let policy = CallPolicy::default();

        let result: Result<(), RemoteError> = policy
            .execute("test", |_| async { Err(Status::invalid_argument("bad")) })
            .await;

        assert_eq!(result, Err(RemoteError::Rejected("bad".to_string())));
    }
}
