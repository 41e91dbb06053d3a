//! API error types with gRPC status mapping.

use placement::{PlacementError, RemoteError};
use storage::StorageError;
use thiserror::Error;
use tonic::Status;

/// API-level error type that maps to gRPC statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be turned into a domain value.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Order placement failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Errors that stop a service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Storage setup failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Client setup failed: {0}")]
    Connect(#[from] rpc::ConnectError),

    #[error("Metrics exporter setup failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Server error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(msg) => {
                tracing::debug!(error = %msg, "rejected invalid request");
                Status::invalid_argument(msg)
            }
            ApiError::Placement(err) => placement_error_to_status(&err),
        }
    }
}

/// Maps a placement failure to the status returned to the caller.
///
/// The message names the stage that failed.
pub fn placement_error_to_status(err: &PlacementError) -> Status {
    let message = err.to_string();
    match err {
        PlacementError::ProductNotFound(_) => Status::not_found(message),
        PlacementError::ValidationInfrastructure(e) | PlacementError::Persistence(e) => {
            storage_error_to_status(e, message)
        }
        PlacementError::Payment(e) | PlacementError::Shipping(e) => {
            remote_error_to_status(e, message)
        }
        PlacementError::InvalidOrder(_) => Status::invalid_argument(message),
    }
}

fn storage_error_to_status(err: &StorageError, message: String) -> Status {
    if err.is_timeout() {
        Status::unavailable(message)
    } else {
        tracing::error!(error = %err, "storage failure");
        Status::internal(message)
    }
}

fn remote_error_to_status(err: &RemoteError, message: String) -> Status {
    match err {
        RemoteError::DeadlineExceeded(_) => Status::deadline_exceeded(message),
        RemoteError::Unavailable(_) => Status::unavailable(message),
        RemoteError::Rejected(_) => Status::failed_precondition(message),
        RemoteError::Failed(_) => Status::internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{OrderError, ProductCode};
    use std::time::Duration;
    use tonic::Code;

    #[test]
    fn test_product_not_found() {
        let status = placement_error_to_status(&PlacementError::ProductNotFound(
            ProductCode::new("prod9"),
        ));
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Product not found: prod9");
    }

    #[test]
    fn test_storage_errors() {
        let status = placement_error_to_status(&PlacementError::Persistence(
            StorageError::Unavailable("down".to_string()),
        ));
        assert_eq!(status.code(), Code::Internal);
        assert!(status.message().starts_with("Order could not be saved"));

        let status = placement_error_to_status(&PlacementError::ValidationInfrastructure(
            StorageError::Timeout(Duration::from_secs(5)),
        ));
        assert_eq!(status.code(), Code::Unavailable);
    }

    #[test]
    fn test_remote_errors() {
        let cases = [
            (
                PlacementError::Payment(RemoteError::DeadlineExceeded(Duration::from_secs(2))),
                Code::DeadlineExceeded,
            ),
            (
                PlacementError::Shipping(RemoteError::DeadlineExceeded(Duration::from_secs(2))),
                Code::DeadlineExceeded,
            ),
            (
                PlacementError::Payment(RemoteError::Unavailable("down".to_string())),
                Code::Unavailable,
            ),
            (
                PlacementError::Payment(RemoteError::Rejected("declined".to_string())),
                Code::FailedPrecondition,
            ),
            (
                PlacementError::Shipping(RemoteError::Failed("boom".to_string())),
                Code::Internal,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(placement_error_to_status(&err).code(), code, "{err}");
        }
    }

    #[test]
    fn test_invalid_request() {
        let status: Status = ApiError::InvalidRequest("negative quantity".to_string()).into();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status: Status = ApiError::from(PlacementError::InvalidOrder(OrderError::NoItems)).into();
        assert_eq!(status.code(), Code::InvalidArgument);
    }
}
