use thiserror::Error;

/// Errors raised while setting up a client channel.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid endpoint {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: tonic::transport::Error,
    },
}
