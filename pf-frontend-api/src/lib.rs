use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

mod public;
mod search;

pub use self::public::*;

pub use pf_boundary as boundary;

type Result<T> = std::result::Result<T, boundary::Error>;

/// Everything that can go wrong on the way to the catalog and back.
///
/// Never leaves this crate: see [`TransportError::normalize`].
#[derive(Debug, Error)]
enum TransportError {
    #[error(transparent)]
    Fetch(#[from] reqwest::Error),

    #[error("Malformed response from the catalog: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request failed with status code {}", .0.as_u16())]
    Status(StatusCode),

    #[error("{0}")]
    Api(boundary::Error, StatusCode),
}

impl TransportError {
    /// Converts the error into the one and only error shape
    /// that is exposed to consumers.
    fn normalize(self, path: &str) -> boundary::Error {
        match self {
            Self::Api(mut err, status) => {
                if err.status == 0 {
                    err.status = status.as_u16();
                }
                if err.timestamp.is_empty() {
                    err.timestamp = boundary::now_rfc3339();
                }
                if err.path.is_empty() {
                    err.path = path.to_string();
                }
                err
            }
            Self::Fetch(ref fetch_err) => {
                log::warn!("Failed to fetch {path}: {fetch_err}");
                let status = fetch_err.status().map(|s| s.as_u16());
                boundary::Error::new(
                    status.unwrap_or(boundary::Error::STATUS_INTERNAL),
                    self.to_string(),
                    path,
                )
            }
            Self::Decode(_) => {
                log::warn!("Failed to decode response of {path}: {self}");
                boundary::Error::new(boundary::Error::STATUS_INTERNAL, self.to_string(), path)
            }
            Self::Status(status) => {
                log::warn!("Received {status} without error details from {path}");
                boundary::Error::new(status.as_u16(), self.to_string(), path)
            }
        }
    }
}

async fn into_json<T>(response: Response) -> std::result::Result<T, TransportError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;
    // ensure we've got 2xx status
    if status.is_success() {
        Ok(serde_json::from_slice(&body)?)
    } else {
        Err(error_from_body(status, &body))
    }
}

async fn into_empty(response: Response) -> std::result::Result<(), TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.bytes().await?;
    Err(error_from_body(status, &body))
}

fn error_from_body(status: StatusCode, body: &[u8]) -> TransportError {
    match serde_json::from_slice::<boundary::Error>(body) {
        Ok(err) if !err.message.trim().is_empty() => TransportError::Api(err, status),
        _ => TransportError::Status(status),
    }
}
