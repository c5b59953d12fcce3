use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServoError {
    #[error("Network error: {url} unreachable ({cause})")]
    Unreachable { url: String, cause: String },
    #[error("Network error: {url} timed out")]
    Timeout { url: String },
    #[error("Actuator responded with code {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("command task aborted: {0}")]
    Aborted(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ServoError {
    pub fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServoError::Timeout {
                url: url.to_string(),
            }
        } else {
            ServoError::Unreachable {
                url: url.to_string(),
                cause: err.to_string(),
            }
        }
    }
}
