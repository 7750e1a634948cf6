use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` is the
    /// server's `message` field when it sent one.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("token storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("token storage is corrupt: {0}")]
    CorruptStorage(#[from] serde_json::Error),
}

impl ClientError {
    /// True for the 401/403 answers that mean the stored token is useless.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}
