use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Token exchange failed ({status}): {message}")]
    ExchangeFailed { status: u16, message: String },

    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(String),

    #[error("Authorization prompt failed: {0}")]
    PromptFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, AuthError>;
