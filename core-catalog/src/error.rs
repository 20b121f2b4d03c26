use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Auth(core_auth::AuthError),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Catalog request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<core_auth::AuthError> for CatalogError {
    fn from(e: core_auth::AuthError) -> Self {
        match e {
            core_auth::AuthError::NotAuthenticated => CatalogError::NotAuthenticated,
            other => CatalogError::Auth(other),
        }
    }
}
