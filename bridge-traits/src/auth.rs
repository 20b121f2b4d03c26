//! Interactive Authorization Abstraction
//!
//! The OAuth consent step needs a user-facing surface the core cannot
//! provide: an in-app browser tab on mobile, the system browser plus a
//! loopback redirect on desktop, or a scripted driver in tests. This trait
//! is that seam.

use async_trait::async_trait;

use crate::error::Result;

/// How an interactive authorization attempt ended.
///
/// Cancellation is an ordinary outcome, not an error: the user backing out
/// of the consent page must leave the application exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// The user approved access; `code` is the single-use authorization code
    /// extracted from the redirect.
    Granted { code: String },
    /// The user dismissed the consent surface without deciding.
    Cancelled,
    /// The provider redirected back with an error, or the surface failed.
    Denied { reason: String },
}

/// Trait for host surfaces that can walk a user through an OAuth consent page.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::auth::{AuthorizationOutcome, AuthorizationPrompt};
///
/// async fn sign_in(prompt: &dyn AuthorizationPrompt, url: &str) -> Result<Option<String>> {
///     match prompt.request_authorization(url).await? {
///         AuthorizationOutcome::Granted { code } => Ok(Some(code)),
///         _ => Ok(None),
///     }
/// }
/// ```
#[async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    /// Present `consent_url` to the user and wait for the flow to finish.
    ///
    /// May suspend indefinitely while the user reads the consent page.
    /// Implementations must support being dropped mid-flight (task
    /// cancellation) without side effects.
    async fn request_authorization(&self, consent_url: &str) -> Result<AuthorizationOutcome>;
}
