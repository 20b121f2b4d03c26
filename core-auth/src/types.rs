use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An access token together with its absolute expiration time.
///
/// The upstream authorization server issues no refresh token, so a
/// credential is a one-shot grant: once `expires_at` has passed it is
/// useless and a new interactive authorization is required.
///
/// # Security
///
/// The token must never be logged. The `Debug` implementation redacts it.
///
/// # Examples
///
/// ```
/// use core_auth::Credential;
/// use chrono::{Duration, Utc};
///
/// let credential = Credential {
///     access_token: "BQDf3...".to_string(),
///     expires_at: Utc::now() + Duration::hours(1),
/// };
///
/// assert!(!credential.is_expired_at(Utc::now()));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The bearer token used for catalog API requests
    pub access_token: String,
    /// When the token expires (UTC)
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential from a token and a lifetime in seconds,
    /// anchored at the given instant.
    pub fn with_lifetime(access_token: String, now: DateTime<Utc>, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_at: now + chrono::Duration::seconds(expires_in),
        }
    }

    /// Check whether the credential is expired as of the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Expiration time as milliseconds since the Unix epoch.
    ///
    /// This is the persisted representation of `expires_at`.
    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }

    /// Reconstruct the expiration time from a persisted millisecond
    /// timestamp. Returns `None` for values outside chrono's range.
    pub fn expiry_from_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }
}

// Custom Debug implementation to avoid logging the token
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_with_lifetime_anchors_at_now() {
        let now = Utc::now();
        let credential = Credential::with_lifetime("token".to_string(), now, 3600);
        assert_eq!(credential.expires_at, now + Duration::seconds(3600));
    }

    #[test]
    fn test_is_expired_at_fresh() {
        let now = Utc::now();
        let credential = Credential::with_lifetime("token".to_string(), now, 3600);
        assert!(!credential.is_expired_at(now));
        assert!(!credential.is_expired_at(now + Duration::seconds(3599)));
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let now = Utc::now();
        let credential = Credential::with_lifetime("token".to_string(), now, 3600);
        // Expiration is inclusive: a token at exactly its expiry is stale.
        assert!(credential.is_expired_at(now + Duration::seconds(3600)));
        assert!(credential.is_expired_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_millis_round_trip() {
        let now = Utc::now();
        let credential = Credential::with_lifetime("token".to_string(), now, 3600);
        let millis = credential.expires_at_millis();
        let restored = Credential::expiry_from_millis(millis).unwrap();
        assert_eq!(restored.timestamp_millis(), millis);
    }

    #[test]
    fn test_expiry_from_millis_out_of_range() {
        assert!(Credential::expiry_from_millis(i64::MAX).is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential {
            access_token: "secret_access_token".to_string(),
            expires_at: Utc::now(),
        };
        let debug_str = format!("{:?}", credential);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret_access_token"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let credential = Credential::with_lifetime("token".to_string(), Utc::now(), 60);
        let json = serde_json::to_string(&credential).unwrap();
        let deserialized: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(credential.access_token, deserialized.access_token);
    }
}
