//! Identity token issuance and verification.
//!
//! Every authenticated request carries a signed, time-limited bearer token
//! whose subject is the user ID. The rest of the system trusts the ID the
//! [`Authenticator`] extracts; it never inspects credentials itself.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Claims carried by an identity token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user ID.
    sub: String,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Issues and verifies signed identity tokens.
///
/// Constructed once at startup from [`crate::config::AuthConfig`] and passed
/// to whoever needs it; the signing secret never lives in global state.
#[derive(Clone)]
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Authenticator {
    /// Create an authenticator from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for the given user ID.
    pub fn issue(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return the user ID it carries.
    ///
    /// Fails with [`AppError::Unauthorized`] on a bad signature or an
    /// expired token.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::Unauthorized)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are secret material; show only the lifetime.
        f.debug_struct("Authenticator").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let auth = Authenticator::new("test_secret", Duration::days(7));
        let token = auth.issue("user1").unwrap();

        let user_id = auth.verify(&token).unwrap();
        assert_eq!(user_id, "user1");
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = Authenticator::new("test_secret", Duration::days(7));
        let result = auth.verify("not.a.token");

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = Authenticator::new("secret_a", Duration::days(7));
        let verifier = Authenticator::new("secret_b", Duration::days(7));

        let token = issuer.issue("user1").unwrap();
        let result = verifier.verify(&token);

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Expiry far enough in the past to clear the default leeway.
        let auth = Authenticator::new("test_secret", Duration::hours(-2));
        let token = auth.issue("user1").unwrap();

        let result = auth.verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
