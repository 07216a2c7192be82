//! Bearer token issue/verify.
//!
//! Tokens are stateless HS256 JWTs carrying the subject id and an audience
//! tag, valid for 30 days. There is no revocation list: logout is a
//! client-side discard, and an issued token stays valid until natural
//! expiry. A deliberate simplicity trade-off, not a bug.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Which identity table a token's subject resolves against.
///
/// Users and admins are parallel identity types with colliding integer id
/// spaces, so the audience travels in the token to keep the two guards
/// disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    User,
    Admin,
}

impl Audience {
    const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Token verification/issuance failure.
///
/// Deliberately opaque: callers must treat bad signature, expiry, and wrong
/// audience identically (401) and not leak which one it was.
#[derive(Debug, Error)]
#[error("invalid token")]
pub struct TokenError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32,
    aud: Audience,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    /// Create a token issuer from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for the given subject, expiring 30 days out.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if signing fails.
    pub fn issue(&self, subject: i32, audience: Audience) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, audience, Duration::days(TOKEN_TTL_DAYS))
    }

    fn issue_with_ttl(
        &self,
        subject: i32,
        audience: Audience,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            aud: audience,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError)
    }

    /// Verify a token against the expected audience and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` on any failure: bad signature, expired, or a
    /// token issued for the other audience.
    pub fn verify(&self, token: &str, audience: Audience) -> Result<i32, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience.as_str()]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| TokenError)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("k9!mQ2@xV7#bN4$wR8%jT1&yU5*zL3^a"))
    }

    #[test]
    fn test_roundtrip() {
        let tokens = issuer();
        let token = tokens.issue(42, Audience::User).unwrap();
        assert_eq!(tokens.verify(&token, Audience::User).unwrap(), 42);
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let tokens = issuer();
        let token = tokens.issue(1, Audience::User).unwrap();
        assert!(tokens.verify(&token, Audience::Admin).is_err());

        let token = tokens.issue(1, Audience::Admin).unwrap();
        assert!(tokens.verify(&token, Audience::User).is_err());
    }

    #[test]
    fn test_expired_rejected() {
        let tokens = issuer();
        // Expired well past the default validation leeway
        let token = tokens
            .issue_with_ttl(7, Audience::User, Duration::hours(-2))
            .unwrap();
        assert!(tokens.verify(&token, Audience::User).is_err());
    }

    #[test]
    fn test_tampered_rejected() {
        let tokens = issuer();
        let token = tokens.issue(7, Audience::User).unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(tokens.verify(&tampered, Audience::User).is_err());

        // A token signed with a different secret fails too
        let other = TokenIssuer::new(&SecretString::from("p4$dG8!sW2@hJ6#kM0%fC9&vB3*nX7^q"));
        let foreign = other.issue(7, Audience::User).unwrap();
        assert!(tokens.verify(&foreign, Audience::User).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = issuer();
        assert!(tokens.verify("", Audience::User).is_err());
        assert!(tokens.verify("not.a.jwt", Audience::User).is_err());
    }
}
