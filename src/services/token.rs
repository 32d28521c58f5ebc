//! Signed, time-limited identity tokens (HS256 JWT).
//!
//! A token carries the user id as `sub` and an absolute `exp`. Whoever holds a
//! token that verifies is treated as that user: there is no server-side
//! session, binding or revocation list, so a leaked token stays usable until
//! it expires.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Lifetime of tokens issued on signup and signin.
pub const TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(
        &self,
        subject_id: i32,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(subject_id, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject_id: i32,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            iat,
            exp: iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Returns the subject id of a correctly signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Expiry is checked here rather than by `jsonwebtoken` so the clock can be
    /// supplied; a token is still valid at exactly `exp` and there is no leeway.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i32, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| AuthError::Invalid)?;

        if now.timestamp() > data.claims.exp {
            return Err(AuthError::Expired);
        }
        data.claims.sub.parse().map_err(|_| AuthError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = TokenService::new("Tomato");
        let token = tokens.issue(42, TOKEN_TTL).unwrap();
        assert_eq!(tokens.verify(&token), Ok(42));
    }

    #[test]
    fn test_expires_one_second_after_a_day() {
        let tokens = TokenService::new("Tomato");
        let token = tokens.issue_at(5, TOKEN_TTL, t0()).unwrap();

        let at_expiry = t0() + chrono::Duration::days(1);
        assert_eq!(tokens.verify_at(&token, at_expiry), Ok(5));

        let after = at_expiry + chrono::Duration::seconds(1);
        assert_eq!(tokens.verify_at(&token, after), Err(AuthError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = TokenService::new("Tomato").issue(1, TOKEN_TTL).unwrap();
        assert_eq!(
            TokenService::new("Potato").verify(&token),
            Err(AuthError::Invalid)
        );
    }

    #[test]
    fn test_tampered_and_malformed_tokens_are_invalid() {
        let tokens = TokenService::new("Tomato");
        let token = tokens.issue(1, TOKEN_TTL).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(tokens.verify(&tampered), Err(AuthError::Invalid));
        assert_eq!(tokens.verify("not.a.token"), Err(AuthError::Invalid));
        assert_eq!(tokens.verify(""), Err(AuthError::Invalid));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            sub: "tomato".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"Tomato"),
        )
        .unwrap();
        assert_eq!(
            TokenService::new("Tomato").verify(&token),
            Err(AuthError::Invalid)
        );
    }
}
