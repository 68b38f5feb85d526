use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;

/// JWT claims embedded in every issued token.
///
/// Possession proves identity for up to the configured window (7 days by
/// default). There is no revocation list; the auth layer re-checks the
/// live account-active flag on every request to compensate.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,
    /// Issuer tag
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            iss: config::config().security.jwt_issuer.clone(),
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    /// Current time exceeds the embedded expiry
    Expired,
    /// Signature does not match the configured secret
    InvalidSignature,
    /// Token cannot be decoded at all
    Malformed(String),
    /// No signing secret configured
    MissingSecret,
    Generation(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::InvalidSignature => write!(f, "invalid token signature"),
            TokenError::Malformed(msg) => write!(f, "malformed token: {}", msg),
            TokenError::MissingSecret => write!(f, "JWT secret not configured"),
            TokenError::Generation(msg) => write!(f, "JWT generation error: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issue a signed HS256 token embedding the user id, using the
/// configured secret and expiry window.
pub fn generate_jwt(user_id: Uuid) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    sign(secret, &Claims::new(user_id))
}

/// Decode and validate a token against the configured secret: signature,
/// expiry and issuer.
///
/// Pure computation - no store access, no suspension.
pub fn validate_jwt(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    verify(secret, &config::config().security.jwt_issuer, token)
}

fn sign(secret: &str, claims: &Claims) -> Result<String, TokenError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

fn verify(secret: &str, issuer: &str, token: &str) -> Result<Claims, TokenError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.set_issuer(&[issuer]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let issuer = &config::config().security.jwt_issuer;

        let token = sign(SECRET, &Claims::new(user_id)).unwrap();
        let claims = verify(SECRET, issuer, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(&claims.iss, issuer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expiry_window_is_seven_days_by_default() {
        let claims = Claims::new(Uuid::new_v4());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let issuer = config::config().security.jwt_issuer.clone();

        // Hand-craft a token whose exp is already in the past but whose
        // signature is otherwise valid.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: issuer.clone(),
            iat: now - 8 * 24 * 3600,
            exp: now - 24 * 3600,
        };
        let token = sign(SECRET, &claims).unwrap();

        match verify(SECRET, &issuer, &token) {
            Err(TokenError::Expired) => {}
            other => panic!("expected Expired, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid_signature() {
        let issuer = config::config().security.jwt_issuer.clone();

        let token = sign("some-other-secret", &Claims::new(Uuid::new_v4())).unwrap();

        match verify(SECRET, &issuer, &token) {
            Err(TokenError::InvalidSignature) => {}
            other => panic!("expected InvalidSignature, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let claims = Claims {
            iss: "some-other-service".to_string(),
            ..Claims::new(Uuid::new_v4())
        };
        let token = sign(SECRET, &claims).unwrap();

        assert!(verify(SECRET, &config::config().security.jwt_issuer, &token).is_err());
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        match verify(SECRET, "venture-api", "not-a-jwt-at-all") {
            Err(TokenError::Malformed(_)) => {}
            other => panic!("expected Malformed, got {:?}", other.map(|c| c.sub)),
        }
    }
}
