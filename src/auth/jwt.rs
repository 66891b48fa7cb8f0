use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the HTTP-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Sessions expire a fixed 3 days after issuance. There is no refresh or
/// rotation path; clients log in again.
pub const SESSION_TTL_DAYS: i64 = 3;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: i64,
}

/// Create a signed session token for the given user.
pub fn issue_session_token(user_id: Uuid, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(SESSION_TTL_DAYS))
        .ok_or(AppError::Internal)?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal)
}

/// Verify a session token and extract the user id it was issued for.
///
/// Fails with `Unauthenticated` on a bad signature, a malformed payload or
/// an expired token.
pub fn verify_session_token(token: &str, secret: &str) -> Result<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthenticated("Invalid or expired token".to_string()))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_roundtrips() {
        let user_id = Uuid::new_v4();
        let token = issue_session_token(user_id, SECRET).unwrap();
        assert_eq!(verify_session_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token(Uuid::new_v4(), SECRET).unwrap();
        assert!(verify_session_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_session_token("not-a-token", SECRET).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_session_token(&token, SECRET).is_err());
    }
}
