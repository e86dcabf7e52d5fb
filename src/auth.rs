use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin username the token was issued to.
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

pub fn generate_token(
    secret: &str,
    subject: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = AdminClaims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(
    secret: &str,
    token: &str,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_tokens_verify() {
        let token = generate_token(SECRET, "admin").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(SECRET, "admin").unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(verify_token(SECRET, "not.a.token").is_err());
        assert!(verify_token(SECRET, "").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let past = Utc::now() - Duration::hours(2);
        let claims = AdminClaims {
            sub: "admin".into(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
