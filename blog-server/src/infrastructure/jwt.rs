use crate::domain::{AuthUser, DomainError, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub exp: usize,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Result<Self, DomainError> {
        tracing::debug!(
            "Initializing JwtService with secret length: {}",
            secret.len()
        );

        if secret.is_empty() {
            return Err(DomainError::InternalError(
                "JWT secret must not be empty".to_string(),
            ));
        }

        if secret.len() < 32 {
            tracing::warn!(
                "JWT secret is too short ({} chars). Minimum recommended is 32 chars.",
                secret.len()
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn generate_token(&self, user: &User) -> Result<String, DomainError> {
        tracing::debug!(
            "Generating token for user_id: {}, username: {}",
            user.id,
            user.username
        );

        let expiration = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            DomainError::InternalError(format!("Failed to generate token: {}", e))
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthUser, DomainError> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => {
                tracing::debug!("Token verified for user_id: {}", token_data.claims.sub);
                Ok(AuthUser {
                    id: token_data.claims.sub,
                    username: token_data.claims.username,
                    email: token_data.claims.email,
                })
            }
            Err(e) => {
                tracing::warn!("Token verification failed: {}", e);
                Err(DomainError::Unauthorized("Invalid or expired token".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jane_smith".into(),
            email: "jane@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let jwt = JwtService::new("test-secret-that-is-long-enough-1234").unwrap();
        let user = user();
        let token = jwt.generate_token(&user).unwrap();

        let identity = jwt.verify_token(&token).unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.username, "jane_smith");
        assert_eq!(identity.email, "jane@example.com");
    }

    #[test]
    fn foreign_signature_is_unauthorized() {
        let ours = JwtService::new("test-secret-that-is-long-enough-1234").unwrap();
        let theirs = JwtService::new("another-secret-that-is-long-enough-99").unwrap();
        let token = theirs.generate_token(&user()).unwrap();

        assert!(matches!(
            ours.verify_token(&token),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(ours.verify_token("garbage").is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(JwtService::new("").is_err());
    }
}
