use crate::errors::DomainError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Signed, time-limited session tokens bound to a user id. Verification is
/// a pure signature check; there is no server-side revocation list.
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        let expires = Utc::now() + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires.timestamp().max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::RepositoryError(format!("token signing failed: {}", e)))
    }

    /// Returns the user id the token is bound to. Bad signature, expiry and
    /// malformed input all collapse into the same Unauthorized error.
    pub fn verify(&self, token: &str) -> Result<Uuid, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| DomainError::Unauthorized("Not authorized, token failed".to_string()))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| DomainError::Unauthorized("Not authorized, token failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_round_trip() {
        let sessions = SessionService::new("test-secret", 30);
        let user_id = Uuid::new_v4();

        let token = sessions.issue(user_id).unwrap();
        assert_eq!(sessions.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let sessions = SessionService::new("test-secret", 30);
        let mut token = sessions.issue(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(matches!(
            sessions.verify(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let sessions = SessionService::new("test-secret", 30);
        let other = SessionService::new("other-secret", 30);

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(sessions.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // TTL in the past, well beyond the default validation leeway.
        let sessions = SessionService::new("test-secret", -2);

        let token = sessions.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            sessions.verify(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let sessions = SessionService::new("test-secret", 30);
        assert!(sessions.verify("not-a-token").is_err());
        assert!(sessions.verify("").is_err());
    }
}
