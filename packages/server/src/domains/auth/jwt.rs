use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::ProfileId;
use crate::domains::profiles::models::Role;

/// Session lifetime
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,          // Subject (profile_id as string)
    pub profile_id: ProfileId,
    pub phone_number: String, // For logging/debugging
    pub role: Role,           // Role at sign-in; authorization re-reads the profile
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,          // Unique token identifier
}

/// JWT Service - creates and verifies session tokens (HS256)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a session token for a profile. Expires after 24 hours.
    pub fn create_token(
        &self,
        profile_id: ProfileId,
        phone_number: String,
        role: Role,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(TOKEN_TTL_HOURS);

        let claims = Claims {
            sub: profile_id.to_string(),
            profile_id,
            phone_number,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify signature, expiry and issuer
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let profile_id = ProfileId::new();

        let token = service
            .create_token(profile_id, "+919876543210".to_string(), Role::Professional)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.profile_id, profile_id);
        assert_eq!(claims.sub, profile_id.to_string());
        assert_eq!(claims.phone_number, "+919876543210");
        assert_eq!(claims.role, Role::Professional);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1
            .create_token(ProfileId::new(), "+919876543210".to_string(), Role::Customer)
            .unwrap();

        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let issuer_a = JwtService::new("secret", "issuer_a".to_string());
        let issuer_b = JwtService::new("secret", "issuer_b".to_string());

        let token = issuer_a
            .create_token(ProfileId::new(), "+919876543210".to_string(), Role::Admin)
            .unwrap();

        assert!(issuer_b.verify_token(&token).is_err());
    }

    #[test]
    fn test_expiry_is_24_hours() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let token = service
            .create_token(ProfileId::new(), "+919876543210".to_string(), Role::Customer)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }
}
