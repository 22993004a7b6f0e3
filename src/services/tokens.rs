//! Credential issuance: short-lived access tokens and rotating refresh
//! tokens, both carrying the user's id, role, and username as claims.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::db::User;
use crate::entities::users::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims are trusted without a storage lookup until expiry; only the refresh
/// blacklist is consulted beyond the signature check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub token_type: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            access_ttl_secs: security.access_ttl_minutes * 60,
            refresh_ttl_secs: security.refresh_ttl_days * 24 * 60 * 60,
        }
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(TokenKind::Access, user.id, &user.username, user.role)?,
            refresh: self.issue(TokenKind::Refresh, user.id, &user.username, user.role)?,
        })
    }

    pub fn issue_access(
        &self,
        user_id: i32,
        username: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        self.issue(TokenKind::Access, user_id, username, role)
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: i32,
        username: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            token_type: kind,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// Signature + expiry check, then a kind check so a refresh token can
    /// never authenticate a request and vice versa.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        if data.claims.token_type != expected {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecurityConfig::default())
    }

    fn user() -> User {
        User {
            id: 7,
            username: "farmer7".to_string(),
            email: "farmer7@example.com".to_string(),
            role: Role::Farmer,
            profile_icon: None,
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn issued_claims_round_trip() {
        let svc = service();
        let pair = svc.issue_pair(&user()).unwrap();

        let access = svc.verify(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(access.sub, "7");
        assert_eq!(access.username, "farmer7");
        assert_eq!(access.role, Role::Farmer);

        let refresh = svc.verify(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.token_type, TokenKind::Refresh);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn refresh_token_is_rejected_as_access() {
        let svc = service();
        let pair = svc.issue_pair(&user()).unwrap();

        assert!(matches!(
            svc.verify(&pair.refresh, TokenKind::Access),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            svc.verify(&pair.access, TokenKind::Refresh),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        let svc = service();
        assert!(matches!(
            svc.verify("not-a-token", TokenKind::Access),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let svc = service();
        let other = TokenService::new(&SecurityConfig {
            jwt_secret: "a-different-secret".to_string(),
            ..SecurityConfig::default()
        });

        let pair = other.issue_pair(&user()).unwrap();
        assert!(svc.verify(&pair.access, TokenKind::Access).is_err());
    }
}
