//! Token creation with a shared HMAC secret.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use campus_core::config::AuthConfig;
use campus_entity::session::{AccessToken, RefreshToken, TokenPair};
use campus_entity::user::UserRole;

use super::claims::{Claims, TokenType};
use crate::error::AuthError;

/// A freshly signed token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The raw JWT string.
    pub token: String,
    /// The signed claims.
    pub claims: Claims,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: chrono::Duration,
    /// Refresh token lifetime.
    refresh_ttl: chrono::Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
        }
    }

    /// Issues a token of the given type, valid from now for `ttl`.
    pub fn issue(
        &self,
        subject: Uuid,
        role: UserRole,
        token_type: TokenType,
        ttl: chrono::Duration,
        session_id: Option<Uuid>,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::Internal(format!("Token lifetime {ttl} is out of range"))
        })?;
        let claims = Claims {
            sub: subject,
            role,
            token_type,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            sid: session_id,
        };
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            claims,
            expires_at,
        })
    }

    /// Signs arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {e}")))
    }

    /// Generates a new access + refresh token pair for the given user and session.
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        role: UserRole,
    ) -> Result<TokenPair, AuthError> {
        let access = self.issue(
            user_id,
            role,
            TokenType::Access,
            self.access_ttl,
            Some(session_id),
        )?;
        let refresh = self.issue(
            user_id,
            role,
            TokenType::Refresh,
            self.refresh_ttl,
            Some(session_id),
        )?;

        Ok(TokenPair {
            access_token: AccessToken {
                token: access.token,
                expires_at: access.expires_at,
            },
            refresh_token: RefreshToken {
                token: refresh.token,
                expires_at: refresh.expires_at,
            },
        })
    }

    /// Refresh token lifetime, which is also the session row lifetime.
    pub fn refresh_ttl(&self) -> chrono::Duration {
        self.refresh_ttl
    }
}
