//! Token verification.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use campus_core::config::AuthConfig;

use super::claims::{Claims, TokenType};
use crate::error::TokenError;

/// Capability to verify a bearer token.
///
/// Access control depends on this trait rather than on [`JwtDecoder`] so it
/// can be exercised without a signing secret.
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and require its type to be one of `expected`.
    fn verify(&self, token: &str, expected: &[TokenType]) -> Result<Claims, TokenError>;
}

/// Validates HS256 tokens signed with the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        // Only HS256 is accepted; a token declaring any other algorithm fails.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token, requiring one of the expected types.
    pub fn verify(&self, token: &str, expected: &[TokenType]) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        if !expected.contains(&claims.token_type) {
            return Err(TokenError::WrongType);
        }

        Ok(claims)
    }

    /// Verifies an access token.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &[TokenType::Access])
    }

    /// Verifies a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &[TokenType::Refresh])
    }

    /// Verifies an invitation token.
    pub fn verify_invitation(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &[TokenType::Invitation])
    }
}

impl TokenVerifier for JwtDecoder {
    fn verify(&self, token: &str, expected: &[TokenType]) -> Result<Claims, TokenError> {
        JwtDecoder::verify(self, token, expected)
    }
}

/// Reads the subject claim without checking the signature or expiry.
///
/// For log correlation only. Never authorize anything with the result.
pub fn peek_subject(token: &str) -> Option<Uuid> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("sub")?.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use campus_entity::user::UserRole;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig::new(secret)
    }

    fn pair(secret: &str) -> (JwtEncoder, JwtDecoder) {
        let config = config(secret);
        (JwtEncoder::new(&config), JwtDecoder::new(&config))
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let (encoder, decoder) = pair("decoder-round-trip-secret-0123456789");
        let subject = Uuid::now_v7();
        let issued = encoder
            .issue(
                subject,
                UserRole::Teacher,
                TokenType::Access,
                chrono::Duration::minutes(15),
                None,
            )
            .unwrap();

        let claims = decoder.verify_access(&issued.token).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims.role, UserRole::Teacher);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.iat, claims.nbf);
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let (encoder, _) = pair("decoder-unique-jti-secret-0123456789");
        let subject = Uuid::now_v7();
        let ttl = chrono::Duration::minutes(15);
        let a = encoder
            .issue(subject, UserRole::Student, TokenType::Access, ttl, None)
            .unwrap();
        let b = encoder
            .issue(subject, UserRole::Student, TokenType::Access, ttl, None)
            .unwrap();
        assert_ne!(a.token, b.token);
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (encoder, decoder) = pair("decoder-expired-secret-0123456789ab");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7(),
            role: UserRole::Admin,
            token_type: TokenType::Access,
            jti: Uuid::new_v4(),
            iat: now - 3600,
            nbf: now - 3600,
            exp: now - 60,
            sid: None,
        };
        let token = encoder.sign(&claims).unwrap();
        assert_eq!(decoder.verify_access(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid_token_is_malformed() {
        let (encoder, decoder) = pair("decoder-nbf-secret-0123456789abcdef");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7(),
            role: UserRole::Admin,
            token_type: TokenType::Access,
            jti: Uuid::new_v4(),
            iat: now,
            nbf: now + 3600,
            exp: now + 7200,
            sid: None,
        };
        let token = encoder.sign(&claims).unwrap();
        assert_eq!(decoder.verify_access(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let (encoder, decoder) = pair("decoder-wrong-type-secret-0123456789");
        let issued = encoder
            .issue(
                Uuid::now_v7(),
                UserRole::Student,
                TokenType::Refresh,
                chrono::Duration::days(1),
                None,
            )
            .unwrap();
        assert_eq!(
            decoder.verify_access(&issued.token),
            Err(TokenError::WrongType)
        );
        assert!(decoder.verify_refresh(&issued.token).is_ok());
    }

    #[test]
    fn test_foreign_secret_is_bad_signature() {
        let (encoder, _) = pair("decoder-secret-number-one-0123456789");
        let (_, decoder) = pair("decoder-secret-number-two-0123456789");
        let issued = encoder
            .issue(
                Uuid::now_v7(),
                UserRole::Student,
                TokenType::Access,
                chrono::Duration::minutes(5),
                None,
            )
            .unwrap();
        assert_eq!(
            decoder.verify_access(&issued.token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_other_algorithm_is_bad_signature() {
        let secret = "decoder-algorithm-secret-0123456789ab";
        let (_, decoder) = pair(secret);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7(),
            role: UserRole::Admin,
            token_type: TokenType::Access,
            jti: Uuid::new_v4(),
            iat: now,
            nbf: now,
            exp: now + 600,
            sid: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            decoder.verify_access(&token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (_, decoder) = pair("decoder-garbage-secret-0123456789abc");
        assert_eq!(
            decoder.verify_access("not.a.token"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_peek_subject_ignores_signature() {
        let (encoder, _) = pair("decoder-peek-secret-0123456789abcdef");
        let subject = Uuid::now_v7();
        let issued = encoder
            .issue(
                subject,
                UserRole::Student,
                TokenType::Access,
                chrono::Duration::minutes(5),
                None,
            )
            .unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert_eq!(peek_subject(&tampered), Some(subject));
        assert_eq!(peek_subject("garbage"), None);
    }
}
