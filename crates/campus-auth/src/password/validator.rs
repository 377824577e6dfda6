//! Password policy enforcement for new passwords.

use campus_core::config::PasswordPolicyConfig;

use crate::error::AuthError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    policy: PasswordPolicyConfig,
}

impl PasswordValidator {
    /// Creates a new validator from the password policy.
    pub fn new(policy: &PasswordPolicyConfig) -> Self {
        Self {
            policy: policy.clone(),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements, or a
    /// [`AuthError::WeakSecret`] listing every unmet requirement.
    pub fn validate(&self, password: &str) -> Result<(), AuthError> {
        self.validate_with_context(password, &[])
    }

    /// Like [`Self::validate`], also penalizing passwords built from
    /// `user_inputs` (username, email) in the entropy check.
    pub fn validate_with_context(
        &self,
        password: &str,
        user_inputs: &[&str],
    ) -> Result<(), AuthError> {
        let mut length = 0usize;
        let mut upper = false;
        let mut lower = false;
        let mut digit = false;
        let mut symbol = false;

        for c in password.chars() {
            length += 1;
            if c.is_uppercase() {
                upper = true;
            } else if c.is_lowercase() {
                lower = true;
            } else if c.is_ascii_digit() {
                digit = true;
            } else if !c.is_alphanumeric() {
                symbol = true;
            }
        }

        let mut missing = Vec::new();
        if length < self.policy.min_length {
            missing.push(format!("at least {} characters", self.policy.min_length));
        }
        if self.policy.require_uppercase && !upper {
            missing.push("an uppercase letter".to_string());
        }
        if self.policy.require_lowercase && !lower {
            missing.push("a lowercase letter".to_string());
        }
        if self.policy.require_digit && !digit {
            missing.push("a digit".to_string());
        }
        if self.policy.require_symbol && !symbol {
            missing.push("a symbol".to_string());
        }

        if self.policy.min_entropy_score > 0 && !password.is_empty() {
            let score = zxcvbn::zxcvbn(password, user_inputs).score() as u8;
            if score < self.policy.min_entropy_score {
                missing.push("more variety (it is too easy to guess)".to_string());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::WeakSecret { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(result: Result<(), AuthError>) -> Vec<String> {
        match result {
            Err(AuthError::WeakSecret { missing }) => missing,
            other => panic!("expected WeakSecret, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_compliant_password() {
        let validator = PasswordValidator::new(&PasswordPolicyConfig::default());
        assert!(validator.validate("Abc12345!").is_ok());
    }

    #[test]
    fn test_aggregates_every_missing_requirement() {
        let validator = PasswordValidator::new(&PasswordPolicyConfig::default());
        let missing = missing(validator.validate("abc"));
        assert_eq!(
            missing,
            vec![
                "at least 8 characters",
                "an uppercase letter",
                "a digit",
                "a symbol",
            ]
        );
    }

    #[test]
    fn test_disabled_requirements_are_skipped() {
        let policy = PasswordPolicyConfig {
            require_symbol: false,
            require_uppercase: false,
            ..PasswordPolicyConfig::default()
        };
        let validator = PasswordValidator::new(&policy);
        assert!(validator.validate("abcd1234").is_ok());
    }

    #[test]
    fn test_entropy_floor() {
        let policy = PasswordPolicyConfig {
            min_entropy_score: 3,
            ..PasswordPolicyConfig::default()
        };
        let validator = PasswordValidator::new(&policy);
        let missing = missing(validator.validate("Password1!"));
        assert_eq!(missing.len(), 1);
    }
}
