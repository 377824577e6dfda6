//! Username and email rules shared by bootstrap and invitations.

use validator::ValidateEmail;

use crate::error::AuthError;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 2;
/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 64;

/// Trim and check a username: 2-64 ASCII letters, digits, `.`, `_` or `-`.
pub fn validate_username(username: &str) -> Result<String, AuthError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(AuthError::InvalidInput(format!(
            "Username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(AuthError::InvalidInput(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }
    Ok(username.to_string())
}

/// Trim, lowercase and check an email address.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AuthError::InvalidInput("Invalid email address".to_string()));
    }
    Ok(email)
}
