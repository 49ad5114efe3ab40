//! Authentication form workflows
//!
//! Input shapes and validation for the login, registration, and
//! change-password forms. Field rules delegate to
//! [`raidloot_core::validation`]; this layer adds cross-field checks
//! (password confirmation) and the required/empty checks a form needs
//! before it is worth building a request.

use raidloot_core::validation::{
    is_valid_email, validate_password, validate_username, PasswordError, UsernameError,
};
use thiserror::Error;

// ============================================================================
// Login
// ============================================================================

/// Login form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    /// Login name as typed.
    pub username: String,
    /// Password as typed.
    pub password: String,
}

/// Login form validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Username field is empty or whitespace-only
    #[error("Enter your username")]
    UsernameEmpty,
    /// Password field is empty
    #[error("Enter your password")]
    PasswordEmpty,
}

/// Validate the login form.
///
/// Login only checks for presence. The backend decides whether the
/// credentials are right, and stale accounts may predate today's length
/// rules.
pub fn validate_login(input: &LoginInput) -> Result<(), LoginError> {
    if input.username.trim().is_empty() {
        return Err(LoginError::UsernameEmpty);
    }
    if input.password.is_empty() {
        return Err(LoginError::PasswordEmpty);
    }
    Ok(())
}

/// Boolean shorthand for [`validate_login`].
#[must_use]
pub fn is_valid_login(input: &LoginInput) -> bool {
    validate_login(input).is_ok()
}

/// Whether the login form's submit control should be enabled.
#[must_use]
pub fn can_submit_login(input: &LoginInput, in_flight: bool) -> bool {
    is_valid_login(input) && !in_flight
}

// ============================================================================
// Registration
// ============================================================================

/// Registration form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterInput {
    /// Desired login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Desired password.
    pub password: String,
    /// Password repeated for confirmation.
    pub confirm_password: String,
}

/// Registration form validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Username failed the length rules
    #[error("{0}")]
    Username(UsernameError),
    /// Email is not structurally valid
    #[error("Enter a valid email address")]
    EmailInvalid,
    /// Password failed the length rule
    #[error("{0}")]
    Password(PasswordError),
    /// Confirmation does not match the password
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Validate the registration form, reporting the first offending field in
/// form order (username, email, password, confirmation).
pub fn validate_register(input: &RegisterInput) -> Result<(), RegisterError> {
    validate_username(input.username.trim()).map_err(RegisterError::Username)?;
    if !is_valid_email(input.email.trim()) {
        return Err(RegisterError::EmailInvalid);
    }
    validate_password(&input.password).map_err(RegisterError::Password)?;
    if input.password != input.confirm_password {
        return Err(RegisterError::PasswordMismatch);
    }
    Ok(())
}

/// Boolean shorthand for [`validate_register`].
#[must_use]
pub fn is_valid_register(input: &RegisterInput) -> bool {
    validate_register(input).is_ok()
}

/// Whether the registration form's submit control should be enabled.
#[must_use]
pub fn can_submit_register(input: &RegisterInput, in_flight: bool) -> bool {
    is_valid_register(input) && !in_flight
}

// ============================================================================
// Change Password
// ============================================================================

/// Change-password form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordInput {
    /// The password in use today.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
    /// Replacement repeated for confirmation.
    pub confirm_password: String,
}

/// Change-password form validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangePasswordError {
    /// Current password field is empty
    #[error("Enter your current password")]
    CurrentEmpty,
    /// New password failed the length rule
    #[error("{0}")]
    NewPassword(PasswordError),
    /// Confirmation does not match the new password
    #[error("New passwords do not match")]
    ConfirmMismatch,
}

/// Validate the change-password form. Whether `current_password` is
/// actually right is the backend's call.
pub fn validate_change_password(input: &ChangePasswordInput) -> Result<(), ChangePasswordError> {
    if input.current_password.is_empty() {
        return Err(ChangePasswordError::CurrentEmpty);
    }
    validate_password(&input.new_password).map_err(ChangePasswordError::NewPassword)?;
    if input.new_password != input.confirm_password {
        return Err(ChangePasswordError::ConfirmMismatch);
    }
    Ok(())
}

/// Whether the change-password form's submit control should be enabled.
#[must_use]
pub fn can_submit_change_password(input: &ChangePasswordInput, in_flight: bool) -> bool {
    validate_change_password(input).is_ok() && !in_flight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert!(validate_login(&login("ahri", "secret")).is_ok());
        assert_eq!(
            validate_login(&login("   ", "secret")),
            Err(LoginError::UsernameEmpty)
        );
        assert_eq!(
            validate_login(&login("ahri", "")),
            Err(LoginError::PasswordEmpty)
        );
    }

    #[test]
    fn test_can_submit_login_blocks_while_in_flight() {
        let input = login("ahri", "secret");
        assert!(can_submit_login(&input, false));
        assert!(!can_submit_login(&input, true));
        assert!(!can_submit_login(&login("", ""), false));
    }

    fn register() -> RegisterInput {
        RegisterInput {
            username: "ahri".to_owned(),
            email: "ahri@example.com".to_owned(),
            password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
        }
    }

    #[test]
    fn test_register_reports_first_offending_field() {
        assert!(validate_register(&register()).is_ok());

        let mut input = register();
        input.username = "ab".to_owned();
        assert!(matches!(
            validate_register(&input),
            Err(RegisterError::Username(UsernameError::TooShort))
        ));

        let mut input = register();
        input.email = "not-an-email".to_owned();
        assert_eq!(validate_register(&input), Err(RegisterError::EmailInvalid));

        let mut input = register();
        input.password = "short".to_owned();
        input.confirm_password = "short".to_owned();
        assert!(matches!(
            validate_register(&input),
            Err(RegisterError::Password(PasswordError::TooShort))
        ));

        let mut input = register();
        input.confirm_password = "different1".to_owned();
        assert_eq!(
            validate_register(&input),
            Err(RegisterError::PasswordMismatch)
        );
    }

    #[test]
    fn test_register_trims_username_and_email_only() {
        let mut input = register();
        input.username = "  ahri  ".to_owned();
        input.email = " ahri@example.com ".to_owned();
        assert!(is_valid_register(&input));

        // Passwords are compared exactly as typed.
        let mut input = register();
        input.confirm_password = format!("{} ", input.password);
        assert!(!is_valid_register(&input));
    }

    #[test]
    fn test_change_password_rules() {
        let input = ChangePasswordInput {
            current_password: "old-secret".to_owned(),
            new_password: "new-secret".to_owned(),
            confirm_password: "new-secret".to_owned(),
        };
        assert!(validate_change_password(&input).is_ok());
        assert!(can_submit_change_password(&input, false));
        assert!(!can_submit_change_password(&input, true));

        let mut missing_current = input.clone();
        missing_current.current_password.clear();
        assert_eq!(
            validate_change_password(&missing_current),
            Err(ChangePasswordError::CurrentEmpty)
        );

        let mut short = input.clone();
        short.new_password = "sixsix".to_owned();
        short.confirm_password = "sixsix".to_owned();
        assert!(validate_change_password(&short).is_ok());
        short.new_password = "four".to_owned();
        short.confirm_password = "four".to_owned();
        assert!(matches!(
            validate_change_password(&short),
            Err(ChangePasswordError::NewPassword(PasswordError::TooShort))
        ));

        let mut mismatch = input;
        mismatch.confirm_password = "other-secret".to_owned();
        assert_eq!(
            validate_change_password(&mismatch),
            Err(ChangePasswordError::ConfirmMismatch)
        );
    }
}
