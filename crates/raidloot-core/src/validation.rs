//! # Field Validation
//!
//! Synchronous checks for user-entered fields, shared by every frontend so
//! forms can reject bad input before a request is ever built. The backend
//! enforces the same rules; these exist to fail fast, not to replace it.

use thiserror::Error;

/// Minimum login-name length.
pub const MIN_USERNAME_LEN: usize = 3;
/// Maximum login-name length.
pub const MAX_USERNAME_LEN: usize = 50;
/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum character-name length.
pub const MIN_CHARACTER_NAME_LEN: usize = 2;
/// Maximum character-name length.
pub const MAX_CHARACTER_NAME_LEN: usize = 20;

// ─── Usernames ───────────────────────────────────────────────

/// Why a login name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    /// Shorter than [`MIN_USERNAME_LEN`].
    #[error("username must be at least {MIN_USERNAME_LEN} characters")]
    TooShort,
    /// Longer than [`MAX_USERNAME_LEN`].
    #[error("username must be at most {MAX_USERNAME_LEN} characters")]
    TooLong,
}

/// Check a login name against the length bounds.
///
/// # Examples
///
/// ```
/// use raidloot_core::validation::{validate_username, UsernameError};
///
/// assert!(validate_username("ahri").is_ok());
/// assert_eq!(validate_username("ab"), Err(UsernameError::TooShort));
/// ```
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LEN {
        Err(UsernameError::TooShort)
    } else if len > MAX_USERNAME_LEN {
        Err(UsernameError::TooLong)
    } else {
        Ok(())
    }
}

// ─── Passwords ───────────────────────────────────────────────

/// Why a password was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,
}

/// Check a password against the minimum length.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(PasswordError::TooShort)
    } else {
        Ok(())
    }
}

/// Coarse strength rating shown next to the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthRating {
    /// Score 0–2.
    Weak,
    /// Score 3–4.
    Fair,
    /// Score 5–6.
    Strong,
}

/// Score a password on six independent criteria.
///
/// One point each for: length ≥ 8, length ≥ 12, a lowercase letter, an
/// uppercase letter, a digit, and any character outside `[A-Za-z0-9]`.
/// The rating buckets the score: ≤ 2 weak, ≤ 4 fair, otherwise strong.
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    let mut score = 0u8;
    if len >= 8 {
        score += 1;
    }
    if len >= 12 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    let rating = match score {
        0..=2 => StrengthRating::Weak,
        3..=4 => StrengthRating::Fair,
        _ => StrengthRating::Strong,
    };
    PasswordStrength { score, rating }
}

/// Result of [`password_strength`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// Criteria met, 0–6.
    pub score: u8,
    /// Bucketed rating for display.
    pub rating: StrengthRating,
}

// ─── Email ───────────────────────────────────────────────────

/// Structural email check: non-empty local part, `@`, and a domain that
/// contains a dot with text on both sides. No whitespace or second `@`
/// anywhere. Deliverability is the backend's problem.
///
/// # Examples
///
/// ```
/// use raidloot_core::validation::is_valid_email;
///
/// assert!(is_valid_email("ahri@example.com"));
/// assert!(!is_valid_email("ahri@example"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let no_whitespace =
        |part: &str| !part.chars().any(char::is_whitespace);
    if !no_whitespace(local) || !no_whitespace(domain) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// ─── Character names ─────────────────────────────────────────

/// Why a character name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CharacterNameError {
    /// Shorter than [`MIN_CHARACTER_NAME_LEN`].
    #[error("character name must be at least {MIN_CHARACTER_NAME_LEN} characters")]
    TooShort,
    /// Longer than [`MAX_CHARACTER_NAME_LEN`].
    #[error("character name must be at most {MAX_CHARACTER_NAME_LEN} characters")]
    TooLong,
    /// Contains something other than Hangul, ASCII letters, digits, or
    /// spaces.
    #[error("character name may only contain Korean, English letters, digits, and spaces")]
    InvalidCharacters,
}

/// Check an in-game character name.
///
/// Accepted characters are Hangul syllables (가–힣), ASCII letters and
/// digits, and plain spaces; length is counted in characters, 2–20.
pub fn validate_character_name(name: &str) -> Result<(), CharacterNameError> {
    let len = name.chars().count();
    if len < MIN_CHARACTER_NAME_LEN {
        return Err(CharacterNameError::TooShort);
    }
    if len > MAX_CHARACTER_NAME_LEN {
        return Err(CharacterNameError::TooLong);
    }
    let allowed = |c: char| {
        ('\u{AC00}'..='\u{D7A3}').contains(&c) || c.is_ascii_alphanumeric() || c == ' '
    };
    if name.chars().all(allowed) {
        Ok(())
    } else {
        Err(CharacterNameError::InvalidCharacters)
    }
}

/// Convenience boolean form of [`validate_character_name`].
#[must_use]
pub fn is_valid_character_name(name: &str) -> bool {
    validate_character_name(name).is_ok()
}
