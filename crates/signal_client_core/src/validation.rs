//! crates/signal_client_core/src/validation.rs
//!
//! Client-side pre-flight checks, run before any request leaves the process.

use std::sync::OnceLock;

use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Why a form failed its pre-flight checks. The `Display` text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("verification code must be 6 digits")]
    InvalidVerificationCode,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("code pattern is a valid regex"))
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn is_valid_verification_code(code: &str) -> bool {
    code_pattern().is_match(code)
}

/// Checks the fields of a registration request.
///
/// The invite code is optional and never checked.
pub fn validate_registration(
    email: &str,
    password: &str,
    verification_code: &str,
) -> Result<(), ValidationError> {
    require("email", email)?;
    require("password", password)?;
    require("verification code", verification_code)?;

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_strong_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    if !is_valid_verification_code(verification_code) {
        return Err(ValidationError::InvalidVerificationCode);
    }
    Ok(())
}

/// Checks that a password and its confirmation agree.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    require("password confirmation", confirmation)?;
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
