//! Client-side form validation for registration and login

use regex::Regex;
use std::sync::OnceLock;

use super::models::{LoginRequest, RegisterRequest};
use crate::error::{Error, Result};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Compile-time constant pattern; a failure here is a bug in the codebase
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex - this is a bug")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// At least one uppercase letter, one lowercase letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Collect every rule violation in a registration form.
///
/// Only the first failing rule of each field is reported.
pub fn register_errors(request: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let username_len = request.username.chars().count();
    if request.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    } else if username_len < USERNAME_MIN {
        errors.push(format!(
            "Username must be at least {} characters",
            USERNAME_MIN
        ));
    } else if username_len > USERNAME_MAX {
        errors.push(format!("Username must not exceed {} characters", USERNAME_MAX));
    }

    if request.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(&request.email) {
        errors.push("Email is not valid".to_string());
    }

    if request.password.is_empty() {
        errors.push("Password is required".to_string());
    } else if request.password.chars().count() < PASSWORD_MIN {
        errors.push(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        ));
    } else if !is_strong_password(&request.password) {
        errors.push(
            "Password must contain at least one uppercase letter, one lowercase letter and one digit"
                .to_string(),
        );
    }

    errors
}

pub fn login_errors(request: &LoginRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if request.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    }
    if request.password.trim().is_empty() {
        errors.push("Password is required".to_string());
    }
    errors
}

pub fn validate_register(request: &RegisterRequest) -> Result<()> {
    into_result(register_errors(request))
}

pub fn validate_login(request: &LoginRequest) -> Result<()> {
    into_result(login_errors(request))
}

fn into_result(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
