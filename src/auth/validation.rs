//! Form validation run before any provider call

use crate::error::{BudgetError, BudgetResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form fields
#[derive(Debug, Clone, Default)]
pub struct SignUpForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub full_name: &'a str,
}

fn invalid(message: &str) -> BudgetError {
    BudgetError::Validation(message.to_string())
}

/// Loose shape check: one `@`, a non-empty local part, a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

pub fn validate_sign_in(email: &str, password: &str) -> BudgetResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(invalid("Please enter both email and password"));
    }
    if !is_valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

pub fn validate_sign_up(form: &SignUpForm<'_>) -> BudgetResult<()> {
    if form.email.trim().is_empty() || form.password.is_empty() || form.full_name.trim().is_empty() {
        return Err(invalid("Please fill in all required fields"));
    }
    if !is_valid_email(form.email) {
        return Err(invalid("Please enter a valid email address"));
    }
    if form.password != form.confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters long"));
    }
    Ok(())
}

pub fn validate_reset_request(email: &str) -> BudgetResult<()> {
    if email.trim().is_empty() {
        return Err(invalid("Please enter your email address"));
    }
    if !is_valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}
