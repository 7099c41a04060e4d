//! Registration input rules: email shape, password strength, company slug.

use std::sync::LazyLock;

use regex::Regex;

use super::error::AccountError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static COMPANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("company pattern compiles"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Longest first name, last name or company slug.
pub const MAX_NAME_LEN: usize = 100;

/// Longest email address.
pub const MAX_EMAIL_LEN: usize = 255;

/// Fails when `value` has more than `max` characters.
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), AccountError> {
    if value.chars().count() > max {
        Err(AccountError::TooLong { field, max })
    } else {
        Ok(())
    }
}

/// Whether `email` has the `local@domain.tld` shape.
pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trims and lowercases an email, then checks its length and the
/// `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Result<String, AccountError> {
    let email = raw.trim().to_lowercase();
    check_length("email", &email, MAX_EMAIL_LEN)?;
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(AccountError::InvalidEmail)
    }
}

/// Checks that a password has at least eight characters including an
/// uppercase letter, a lowercase letter, a digit and a symbol.
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        Err(AccountError::WeakPassword)
    }
}

/// Turns a company display name into its tenant slug.
///
/// Lowercases, replaces whitespace runs with `-` and drops ASCII punctuation
/// other than `-`; the result must match `[a-z0-9]+(-[a-z0-9]+)*` and fit
/// in [`MAX_NAME_LEN`] characters.
/// `"My Co!"` becomes `"my-co"`, `"Café Co"` is rejected.
pub fn normalize_company_name(raw: &str) -> Result<String, AccountError> {
    let lowered = raw.trim().to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(&lowered, "-");
    let slug: String = hyphenated
        .chars()
        .filter(|c| *c == '-' || !c.is_ascii_punctuation())
        .collect();

    if COMPANY_RE.is_match(&slug) {
        check_length("companyName", &slug, MAX_NAME_LEN)?;
        Ok(slug)
    } else {
        Err(AccountError::InvalidCompanyName)
    }
}
