//! Sign-in and sign-up form rules.
//!
//! Pure functions over the raw field values so the rules are unit-tested
//! without a DOM. Each field reports only its first failing rule, in the
//! order the checks are listed.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";
pub const FIELD_PHONE_NUMBER: &str = "phoneNumber";
pub const FIELD_AGREE_TERMS: &str = "agreeTerms";

const MIN_PASSWORD_CHARS: usize = 6;
const MIN_FULL_NAME_CHARS: usize = 2;

/// Optional country code, optional separator, then ten ASCII digits.
const PHONE_PATTERN: &str = r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{10}$";

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a vetted literal"));

/// Per-field error messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, &'static str>,
}

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInValues {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpValues {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub agree_terms: bool,
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add(FIELD_EMAIL, "Please enter your email");
    } else if !email.validate_email() {
        errors.add(FIELD_EMAIL, "Invalid email address");
    }
}

fn check_password_length(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.add(FIELD_PASSWORD, "Please enter your password");
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add(FIELD_PASSWORD, "Password must be at least 6 characters");
    }
}

fn has_mixed_case_and_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Message for an unusable email, as the forms would show it.
pub fn email_error(email: &str) -> Option<&'static str> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    errors.get(FIELD_EMAIL)
}

/// Whether `phone` is ten digits with an optional `+`/country-code prefix.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// # Errors
///
/// Returns the failing fields and their messages.
pub fn validate_sign_in(values: &SignInValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &values.email);
    check_password_length(&mut errors, &values.password);
    errors.into_result()
}

/// # Errors
///
/// Returns the failing fields and their messages.
pub fn validate_sign_up(values: &SignUpValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let full_name = values.full_name.trim();
    if full_name.is_empty() {
        errors.add(FIELD_FULL_NAME, "Please enter your full name");
    } else if full_name.chars().count() < MIN_FULL_NAME_CHARS {
        errors.add(FIELD_FULL_NAME, "Full name must be at least 2 characters");
    }

    check_email(&mut errors, &values.email);

    check_password_length(&mut errors, &values.password);
    if !has_mixed_case_and_digit(&values.password) {
        errors.add(
            FIELD_PASSWORD,
            "Password must contain an uppercase letter, a lowercase letter and a number",
        );
    }

    if values.confirm_password.is_empty() {
        errors.add(FIELD_CONFIRM_PASSWORD, "Please confirm your password");
    } else if values.confirm_password != values.password {
        errors.add(FIELD_CONFIRM_PASSWORD, "Passwords do not match");
    }

    let phone = values.phone_number.trim();
    if phone.is_empty() {
        errors.add(FIELD_PHONE_NUMBER, "Please enter your phone number");
    } else if !is_valid_phone(phone) {
        errors.add(
            FIELD_PHONE_NUMBER,
            "Invalid phone number. Please enter a 10-digit number",
        );
    }

    if !values.agree_terms {
        errors.add(FIELD_AGREE_TERMS, "You must accept the terms of use");
    }

    errors.into_result()
}
