//! Request field checks.
//!
//! Handlers run every check first and call [`Validator::finish`] before
//! touching the store, so a single response lists all failing fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FieldError, PortalError, Result};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Minimum password length accepted on registration and password changes.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed, non-empty value. Records `message` otherwise.
    pub fn required(&mut self, field: &str, value: Option<&str>, message: &str) -> String {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => {
                self.fail(field, message);
                String::new()
            }
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(v) if is_email(v) => v.to_string(),
            _ => {
                self.fail(field, "Valid email is required");
                String::new()
            }
        }
    }

    /// Like [`Validator::email`] but an absent or blank value is accepted as `None`.
    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let v = value.map(str::trim).filter(|v| !v.is_empty())?;
        if is_email(v) {
            Some(v.to_string())
        } else {
            self.fail(field, "Valid email is required");
            None
        }
    }

    /// Password of at least [`MIN_PASSWORD_LEN`] characters. Not trimmed.
    pub fn password(&mut self, field: &str, value: Option<&str>, label: &str) -> String {
        match value {
            Some(v) if v.chars().count() >= MIN_PASSWORD_LEN => v.to_string(),
            _ => {
                self.fail(
                    field,
                    &format!("{label} must be at least {MIN_PASSWORD_LEN} characters"),
                );
                String::new()
            }
        }
    }

    /// Optional integer query parameter. Blank counts as absent.
    pub fn optional_int(&mut self, field: &str, value: Option<&str>) -> Option<i32> {
        let v = value.map(str::trim).filter(|v| !v.is_empty())?;
        match v.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.fail(field, &format!("{field} must be an integer"));
                None
            }
        }
    }

    pub fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(PortalError::Validation(self.errors))
        }
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Validates the `:hallticketnumber` path segment.
pub fn hall_ticket(raw: &str) -> Result<String> {
    let mut v = Validator::new();
    let ht = v.required("hallticketnumber", Some(raw), "Hall ticket number is required");
    v.finish()?;
    Ok(ht)
}
