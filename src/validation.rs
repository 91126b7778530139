// Request body validation producing `{ field, message }` lists

use url::Url;

use crate::error::{ApiError, FieldError};

/// Request bodies check their own shape before any handler logic runs
pub trait Validate {
    fn validate(&self, rules: &Rules) -> Result<(), ApiError>;
}

/// Tunables shared by validators
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    pub min_password_length: usize,
}

/// Collects field errors, then converts into a single [`ApiError`]
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            return false;
        }
        true
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.require(field, value, "Email is required.") && !is_email(value) {
            self.add(field, "Invalid email.");
        }
    }

    pub fn password(&mut self, field: &str, value: &str, rules: &Rules) {
        if self.require(field, value, "Password is required.")
            && value.chars().count() < rules.min_password_length
        {
            self.add(
                field,
                format!(
                    "Password must be at least {} characters long.",
                    rules.min_password_length
                ),
            );
        }
    }

    pub fn url(&mut self, field: &str, value: &str, required_message: &str, invalid_message: &str) {
        if self.require(field, value, required_message) && !is_http_url(value) {
            self.add(field, invalid_message);
        }
    }

    pub fn positive_id(&mut self, field: &str, value: i64, message: &str) {
        if value <= 0 {
            self.add(field, message);
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(self.0))
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
