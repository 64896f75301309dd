use url::{Host, Url};
use validator::ValidateEmail;

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const TAX_ID_DIGITS: usize = 14;

/// Collects every user-facing message of a form before any mutation is
/// attempted.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.push(message);
        }
    }

    pub fn require(&mut self, value: &str, message: &str) {
        self.check(!value.trim().is_empty(), message);
    }

    pub fn check_email(&mut self, email: &str) {
        if email.trim().is_empty() {
            self.push("Email is required.");
        } else if !is_valid_email(email) {
            self.push("Email is invalid.");
        }
    }

    pub fn check_password_strength(&mut self, password: &str, label: &str) {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            self.push(format!(
                "{label} must be at least {MIN_PASSWORD_LENGTH} characters."
            ));
        }
    }

    pub fn check_new_account_password(&mut self, password: &str, confirm: &str) {
        if password.is_empty() {
            self.push("Password is required.");
        } else {
            self.check_password_strength(password, "Password");
        }
        self.check(password == confirm, "Passwords do not match.");
    }

    pub fn check_tax_id(&mut self, tax_id: &str) {
        if tax_id.trim().is_empty() {
            self.push("Tax ID is required.");
        } else if !is_valid_tax_id(tax_id) {
            self.push("Tax ID is invalid.");
        }
    }

    pub fn check_url(&mut self, value: Option<&str>, label: &str) {
        if let Some(url) = value.map(str::trim).filter(|url| !url.is_empty()) {
            if !is_valid_url(url) {
                self.push(format!("{label} must be a valid http(s) URL."));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    // RFC 5321 allows dotless domains; a signup address needs a real one.
    email.to_string().validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

/// Emails are unique case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn tax_id_digits(tax_id: &str) -> String {
    tax_id.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_tax_id(tax_id: &str) -> bool {
    tax_id_digits(tax_id).len() == TAX_ID_DIGITS
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Absolute http(s) URL whose host is an IP or a DNS name.
pub fn is_valid_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => domain.split('.').all(is_dns_label),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Trims an optional text field, mapping blank input to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
