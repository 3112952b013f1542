//! Client-side form validation.
//!
//! Failures here stay on the form; they never reach the session store or the
//! network.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::sync::LazyLock;

use regex::Regex;

/// Something, `@`, something, a dot, something; no whitespace, one `@`.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";

const MIN_PASSWORD_LEN: usize = 6;
const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

/// Raw auth form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthForm {
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Username => self.username = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }
}

/// Per-field messages from a failed validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("form has invalid fields")]
pub struct FieldErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Username => self.username.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
            Field::ConfirmPassword => self.confirm_password.as_deref(),
        }
    }

    /// Drop one field's message, e.g. once the user edits it.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Username => self.username = None,
            Field::Email => self.email = None,
            Field::Password => self.password = None,
            Field::ConfirmPassword => self.confirm_password = None,
        }
    }
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Required-then-well-formed email check shared by the auth and reset forms.
///
/// # Errors
///
/// Returns the message to show under the field.
pub fn check_email(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        Err(EMAIL_REQUIRED)
    } else if !is_valid_email(email) {
        Err(EMAIL_INVALID)
    } else {
        Ok(())
    }
}

/// Validate the auth form for `mode`. Register mode adds username and
/// confirmation checks.
///
/// # Errors
///
/// Returns every failing field's message.
pub fn validate(form: &AuthForm, mode: AuthMode) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if let Err(message) = check_email(&form.email) {
        errors.email = Some(message.to_owned());
    }

    if form.password.is_empty() {
        errors.password = Some("Password is required".to_owned());
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.password = Some(format!("Password must be at least {MIN_PASSWORD_LEN} characters long"));
    }

    if mode == AuthMode::Register {
        if form.username.is_empty() {
            errors.username = Some("User name is required".to_owned());
        } else if form.username.contains(' ') {
            errors.username = Some("User name cannot contain spaces".to_owned());
        } else if form.username.chars().count() < MIN_USERNAME_LEN {
            errors.username = Some(format!("User name must be at least {MIN_USERNAME_LEN} characters long"));
        }

        if form.confirm_password.is_empty() {
            errors.confirm_password = Some("Please confirm your password".to_owned());
        } else if form.confirm_password != form.password {
            errors.confirm_password = Some("Passwords do not match".to_owned());
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Normalize and check a URL submitted for scraping.
///
/// # Errors
///
/// Returns a user-facing message when the input is empty or not an absolute
/// http(s) URL.
pub fn validate_scrape_url(raw: &str) -> Result<String, String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err("URL is required".to_owned());
    }
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"));
    let host = rest.map(|r| r.split(['/', '?', '#']).next().unwrap_or_default());
    match host {
        Some(h) if !h.is_empty() && !url.chars().any(char::is_whitespace) => Ok(url.to_owned()),
        _ => Err("Please enter a valid http or https URL".to_owned()),
    }
}
