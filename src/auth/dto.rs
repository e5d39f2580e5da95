use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::FieldError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Submitted registration form. Missing fields deserialize as empty strings
/// so validation can report them instead of the extractor rejecting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Trims the username and lowercases the email, which is the login key.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let username_len = self.username.chars().count();
        if !(2..=20).contains(&username_len) {
            errors.push(FieldError::new(
                "username",
                "username must be between 2 and 20 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "enter a valid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "password must not be empty"));
        }
        if self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "passwords do not match"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Submitted login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "enter a valid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "password must not be empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "pw123".into(),
            confirm_password: "pw123".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn normalization_trims_and_lowercases_email() {
        let form = RegisterForm {
            username: "  alice  ".into(),
            email: "  Alice@Example.COM ".into(),
            ..valid_form()
        }
        .normalized();
        assert_eq!(form.username, "alice");
        assert_eq!(form.email, "alice@example.com");
    }

    #[test]
    fn short_username_is_rejected() {
        let form = RegisterForm {
            username: "a".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "username"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["", "plain", "no-at.example.com", "two@@example.com", "a@b"] {
            let form = RegisterForm {
                email: email.into(),
                ..valid_form()
            };
            let errors = form.validate().unwrap_err();
            assert!(
                errors.iter().any(|e| e.field == "email"),
                "email {:?} should fail",
                email
            );
        }
    }

    #[test]
    fn empty_password_is_rejected() {
        let form = RegisterForm {
            password: "".into(),
            confirm_password: "".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let form = RegisterForm {
            confirm_password: "other".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "confirm_password"));
    }

    #[test]
    fn login_form_requires_email_and_password() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let ok = LoginForm {
            email: "alice@example.com".into(),
            password: "pw123".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
