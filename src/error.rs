use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, warn};

use crate::views;

/// A single failed form field, reported back on the originating page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input; the handler re-shows the form.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Registration with an email that is already taken.
    #[error("email already registered")]
    DuplicateEmail,

    /// Bad credentials. Surfaced as a single generic message so the caller
    /// cannot tell an unknown email from a wrong password.
    #[error("invalid credentials")]
    AuthenticationFailure,

    /// A protected operation was attempted without a session.
    #[error("authentication required")]
    NotAuthenticated,

    /// Unexpected storage or session failure; never shown to the client.
    #[error("storage failure")]
    Persistence(#[source] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotAuthenticated => Redirect::to("/login").into_response(),
            // Re-show the login form with one generic message; never says
            // whether the email or the password was wrong.
            AppError::AuthenticationFailure => {
                views::login_page(None, Some("Login unsuccessful. Please check email and password"))
                    .into_response()
            }
            AppError::Validation(errors) => {
                warn!(field_count = errors.len(), "unhandled validation failure");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    views::error_page("Please correct the form and try again."),
                )
                    .into_response()
            }
            AppError::DuplicateEmail => (
                StatusCode::CONFLICT,
                views::error_page("That email is already registered."),
            )
                .into_response(),
            AppError::Persistence(e) => {
                error!(error = %e, "unexpected storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page("Something went wrong. Please try again."),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.constraint().map_or(false, |c| c.contains("email")) {
                return AppError::DuplicateEmail;
            }
        }
        AppError::Persistence(err.into())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Persistence(err.into())
    }
}
