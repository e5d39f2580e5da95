use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        service,
        session::{self, AuthUser},
    },
    error::{AppError, FieldError},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub async fn register_page() -> Html<String> {
    views::register_page(&RegisterForm::default(), &[])
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    match service::register(state.users.as_ref(), &form).await {
        Ok(user) => {
            info!(user_id = %user.id, "registration complete");
            Ok(Redirect::to("/login?registered=1").into_response())
        }
        Err(AppError::Validation(errors)) => {
            warn!(field_count = errors.len(), "registration form invalid");
            Ok(views::register_page(&form, &errors).into_response())
        }
        Err(AppError::DuplicateEmail) => {
            let errors = vec![FieldError::new("email", "email is already registered")];
            Ok(views::register_page(&form, &errors).into_response())
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    registered: Option<u8>,
    logged_out: Option<u8>,
}

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.registered.is_some() {
        Some("Your account has been created! You can now log in")
    } else if query.logged_out.is_some() {
        Some("You have been logged out.")
    } else {
        None
    };
    views::login_page(notice, None)
}

#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();

    // Malformed input and bad credentials surface as the same generic
    // failure so nothing about the account's existence leaks.
    if form.validate().is_err() {
        warn!("login form invalid");
        return Err(AppError::AuthenticationFailure);
    }

    match service::verify_credentials(state.users.as_ref(), &form.email, &form.password).await? {
        Some(user) => {
            session::start_session(&session, &user).await?;
            info!(user_id = %user.id, "user logged in");
            Ok(Redirect::to("/").into_response())
        }
        None => Err(AppError::AuthenticationFailure),
    }
}

#[instrument(skip(user, session))]
pub async fn logout(AuthUser(user): AuthUser, session: Session) -> Result<Redirect, AppError> {
    session::end_session(&session).await?;
    info!(user_id = %user.id, "user logged out");
    Ok(Redirect::to("/login?logged_out=1"))
}
