use lazy_static::lazy_static;
use tracing::{info, warn};

use crate::auth::dto::RegisterForm;
use crate::auth::password;
use crate::auth::repo::{NewUser, User, UserStore};
use crate::error::AppError;

lazy_static! {
    // Verifying against this hash keeps the unknown-email path as expensive
    // as a real verification, so the two failures look the same from outside.
    static ref DUMMY_HASH: String =
        password::hash_password("placeholder-credential").expect("hash placeholder credential");
}

/// Register a new user: duplicate-email pre-check, Argon2 hash, persist.
/// The form must already be normalized; field validation runs here so every
/// registration path enforces the same constraints.
pub async fn register(store: &dyn UserStore, form: &RegisterForm) -> Result<User, AppError> {
    form.validate().map_err(AppError::Validation)?;

    if store.find_by_email(&form.email).await?.is_some() {
        warn!(email = %form.email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = password::hash_password(&form.password).map_err(AppError::Persistence)?;
    let user = store
        .create(NewUser {
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Look up a user by email and check the password. Unknown email and wrong
/// password both come back as `Ok(None)`; the cases are only distinguished
/// in the logs.
pub async fn verify_credentials(
    store: &dyn UserStore,
    email: &str,
    password_plain: &str,
) -> Result<Option<User>, AppError> {
    match store.find_by_email(email).await? {
        Some(user) => {
            let ok = password::verify_password(password_plain, &user.password_hash)
                .map_err(AppError::Persistence)?;
            if ok {
                info!(user_id = %user.id, "credentials verified");
                Ok(Some(user))
            } else {
                warn!(email = %email, user_id = %user.id, "login invalid password");
                Ok(None)
            }
        }
        None => {
            let _ = password::verify_password(password_plain, &DUMMY_HASH);
            warn!(email = %email, "login unknown email");
            Ok(None)
        }
    }
}
