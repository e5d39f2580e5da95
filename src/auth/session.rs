use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::repo::{User, UserStore};
use crate::error::AppError;
use crate::state::AppState;

const USER_ID_KEY: &str = "user_id";

/// Bind the session to `user`, discarding whatever identity it held before
/// and cycling the session id.
pub async fn start_session(session: &Session, user: &User) -> Result<(), AppError> {
    session.clear().await;
    session.insert(USER_ID_KEY, user.id).await?;
    session.cycle_id().await?;
    debug!(user_id = %user.id, "session started");
    Ok(())
}

/// Destroy the session; the context is Anonymous afterwards.
pub async fn end_session(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    debug!("session ended");
    Ok(())
}

/// Resolve the identity bound to the session. The user record is re-read
/// from the store on every call, so a binding to a vanished user degrades
/// to Anonymous instead of yielding a stale snapshot.
pub async fn current_user(
    session: &Session,
    users: &dyn UserStore,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<Uuid>(USER_ID_KEY).await? else {
        return Ok(None);
    };
    match users.find_by_id(user_id).await? {
        Some(user) => Ok(Some(user)),
        None => {
            warn!(%user_id, "session bound to missing user");
            session.remove::<Uuid>(USER_ID_KEY).await?;
            Ok(None)
        }
    }
}

/// Identity resolved for the current request; `None` is Anonymous. Handlers
/// take this as an explicit parameter instead of reading ambient state.
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Persistence(anyhow::anyhow!(msg)))?;
        let user = current_user(&session, state.users.as_ref()).await?;
        Ok(CurrentUser(user))
    }
}

/// Guard for protected handlers. Anonymous requests are rejected with
/// `NotAuthenticated`, which renders as a redirect to the login page, so
/// the handler body never runs.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::NotAuthenticated)
    }
}
