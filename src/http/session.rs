use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use tower_sessions::{Expiry, Session};

use crate::domain::user::{User, UserId};

use super::routes::AppState;
use super::types::AppError;

/// Session key the authenticated user's id is stored under.
pub const SESSION_USER_ID_KEY: &str = "user_id";

const REMEMBER_DAYS: i64 = 30;

/// The authenticated user, resolved from the session before the handler
/// runs. Anonymous requests are redirected to the login page without
/// touching the store layer.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Redirect> {
        let login = || Redirect::to("/user/login");
        let session = Session::from_request_parts(parts, state).await.map_err(|_| login())?;
        let Ok(Some(id)) = session.get::<i64>(SESSION_USER_ID_KEY).await else {
            return Err(login());
        };
        // A stale session pointing at a missing row counts as anonymous.
        match state.accounts.user(UserId(id)).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            _ => Err(login()),
        }
    }
}

/// Binds the session to `user`; "remember me" trades the browser-session
/// cookie for a 30-day inactivity expiry.
pub async fn establish(session: &Session, user: &User, remember: bool) -> Result<(), AppError> {
    session.insert(SESSION_USER_ID_KEY, user.id.0).await?;
    if remember {
        session.set_expiry(Some(Expiry::OnInactivity(time::Duration::days(REMEMBER_DAYS))));
    }
    Ok(())
}

pub async fn clear(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}
