use axum::Form;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;

use crate::application::account_service::Registration;
use crate::domain::error::Error;
use crate::http::render;
use crate::http::session::{self, CurrentUser};
use crate::http::types::AppError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Checkbox; present ("on") when ticked.
    #[serde(default)]
    pub remember: Option<String>,
}

pub async fn register_form() -> Html<String> {
    render::register_page(None)
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let input = Registration {
        username: form.username,
        email: form.email,
        password: form.password,
    };
    match state.accounts.register(input).await {
        Ok(_) => Ok(Redirect::to("/user/login").into_response()),
        Err(e @ (Error::Validation(_) | Error::DuplicateIdentity)) => {
            let page = render::register_page(Some(&e.to_string()));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form() -> Html<String> {
    render::login_page(None)
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.accounts.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            session::establish(&session, &user, form.remember.is_some()).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(Error::AuthFailure) => {
            let page = render::login_page(Some("invalid username or password"));
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(_user: CurrentUser, session: Session) -> Result<Redirect, AppError> {
    session::clear(&session).await?;
    Ok(Redirect::to("/user/login"))
}

pub async fn account(CurrentUser(user): CurrentUser) -> Html<String> {
    render::account_page(&user, None)
}

pub async fn update_account(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut fullname = None;
    let mut avatar = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| Error::Validation("malformed upload".into()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("fullname") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| Error::Validation("malformed upload".into()))?;
                fullname = Some(text);
            }
            Some("avatar") => {
                let original_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| Error::Validation("malformed upload".into()))?;
                let Some(original_name) = original_name else { continue };
                if data.is_empty() {
                    continue;
                }
                // Rejected uploads leave the avatar unchanged.
                match state.avatars.save(&data, &original_name) {
                    Ok(filename) => avatar = Some(filename),
                    Err(e) => tracing::warn!(error = %e, "avatar upload rejected"),
                }
            }
            _ => {}
        }
    }

    match state.accounts.update_profile(user.id, fullname, avatar).await {
        Ok(()) => Ok(Redirect::to("/user/account").into_response()),
        Err(Error::Validation(msg)) => {
            let page = render::account_page(&user, Some(&msg));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
