//! Authentication and profile handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use crate::api::{Credentials, MessageResponse, ProfileUpdate, SignupRequest, User, UserProfile};
use crate::error::{AppError, Result};
use crate::fixtures;
use crate::services::session;
use crate::state::AppState;

/// Sign in.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns 400 for a blank username and 500 if the session cannot be saved.
#[instrument(skip(state, credentials))]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<User>> {
    if credentials.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    let user = {
        let mut session = state.session().await;
        session
            .login(state.api(), state.fallback_policy(), &credentials)
            .await?
            .clone()
    };
    state.reset_address_book().await;

    Ok(Json(user))
}

/// Register a new account.
///
/// POST /auth/register
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Json<MessageResponse> {
    Json(session::register(state.api(), state.fallback_policy(), &request).await)
}

/// Sign out.
///
/// POST /auth/logout
///
/// # Errors
///
/// Returns 500 if the session snapshots cannot be removed.
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    state.session().await.logout()?;
    state.reset_address_book().await;
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user's profile.
///
/// GET /profile
pub async fn profile(State(state): State<AppState>) -> Json<UserProfile> {
    let profile = match state.token().await {
        Some(token) => {
            state
                .fallback_policy()
                .call_with(
                    state.api().profile(&token),
                    fixtures::mock_profile,
                    "profile",
                )
                .await
        }
        None => fixtures::mock_profile(),
    };
    Json(profile)
}

/// Update the signed-in user's profile.
///
/// PUT /profile
#[instrument(skip(state, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Json<UserProfile> {
    let local = || fixtures::mock_profile().with_update(&update);
    let profile = match state.token().await {
        Some(token) => {
            state
                .fallback_policy()
                .call_with(
                    state.api().update_profile(&token, &update),
                    local,
                    "update profile",
                )
                .await
        }
        None => local(),
    };
    Json(profile)
}
