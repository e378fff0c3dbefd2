//! Handlers for friendships.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::repositories::{FriendshipRepo, UserRepo};
use campus_events::Notification;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /friends/requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct FriendRequestBody {
    #[validate(email)]
    pub email: String,
}

/// POST /api/v1/friends/requests
///
/// The addressee is notified by email in the background; the response does
/// not wait for delivery.
pub async fn send_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<FriendRequestBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let addressee = UserRepo::find_by_email(&state.pool, auth.tenant.id, input.email.trim())
        .await?
        .ok_or_else(|| CoreError::not_found("User", input.email.trim()))?;

    if addressee.id == auth.user.id {
        return Err(CoreError::Conflict("Cannot send a friend request to yourself".into()).into());
    }
    if FriendshipRepo::exists_between(&state.pool, auth.user.id, addressee.id).await? {
        return Err(CoreError::Conflict("Friend request already exists".into()).into());
    }

    let request = FriendshipRepo::create_request(&state.pool, auth.user.id, addressee.id).await?;

    tracing::info!(
        friendship_id = request.id,
        requester_id = auth.user.id,
        addressee_id = addressee.id,
        "Friend request sent",
    );

    if let Some(email) = &state.email {
        let email = Arc::clone(email);
        let notification = Notification::friend_request(&auth.user.email, &state.config.frontend_url);
        let to = addressee.email.clone();
        state.background.spawn("friend-request-email", async move {
            email.send(&to, &notification).await
        });
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/friends/requests
pub async fn list_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = FriendshipRepo::list_incoming(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/friends/requests/{id}/accept
///
/// Only the addressee of a pending request can accept it.
pub async fn accept_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let friendship = FriendshipRepo::accept(&state.pool, id, auth.user.id)
        .await?
        .ok_or_else(|| CoreError::not_found("FriendRequest", id))?;

    tracing::info!(friendship_id = id, user_id = auth.user.id, "Friend request accepted");

    Ok(Json(DataResponse { data: friendship }))
}

/// GET /api/v1/friends
pub async fn list_friends(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let friends = FriendshipRepo::list_friends(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse { data: friends }))
}

/// DELETE /api/v1/friends/{user_id}
///
/// Removes the friendship or pending request in either direction.
pub async fn remove_friend(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FriendshipRepo::delete_between(&state.pool, auth.user.id, user_id).await? {
        return Err(CoreError::not_found("Friendship", user_id).into());
    }

    tracing::info!(user_id = auth.user.id, friend_id = user_id, "Friendship removed");

    Ok(StatusCode::NO_CONTENT)
}
