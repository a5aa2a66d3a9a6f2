use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use nestfund_core::users::{NewUser, User};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState, models::ApiResponse};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let password_hash = state.auth.hash_password(&payload.password)?;
    let user = state
        .user_service
        .register(NewUser {
            id: None,
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered successfully", user)),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginData>>> {
    let user = state.auth.authenticate(&payload.email, &payload.password)?;
    let token = state.auth.issue_token(&user).await?;
    Ok(Json(ApiResponse::success(
        "Login successful",
        LoginData {
            token,
            token_type: "Bearer".to_string(),
            user,
        },
    )))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth.revoke_token(&current.token_id).await?;
    Ok(Json(ApiResponse::message_only("Logout success")))
}

pub async fn current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success("Authenticated user", current.user))
}
