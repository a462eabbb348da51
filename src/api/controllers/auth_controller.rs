use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crate::api::errors::APIErrors;
use crate::api::extractors::JsonBody;
use crate::api::request::{LoginRequest, RegisterRequest};
use crate::api::response::{CreatedResponse, LoginResponse, UserResponse};
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;

pub async fn register<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let user_id = state
        .users
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User registered".into(),
            id: user_id,
        }),
    ))
}

pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let (token, user) = state.users.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        user: UserResponse::from(user),
    }))
}
