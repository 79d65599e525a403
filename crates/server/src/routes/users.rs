use crate::{
    dtos::user::{CreateUserRequest, UserResponse},
    error::{ApiError, AppError},
    routes::auth::CurrentUser,
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::user::UserService;

/// Register an account for an identity-provider subject
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Missing profile fields", body = ApiError),
        (status = 403, description = "Administrators only", body = ApiError),
        (status = 409, description = "Subject or email already registered", body = ApiError),
        (status = 422, description = "Unknown study group or department", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Authentication"
)]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    current.require_admin()?;
    let model = UserService::create_user(&state.db, request.validated()?).await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}
