use crate::{
    dtos::user::UserResponse,
    error::{ApiError, AppError},
    state::AppState,
};
use axum::{Json, extract::FromRequestParts, http::request::Parts};
use database::{entities::user, services::user::UserService};
use models::view::ScheduleView;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// The account behind the request's bearer token and the timetable it may see
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
    pub view: ScheduleView,
}

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.view.can_manage() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "administrator access required".to_string(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let subject = parts
            .extensions
            .get::<DefaultClaims>()
            .and_then(|claims| claims.sub.clone())
            .ok_or(AppError::Unauthorized)?;

        let user = UserService::find_by_subject(&state.db, &subject)
            .await?
            .ok_or_else(|| AppError::Forbidden(format!("no account is registered for {subject}")))?;
        let view = UserService::resolve_view(&user)?;

        Ok(Self { user, view })
    }
}

/// Returns the account of the authenticated user
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT", body = ApiError),
        (status = 403, description = "No account for this identity", body = ApiError)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.user.into())
}
