use crate::{
    dtos::schedule::{
        ConflictCheckRequest, ConflictCheckResponse, CreatedResponse, ScheduleEntryRequest,
        ScheduleGridResponse, ScheduleQueryParams,
    },
    error::{ApiError, AppError},
    routes::auth::CurrentUser,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::schedule::ScheduleService;
use models::grid::ScheduleGrid;
use uuid::Uuid;

/// Get the timetable visible to the current user as a grid
#[utoipa::path(
    get,
    path = "/schedule",
    params(ScheduleQueryParams),
    responses(
        (status = 200, description = "Timetable grid, Monday to Saturday", body = ScheduleGridResponse),
        (status = 400, description = "Both filters given", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<ScheduleQueryParams>,
) -> Result<Json<ScheduleGridResponse>, AppError> {
    // Filters only narrow an administrator's view
    let view = current.view.narrowed(params.filter()?);

    let entries = ScheduleService::list(&state.db, &view).await?;
    let time_slots = ScheduleService::time_slots(&state.db).await?;
    let grid = ScheduleGrid::teaching_week(entries);

    Ok(Json(ScheduleGridResponse::new(
        view.title(),
        &grid,
        &time_slots,
    )))
}

/// Check an assignment for conflicts without saving it
#[utoipa::path(
    post,
    path = "/schedule/check",
    request_body = ConflictCheckRequest,
    responses(
        (status = 200, description = "Check result", body = ConflictCheckResponse),
        (status = 400, description = "Invalid assignment", body = ApiError),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn check_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ConflictCheckRequest>,
) -> Result<Json<ConflictCheckResponse>, AppError> {
    current.require_admin()?;
    let entry = request.entry.to_entry()?;

    let conflict =
        ScheduleService::check_conflict(&state.db, &entry.candidate(), request.exclude_id).await?;

    Ok(Json(conflict.into()))
}

/// Add an assignment to the timetable
#[utoipa::path(
    post,
    path = "/schedule",
    request_body = ScheduleEntryRequest,
    responses(
        (status = 201, description = "Assignment created", body = CreatedResponse),
        (status = 400, description = "Invalid assignment", body = ApiError),
        (status = 403, description = "Administrators only", body = ApiError),
        (status = 409, description = "Teacher, room or group conflict", body = ApiError),
        (status = 422, description = "Unknown group, teacher, subject, lesson type, classroom or time slot", body = ApiError),
        (status = 503, description = "Concurrent edit, retry", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn create_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ScheduleEntryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    current.require_admin()?;
    let id = ScheduleService::create(&state.db, request.to_entry()?).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Replace an assignment
#[utoipa::path(
    put,
    path = "/schedule/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule entry ID")
    ),
    request_body = ScheduleEntryRequest,
    responses(
        (status = 204, description = "Assignment updated"),
        (status = 400, description = "Invalid assignment", body = ApiError),
        (status = 403, description = "Administrators only", body = ApiError),
        (status = 404, description = "Assignment not found", body = ApiError),
        (status = 409, description = "Teacher, room or group conflict", body = ApiError),
        (status = 422, description = "Unknown group, teacher, subject, lesson type, classroom or time slot", body = ApiError),
        (status = 503, description = "Concurrent edit, retry", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn update_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleEntryRequest>,
) -> Result<StatusCode, AppError> {
    current.require_admin()?;
    ScheduleService::update(&state.db, id, request.to_entry()?).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove an assignment
#[utoipa::path(
    delete,
    path = "/schedule/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule entry ID")
    ),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 403, description = "Administrators only", body = ApiError),
        (status = 404, description = "Assignment not found", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    current.require_admin()?;
    ScheduleService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
