use crate::{
    dtos::directory::{
        ClassroomRequest, ClassroomResponse, DepartmentRequest, GroupRequest, GroupResponse,
        NamedResponse, SubjectRequest, TeacherResponse, TimeSlotResponse,
    },
    error::{ApiError, AppError},
    routes::auth::CurrentUser,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::{directory::DirectoryService, schedule::ScheduleService};
use uuid::Uuid;

fn collect<M, R: From<M>>(models: Vec<M>) -> Json<Vec<R>> {
    Json(models.into_iter().map(R::from).collect())
}

/// List departments by name
#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Departments", body = Vec<NamedResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<NamedResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_departments(&state.db).await?))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/departments",
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = NamedResponse),
        (status = 400, description = "Invalid name", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn create_department(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<DepartmentRequest>,
) -> Result<(StatusCode, Json<NamedResponse>), AppError> {
    current.require_admin()?;
    let model = DirectoryService::create_department(&state.db, request.validated()?).await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// Rename a department
#[utoipa::path(
    put,
    path = "/departments/{id}",
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department renamed", body = NamedResponse),
        (status = 404, description = "Department not found", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn rename_department(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DepartmentRequest>,
) -> Result<Json<NamedResponse>, AppError> {
    current.require_admin()?;
    let model = DirectoryService::rename_department(&state.db, id, request.validated()?).await?;

    Ok(Json(model.into()))
}

/// Delete a department that no teacher belongs to
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = ApiError),
        (status = 409, description = "Teachers still belong to it", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    current.require_admin()?;
    DirectoryService::delete_department(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List study groups by course, then name
#[utoipa::path(
    get,
    path = "/groups",
    responses(
        (status = 200, description = "Study groups", body = Vec<GroupResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_groups(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_groups(&state.db).await?))
}

/// Create a study group
#[utoipa::path(
    post,
    path = "/groups",
    request_body = GroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 400, description = "Invalid name or course", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn create_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    current.require_admin()?;
    let (name, course) = request.validated()?;
    let model = DirectoryService::create_group(&state.db, name, course).await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// Delete a study group without students or classes
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = ApiError),
        (status = 409, description = "Group is still referenced", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn delete_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    current.require_admin()?;
    DirectoryService::delete_group(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List classrooms by name
#[utoipa::path(
    get,
    path = "/classrooms",
    responses(
        (status = 200, description = "Classrooms", body = Vec<ClassroomResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_classrooms(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<ClassroomResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_classrooms(&state.db).await?))
}

/// Create a classroom
#[utoipa::path(
    post,
    path = "/classrooms",
    request_body = ClassroomRequest,
    responses(
        (status = 201, description = "Classroom created", body = ClassroomResponse),
        (status = 400, description = "Invalid name or kind", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn create_classroom(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ClassroomRequest>,
) -> Result<(StatusCode, Json<ClassroomResponse>), AppError> {
    current.require_admin()?;
    let (name, kind) = request.validated()?;
    let model = DirectoryService::create_classroom(&state.db, name, kind).await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// Delete a classroom with no scheduled classes
#[utoipa::path(
    delete,
    path = "/classrooms/{id}",
    params(
        ("id" = Uuid, Path, description = "Classroom ID")
    ),
    responses(
        (status = 204, description = "Classroom deleted"),
        (status = 404, description = "Classroom not found", body = ApiError),
        (status = 409, description = "Classes are still scheduled there", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn delete_classroom(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    current.require_admin()?;
    DirectoryService::delete_classroom(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List teachers by name
#[utoipa::path(
    get,
    path = "/teachers",
    responses(
        (status = 200, description = "Teachers", body = Vec<TeacherResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<TeacherResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_teachers(&state.db).await?))
}

/// List subjects by name
#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "Subjects", body = Vec<NamedResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_subjects(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<NamedResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_subjects(&state.db).await?))
}

/// Create a subject
#[utoipa::path(
    post,
    path = "/subjects",
    request_body = SubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = NamedResponse),
        (status = 400, description = "Invalid name", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<SubjectRequest>,
) -> Result<(StatusCode, Json<NamedResponse>), AppError> {
    current.require_admin()?;
    let model = DirectoryService::create_subject(&state.db, request.validated()?).await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// List lesson types by name
#[utoipa::path(
    get,
    path = "/lesson-types",
    responses(
        (status = 200, description = "Lesson types", body = Vec<NamedResponse>),
        (status = 403, description = "Administrators only", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_lesson_types(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<NamedResponse>>, AppError> {
    current.require_admin()?;
    Ok(collect(DirectoryService::list_lesson_types(&state.db).await?))
}

/// List time slots by start time
#[utoipa::path(
    get,
    path = "/time-slots",
    responses(
        (status = 200, description = "Time slots", body = Vec<TimeSlotResponse>),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Directory"
)]
pub async fn list_time_slots(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<TimeSlotResponse>>, AppError> {
    let slots = ScheduleService::time_slots(&state.db).await?;
    Ok(Json(slots.iter().map(TimeSlotResponse::from).collect()))
}
