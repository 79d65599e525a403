use crate::{
    dtos::schedule::ExportQueryParams,
    error::{ApiError, AppError},
    routes::auth::CurrentUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use database::services::schedule::ScheduleService;
use log::info;
use models::{
    export::{ExportFormat, ExportTarget, export_rows, to_csv, to_json},
    view::ScheduleView,
};
use uuid::Uuid;

fn parse_target(scope: &str, id: Uuid) -> Result<ExportTarget, AppError> {
    match scope {
        "group" => Ok(ExportTarget::Group(id)),
        "teacher" => Ok(ExportTarget::Teacher(id)),
        other => Err(AppError::BadRequest(format!(
            "unknown export scope {other:?}, expected group or teacher"
        ))),
    }
}

/// Download a group's or a teacher's timetable as CSV or JSON
#[utoipa::path(
    get,
    path = "/schedule/export/{scope}/{id}",
    params(
        ("scope" = String, Path, description = "`group` or `teacher`"),
        ("id" = Uuid, Path, description = "Group or teacher ID"),
        ExportQueryParams
    ),
    responses(
        (status = 200, description = "Export file", content_type = "text/csv", body = String),
        (status = 400, description = "Unknown scope or format", body = ApiError),
        (status = 403, description = "Not your timetable", body = ApiError)
    ),
    security(("jwt" = [])),
    tag = "Schedule"
)]
pub async fn export_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((scope, id)): Path<(String, Uuid)>,
    Query(params): Query<ExportQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    let target = parse_target(&scope, id)?;
    if !current.view.can_export(&target) {
        return Err(AppError::Forbidden(
            "you may only export your own timetable".to_string(),
        ));
    }

    let view = ScheduleView::Admin {
        filter: Some(target.into()),
    };
    let entries = ScheduleService::list(&state.db, &view).await?;
    let rows = export_rows(&entries);

    let format = params.format;
    let body = match format {
        ExportFormat::Csv => {
            to_csv(&rows, params.delimiter).map_err(|e| AppError::Internal(e.to_string()))?
        }
        ExportFormat::Json => to_json(&rows).map_err(|e| AppError::Internal(e.to_string()))?,
    };

    let file_name = target.file_name(format);
    info!("Exported {} rows to {file_name}", rows.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod test {
    use super::parse_target;
    use models::export::ExportTarget;
    use uuid::Uuid;

    #[test]
    fn test_scopes() {
        let id = Uuid::new_v4();
        assert_eq!(parse_target("group", id).unwrap(), ExportTarget::Group(id));
        assert_eq!(parse_target("teacher", id).unwrap(), ExportTarget::Teacher(id));
        assert!(parse_target("department", id).is_err());
    }
}
