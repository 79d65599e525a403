use super::directory::TimeSlotResponse;
use crate::error::{ApiError, AppError};
use database::services::schedule::NewScheduleEntry;
use models::{
    conflict::Conflict,
    export::{Delimiter, ExportFormat},
    grid::{GridRow, ScheduleGrid},
    schedule::{ScheduleEntry, TimeSlot},
    view::ScheduleFilter,
    weekday::Weekday,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// An assignment as an administrator submits it
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScheduleEntryRequest {
    pub study_group_id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub lesson_type_id: Uuid,
    pub classroom_id: Uuid,
    pub time_slot_id: Uuid,
    /// 1 = Monday ... 7 = Sunday
    pub day_of_week: i16,
}

impl ScheduleEntryRequest {
    pub fn to_entry(&self) -> Result<NewScheduleEntry, AppError> {
        let day = Weekday::try_from(self.day_of_week).map_err(AppError::BadRequest)?;

        Ok(NewScheduleEntry {
            study_group_id: self.study_group_id,
            teacher_id: self.teacher_id,
            subject_id: self.subject_id,
            lesson_type_id: self.lesson_type_id,
            classroom_id: self.classroom_id,
            time_slot_id: self.time_slot_id,
            day,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConflictCheckRequest {
    #[serde(flatten)]
    pub entry: ScheduleEntryRequest,
    /// The entry being edited, ignored during the check
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictCheckResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ApiError>,
}

impl From<Option<Conflict>> for ConflictCheckResponse {
    fn from(conflict: Option<Conflict>) -> Self {
        Self {
            ok: conflict.is_none(),
            conflict: conflict.as_ref().map(ApiError::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// Administrators may narrow the timetable to one group or one teacher
#[derive(Debug, Deserialize, IntoParams)]
pub struct ScheduleQueryParams {
    pub group_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

impl ScheduleQueryParams {
    pub fn filter(&self) -> Result<Option<ScheduleFilter>, AppError> {
        match (self.group_id, self.teacher_id) {
            (Some(_), Some(_)) => Err(AppError::BadRequest(
                "filter by either group_id or teacher_id, not both".to_string(),
            )),
            (Some(id), None) => Ok(Some(ScheduleFilter::Group(id))),
            (None, Some(id)) => Ok(Some(ScheduleFilter::Teacher(id))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQueryParams {
    /// `csv` (default) or `json`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub format: ExportFormat,
    /// CSV field separator: `semicolon` (default) or `comma`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub delimiter: Delimiter,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleEntryResponse {
    pub id: Uuid,
    pub day_of_week: i16,
    pub time_slot_id: Uuid,
    pub group_id: Uuid,
    pub group: String,
    pub teacher_id: Uuid,
    pub teacher: String,
    pub subject_id: Uuid,
    pub subject: String,
    pub lesson_type_id: Uuid,
    pub lesson_type: String,
    pub classroom_id: Uuid,
    pub classroom: String,
}

impl From<&ScheduleEntry> for ScheduleEntryResponse {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry.id,
            day_of_week: entry.day.number(),
            time_slot_id: entry.time_slot.id,
            group_id: entry.group_id,
            group: entry.group_name.clone(),
            teacher_id: entry.teacher_id,
            teacher: entry.teacher_name.clone(),
            subject_id: entry.subject_id,
            subject: entry.subject_name.clone(),
            lesson_type_id: entry.lesson_type_id,
            lesson_type: entry.lesson_type_name.clone(),
            classroom_id: entry.classroom_id,
            classroom: entry.classroom_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayResponse {
    pub number: i16,
    pub label: String,
}

impl From<Weekday> for DayResponse {
    fn from(day: Weekday) -> Self {
        Self {
            number: day.number(),
            label: day.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GridRowResponse {
    pub time_slot: TimeSlotResponse,
    /// One cell per day column; `null` means no class
    pub cells: Vec<Option<ScheduleEntryResponse>>,
}

impl From<GridRow<'_>> for GridRowResponse {
    fn from(row: GridRow<'_>) -> Self {
        Self {
            time_slot: TimeSlotResponse::from(row.time_slot),
            cells: row
                .cells
                .into_iter()
                .map(|cell| cell.map(ScheduleEntryResponse::from))
                .collect(),
        }
    }
}

/// The timetable laid out as time slot rows by day columns
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleGridResponse {
    pub title: String,
    pub days: Vec<DayResponse>,
    pub rows: Vec<GridRowResponse>,
}

impl ScheduleGridResponse {
    pub fn new(title: &str, grid: &ScheduleGrid, time_slots: &[TimeSlot]) -> Self {
        Self {
            title: title.to_string(),
            days: grid.days().map(DayResponse::from).collect(),
            rows: grid
                .rows(time_slots)
                .into_iter()
                .map(GridRowResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ConflictCheckResponse, ScheduleEntryRequest, ScheduleQueryParams};
    use models::{conflict::Conflict, view::ScheduleFilter, weekday::Weekday};
    use uuid::Uuid;

    fn request(day_of_week: i16) -> ScheduleEntryRequest {
        ScheduleEntryRequest {
            study_group_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            lesson_type_id: Uuid::new_v4(),
            classroom_id: Uuid::new_v4(),
            time_slot_id: Uuid::new_v4(),
            day_of_week,
        }
    }

    #[test]
    fn test_day_out_of_range_is_rejected() {
        assert!(request(0).to_entry().is_err());
        assert!(request(8).to_entry().is_err());
        assert_eq!(request(3).to_entry().unwrap().day, Weekday::Wednesday);
    }

    #[test]
    fn test_check_request_flattens_entry() {
        let exclude = Uuid::new_v4();
        let body = serde_json::json!({
            "study_group_id": Uuid::new_v4(),
            "teacher_id": Uuid::new_v4(),
            "subject_id": Uuid::new_v4(),
            "lesson_type_id": Uuid::new_v4(),
            "classroom_id": Uuid::new_v4(),
            "time_slot_id": Uuid::new_v4(),
            "day_of_week": 1,
            "exclude_id": exclude,
        });

        let parsed: super::ConflictCheckRequest = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.exclude_id, Some(exclude));
        assert_eq!(parsed.entry.day_of_week, 1);
    }

    #[test]
    fn test_query_accepts_one_filter() {
        let id = Uuid::new_v4();
        let group = ScheduleQueryParams {
            group_id: Some(id),
            teacher_id: None,
        };
        assert_eq!(group.filter().unwrap(), Some(ScheduleFilter::Group(id)));

        let both = ScheduleQueryParams {
            group_id: Some(id),
            teacher_id: Some(id),
        };
        assert!(both.filter().is_err());
    }

    #[test]
    fn test_check_response() {
        let clear = ConflictCheckResponse::from(None);
        assert!(clear.ok);

        let busy = ConflictCheckResponse::from(Some(Conflict::Teacher {
            classroom_name: "R1".to_string(),
        }));
        assert!(!busy.ok);
        assert_eq!(busy.conflict.unwrap().code, "TEACHER_CONFLICT");
    }
}
