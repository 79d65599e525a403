use super::{MAX_NAME_LEN, MAX_SHORT_NAME_LEN, validate_name};
use crate::error::AppError;
use chrono::NaiveTime;
use database::entities::{classroom, department, lesson_type, study_group, subject, teacher};
use models::schedule::TimeSlot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DepartmentRequest {
    pub name: String,
}

impl DepartmentRequest {
    pub fn validated(&self) -> Result<String, AppError> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GroupRequest {
    pub name: String,
    /// Year of study, starting at 1
    pub course: i16,
}

impl GroupRequest {
    pub fn validated(&self) -> Result<(String, i16), AppError> {
        let name = validate_name("name", &self.name, MAX_SHORT_NAME_LEN)?;
        if self.course < 1 {
            return Err(AppError::BadRequest("course must be at least 1".to_string()));
        }
        Ok((name, self.course))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassroomRequest {
    pub name: String,
    /// Classroom type, e.g. "Лекционная"
    pub kind: String,
}

impl ClassroomRequest {
    pub fn validated(&self) -> Result<(String, String), AppError> {
        Ok((
            validate_name("name", &self.name, MAX_SHORT_NAME_LEN)?,
            validate_name("kind", &self.kind, MAX_NAME_LEN)?,
        ))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectRequest {
    pub name: String,
}

impl SubjectRequest {
    pub fn validated(&self) -> Result<String, AppError> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }
}

/// A directory row that only has a name
#[derive(Debug, Serialize, ToSchema)]
pub struct NamedResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<department::Model> for NamedResponse {
    fn from(model: department::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<subject::Model> for NamedResponse {
    fn from(model: subject::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<lesson_type::Model> for NamedResponse {
    fn from(model: lesson_type::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub course: i16,
}

impl From<study_group::Model> for GroupResponse {
    fn from(model: study_group::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            course: model.course,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassroomResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
}

impl From<classroom::Model> for ClassroomResponse {
    fn from(model: classroom::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: Uuid,
    pub department_id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<teacher::Model> for TeacherResponse {
    fn from(model: teacher::Model) -> Self {
        Self {
            id: model.id,
            department_id: model.department_id,
            full_name: model.full_name,
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSlotResponse {
    pub id: Uuid,
    pub name: String,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    /// `HH:MM-HH:MM`
    pub range: String,
}

impl From<&TimeSlot> for TimeSlotResponse {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id,
            name: slot.name.clone(),
            time_start: slot.start,
            time_end: slot.end,
            range: slot.range(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ClassroomRequest, GroupRequest};

    #[test]
    fn test_group_course_must_be_positive() {
        let request = GroupRequest {
            name: "ИВТ-21".to_string(),
            course: 0,
        };
        assert!(request.validated().is_err());

        let request = GroupRequest {
            name: "ИВТ-21".to_string(),
            course: 2,
        };
        assert_eq!(request.validated().unwrap(), ("ИВТ-21".to_string(), 2));
    }

    #[test]
    fn test_classroom_name_limit() {
        let request = ClassroomRequest {
            name: "1".repeat(51),
            kind: "Лекционная".to_string(),
        };
        assert!(request.validated().is_err());
    }
}
