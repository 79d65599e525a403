use crate::export::ExportTarget;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Account role, stored as its lowercase name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// Narrows an administrator's view to one timetable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleFilter {
    Group(Uuid),
    Teacher(Uuid),
}

/// Which assignments a user may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleView {
    Student { group_id: Uuid },
    Teacher { teacher_id: Uuid },
    Admin { filter: Option<ScheduleFilter> },
}

impl ScheduleView {
    /// Heading shown above the timetable
    pub fn title(&self) -> &'static str {
        match self.filter() {
            Some(ScheduleFilter::Group(_)) => "Расписание группы",
            Some(ScheduleFilter::Teacher(_)) => "Расписание преподавателя",
            None => "Расписание занятий",
        }
    }

    /// Only administrators edit the schedule and the directories
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// Students export their own group, teachers their own timetable
    pub fn can_export(&self, target: &ExportTarget) -> bool {
        match (self, target) {
            (Self::Admin { .. }, _) => true,
            (Self::Student { group_id }, ExportTarget::Group(id)) => group_id == id,
            (Self::Teacher { teacher_id }, ExportTarget::Teacher(id)) => teacher_id == id,
            _ => false,
        }
    }

    /// The filter the storage layer applies for this view
    pub fn filter(&self) -> Option<ScheduleFilter> {
        match *self {
            Self::Student { group_id } => Some(ScheduleFilter::Group(group_id)),
            Self::Teacher { teacher_id } => Some(ScheduleFilter::Teacher(teacher_id)),
            Self::Admin { filter } => filter,
        }
    }

    /// An administrator's view narrowed to `filter`; other views are unchanged
    pub fn narrowed(self, filter: Option<ScheduleFilter>) -> Self {
        match self {
            Self::Admin { .. } => Self::Admin { filter },
            other => other,
        }
    }
}

impl From<ExportTarget> for ScheduleFilter {
    fn from(target: ExportTarget) -> Self {
        match target {
            ExportTarget::Group(id) => Self::Group(id),
            ExportTarget::Teacher(id) => Self::Teacher(id),
        }
    }
}
