use models::weekday::Weekday;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One weekly class meeting. (study_group_id, day_of_week, time_slot_id) is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub study_group_id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub lesson_type_id: Uuid,
    pub classroom_id: Uuid,
    pub time_slot_id: Uuid,
    pub day_of_week: Weekday,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_group::Entity",
        from = "Column::StudyGroupId",
        to = "super::study_group::Column::Id"
    )]
    StudyGroup,
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::lesson_type::Entity",
        from = "Column::LessonTypeId",
        to = "super::lesson_type::Column::Id"
    )]
    LessonType,
    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::time_slot::Entity",
        from = "Column::TimeSlotId",
        to = "super::time_slot::Column::Id"
    )]
    TimeSlot,
}

impl Related<super::study_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyGroup.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::lesson_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LessonType.def()
    }
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::time_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSlot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
