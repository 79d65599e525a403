use crate::{
    entities::{classroom, lesson_type, schedule, study_group, subject, teacher, time_slot},
    error::{ServiceError, ServiceResult},
};
use chrono::NaiveTime;
use log::info;
use models::{
    conflict::{Candidate, Conflict, Occupant, check_conflict},
    schedule::{ScheduleEntry, TimeSlot},
    view::{ScheduleFilter, ScheduleView},
    weekday::Weekday,
};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IsolationLevel, JoinType, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
    Select, TransactionTrait,
};
use uuid::Uuid;

/// The fields of a schedule entry as an administrator submits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewScheduleEntry {
    pub study_group_id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub lesson_type_id: Uuid,
    pub classroom_id: Uuid,
    pub time_slot_id: Uuid,
    pub day: Weekday,
}

impl NewScheduleEntry {
    pub fn candidate(&self) -> Candidate {
        Candidate {
            group_id: self.study_group_id,
            teacher_id: self.teacher_id,
            classroom_id: self.classroom_id,
            day: self.day,
            time_slot_id: self.time_slot_id,
        }
    }

    fn to_active_model(self) -> schedule::ActiveModel {
        schedule::ActiveModel {
            id: NotSet,
            study_group_id: Set(self.study_group_id),
            teacher_id: Set(self.teacher_id),
            subject_id: Set(self.subject_id),
            lesson_type_id: Set(self.lesson_type_id),
            classroom_id: Set(self.classroom_id),
            time_slot_id: Set(self.time_slot_id),
            day_of_week: Set(self.day),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct OccupantRow {
    id: Uuid,
    teacher_id: Uuid,
    teacher_name: String,
    classroom_id: Uuid,
    classroom_name: String,
    day_of_week: Weekday,
    time_slot_id: Uuid,
}

impl From<OccupantRow> for Occupant {
    fn from(row: OccupantRow) -> Self {
        Occupant {
            id: row.id,
            teacher_id: row.teacher_id,
            teacher_name: row.teacher_name,
            classroom_id: row.classroom_id,
            classroom_name: row.classroom_name,
            day: row.day_of_week,
            time_slot_id: row.time_slot_id,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct EntryRow {
    id: Uuid,
    day_of_week: Weekday,
    time_slot_id: Uuid,
    time_slot_name: String,
    time_start: NaiveTime,
    time_end: NaiveTime,
    study_group_id: Uuid,
    group_name: String,
    teacher_id: Uuid,
    teacher_name: String,
    subject_id: Uuid,
    subject_name: String,
    lesson_type_id: Uuid,
    lesson_type_name: String,
    classroom_id: Uuid,
    classroom_name: String,
}

impl From<EntryRow> for ScheduleEntry {
    fn from(row: EntryRow) -> Self {
        ScheduleEntry {
            id: row.id,
            day: row.day_of_week,
            time_slot: TimeSlot {
                id: row.time_slot_id,
                name: row.time_slot_name,
                start: row.time_start,
                end: row.time_end,
            },
            group_id: row.study_group_id,
            group_name: row.group_name,
            teacher_id: row.teacher_id,
            teacher_name: row.teacher_name,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            lesson_type_id: row.lesson_type_id,
            lesson_type_name: row.lesson_type_name,
            classroom_id: row.classroom_id,
            classroom_name: row.classroom_name,
        }
    }
}

pub struct ScheduleService;

impl ScheduleService {
    /// Checks a candidate against the stored timetable.
    ///
    /// Fetches every entry at the candidate's day and time slot that shares
    /// its teacher or its classroom, then applies [`check_conflict`].
    pub async fn check_conflict<C: ConnectionTrait>(
        db: &C,
        candidate: &Candidate,
        exclude_id: Option<Uuid>,
    ) -> ServiceResult<Option<Conflict>> {
        let occupants: Vec<Occupant> = schedule::Entity::find()
            .select_only()
            .column(schedule::Column::Id)
            .column(schedule::Column::TeacherId)
            .column(schedule::Column::ClassroomId)
            .column(schedule::Column::DayOfWeek)
            .column(schedule::Column::TimeSlotId)
            .column_as(teacher::Column::FullName, "teacher_name")
            .column_as(classroom::Column::Name, "classroom_name")
            .join(JoinType::InnerJoin, schedule::Relation::Teacher.def())
            .join(JoinType::InnerJoin, schedule::Relation::Classroom.def())
            .filter(schedule::Column::DayOfWeek.eq(candidate.day))
            .filter(schedule::Column::TimeSlotId.eq(candidate.time_slot_id))
            .filter(
                Condition::any()
                    .add(schedule::Column::TeacherId.eq(candidate.teacher_id))
                    .add(schedule::Column::ClassroomId.eq(candidate.classroom_id)),
            )
            .apply_if(exclude_id, |query, id| {
                query.filter(schedule::Column::Id.ne(id))
            })
            .order_by_asc(schedule::Column::Id)
            .into_model::<OccupantRow>()
            .all(db)
            .await?
            .into_iter()
            .map(Occupant::from)
            .collect();

        Ok(check_conflict(candidate, exclude_id, &occupants))
    }

    /// Adds an entry to the timetable.
    ///
    /// The conflict check and the insert share one serializable transaction,
    /// so two administrators cannot double-book a teacher or a classroom
    /// concurrently; one of them gets a serialization failure instead.
    pub async fn create(db: &DatabaseConnection, entry: NewScheduleEntry) -> ServiceResult<Uuid> {
        let txn = db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        if let Some(conflict) = Self::check_conflict(&txn, &entry.candidate(), None).await? {
            info!("Rejected schedule entry: {conflict}");
            return Err(conflict.into());
        }

        let id = Uuid::new_v4();
        let mut active = entry.to_active_model();
        active.id = Set(id);

        schedule::Entity::insert(active)
            .exec_without_returning(&txn)
            .await
            .map_err(ServiceError::from_schedule_write)?;
        txn.commit()
            .await
            .map_err(ServiceError::from_schedule_write)?;

        info!("Created schedule entry {id}");
        Ok(id)
    }

    /// Replaces an existing entry, ignoring the entry itself during the check
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        entry: NewScheduleEntry,
    ) -> ServiceResult<()> {
        let txn = db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        if let Some(conflict) = Self::check_conflict(&txn, &entry.candidate(), Some(id)).await? {
            info!("Rejected update of schedule entry {id}: {conflict}");
            return Err(conflict.into());
        }

        let result = schedule::Entity::update_many()
            .set(entry.to_active_model())
            .filter(schedule::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(ServiceError::from_schedule_write)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("schedule entry"));
        }

        txn.commit()
            .await
            .map_err(ServiceError::from_schedule_write)?;

        info!("Updated schedule entry {id}");
        Ok(())
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<()> {
        let result = schedule::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("schedule entry"));
        }

        info!("Deleted schedule entry {id}");
        Ok(())
    }

    /// Lists the entries visible in `view`, ordered by day then slot start
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        view: &ScheduleView,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        let entries = Self::entry_query()
            .apply_if(view.filter(), |query, filter| match filter {
                ScheduleFilter::Group(id) => query.filter(schedule::Column::StudyGroupId.eq(id)),
                ScheduleFilter::Teacher(id) => query.filter(schedule::Column::TeacherId.eq(id)),
            })
            .order_by_asc(schedule::Column::DayOfWeek)
            .order_by_asc(time_slot::Column::TimeStart)
            .into_model::<EntryRow>()
            .all(db)
            .await?
            .into_iter()
            .map(ScheduleEntry::from)
            .collect();

        Ok(entries)
    }

    /// All time slots ordered by start time
    pub async fn time_slots<C: ConnectionTrait>(db: &C) -> ServiceResult<Vec<TimeSlot>> {
        let slots = time_slot::Entity::find()
            .order_by_asc(time_slot::Column::TimeStart)
            .all(db)
            .await?
            .into_iter()
            .map(TimeSlot::from)
            .collect();

        Ok(slots)
    }

    /// Schedule rows joined with the names of everything they reference
    fn entry_query() -> Select<schedule::Entity> {
        schedule::Entity::find()
            .select_only()
            .column(schedule::Column::Id)
            .column(schedule::Column::DayOfWeek)
            .column(schedule::Column::TimeSlotId)
            .column(schedule::Column::StudyGroupId)
            .column(schedule::Column::TeacherId)
            .column(schedule::Column::SubjectId)
            .column(schedule::Column::LessonTypeId)
            .column(schedule::Column::ClassroomId)
            .column_as(time_slot::Column::Name, "time_slot_name")
            .column(time_slot::Column::TimeStart)
            .column(time_slot::Column::TimeEnd)
            .column_as(study_group::Column::Name, "group_name")
            .column_as(teacher::Column::FullName, "teacher_name")
            .column_as(subject::Column::Name, "subject_name")
            .column_as(lesson_type::Column::Name, "lesson_type_name")
            .column_as(classroom::Column::Name, "classroom_name")
            .join(JoinType::InnerJoin, schedule::Relation::TimeSlot.def())
            .join(JoinType::InnerJoin, schedule::Relation::StudyGroup.def())
            .join(JoinType::InnerJoin, schedule::Relation::Teacher.def())
            .join(JoinType::InnerJoin, schedule::Relation::Subject.def())
            .join(JoinType::InnerJoin, schedule::Relation::LessonType.def())
            .join(JoinType::InnerJoin, schedule::Relation::Classroom.def())
    }
}

#[cfg(test)]
mod test {
    use super::{NewScheduleEntry, ScheduleService};
    use crate::error::ServiceError;
    use chrono::NaiveTime;
    use models::{conflict::Conflict, view::ScheduleView, weekday::Weekday};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn occupant_row(
        teacher: (Uuid, &str),
        room: (Uuid, &str),
        day: Weekday,
        slot: Uuid,
    ) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Uuid::new_v4().into()),
            ("teacher_id", teacher.0.into()),
            ("teacher_name", teacher.1.into()),
            ("classroom_id", room.0.into()),
            ("classroom_name", room.1.into()),
            ("day_of_week", day.into()),
            ("time_slot_id", slot.into()),
        ])
    }

    fn new_entry(teacher_id: Uuid, classroom_id: Uuid, slot: Uuid) -> NewScheduleEntry {
        NewScheduleEntry {
            study_group_id: Uuid::new_v4(),
            teacher_id,
            subject_id: Uuid::new_v4(),
            lesson_type_id: Uuid::new_v4(),
            classroom_id,
            time_slot_id: slot,
            day: Weekday::Monday,
        }
    }

    #[tokio::test]
    async fn test_check_conflict_reports_teacher_in_other_room() {
        let (t1, r1, r2, s1) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![occupant_row(
                (t1, "T1"),
                (r1, "R1"),
                Weekday::Monday,
                s1,
            )]])
            .into_connection();

        let candidate = new_entry(t1, r2, s1).candidate();
        let conflict = ScheduleService::check_conflict(&db, &candidate, None)
            .await
            .unwrap();

        assert_eq!(
            conflict,
            Some(Conflict::Teacher {
                classroom_name: "R1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_check_conflict_without_occupants_is_clear() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let candidate = new_entry(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()).candidate();
        let conflict = ScheduleService::check_conflict(&db, &candidate, None)
            .await
            .unwrap();

        assert_eq!(conflict, None);
    }

    #[tokio::test]
    async fn test_create_rejects_room_conflict_without_inserting() {
        let (t1, t2, r1, s1) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![occupant_row(
                (t1, "T1"),
                (r1, "R1"),
                Weekday::Monday,
                s1,
            )]])
            .into_connection();

        let err = ScheduleService::create(&db, new_entry(t2, r1, s1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Conflict(Conflict::Room { ref teacher_name }) if teacher_name == "T1"
        ));
    }

    #[tokio::test]
    async fn test_update_ignores_the_entry_being_edited() {
        let (t1, r1, r2, s1) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();
        let mut own_row = occupant_row((t1, "T1"), (r1, "R1"), Weekday::Monday, s1);
        own_row.insert("id", id.into());

        // Moving T1's class from R1 to R2 must not collide with itself
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![own_row]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        ScheduleService::update(&db, id, new_entry(t1, r2, s1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let entry = new_entry(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let err = ScheduleService::update(&db, Uuid::new_v4(), entry)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("schedule entry")));
    }

    #[tokio::test]
    async fn test_update_rejects_teacher_conflict_without_writing() {
        let (t1, r1, r2, s1) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        // No exec result is queued, so reaching the update would fail differently
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![occupant_row(
                (t1, "T1"),
                (r1, "R1"),
                Weekday::Monday,
                s1,
            )]])
            .into_connection();

        let err = ScheduleService::update(&db, Uuid::new_v4(), new_entry(t1, r2, s1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Conflict(Conflict::Teacher { ref classroom_name }) if classroom_name == "R1"
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = ScheduleService::delete(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("schedule entry")));
    }

    #[tokio::test]
    async fn test_list_maps_joined_rows() {
        let slot_id = Uuid::new_v4();
        let start = NaiveTime::from_hms_opt(8, 15, 0).unwrap();
        let end = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let row: BTreeMap<&str, Value> = BTreeMap::from([
            ("id", Uuid::new_v4().into()),
            ("day_of_week", Weekday::Saturday.into()),
            ("time_slot_id", slot_id.into()),
            ("time_slot_name", "1 пара, 1 часть".into()),
            ("time_start", start.into()),
            ("time_end", end.into()),
            ("study_group_id", Uuid::new_v4().into()),
            ("group_name", "ИВТ-21".into()),
            ("teacher_id", Uuid::new_v4().into()),
            ("teacher_name", "Иванов И.И.".into()),
            ("subject_id", Uuid::new_v4().into()),
            ("subject_name", "Математика".into()),
            ("lesson_type_id", Uuid::new_v4().into()),
            ("lesson_type_name", "Лекция".into()),
            ("classroom_id", Uuid::new_v4().into()),
            ("classroom_name", "101".into()),
        ]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let entries = ScheduleService::list(&db, &ScheduleView::Admin { filter: None })
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].day, Weekday::Saturday);
        assert_eq!(entries[0].time_slot.id, slot_id);
        assert_eq!(entries[0].time_slot.range(), "08:15-09:00");
        assert_eq!(entries[0].subject_name, "Математика");
    }
}
