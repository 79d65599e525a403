use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A group cannot attend two classes at once. Inserts that violate this
        // surface as group-time conflicts.
        manager
            .create_index(
                Index::create()
                    .name("uq_schedules_group_day_slot")
                    .table(Schedules::Table)
                    .col(Schedules::StudyGroupId)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::TimeSlotId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Conflict lookups filter on (day, slot) plus teacher or classroom
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_day_slot_teacher")
                    .table(Schedules::Table)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::TimeSlotId)
                    .col(Schedules::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_day_slot_classroom")
                    .table(Schedules::Table)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::TimeSlotId)
                    .col(Schedules::ClassroomId)
                    .to_owned(),
            )
            .await?;

        // Teacher timetables filter on teacher_id alone
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_teacher_id")
                    .table(Schedules::Table)
                    .col(Schedules::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_slots_time_start")
                    .table(TimeSlots::Table)
                    .col(TimeSlots::TimeStart)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_time_slots_time_start").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_schedules_teacher_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedules_day_slot_classroom")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedules_day_slot_teacher")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("uq_schedules_group_day_slot").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Schedules {
    Table,
    StudyGroupId,
    TeacherId,
    ClassroomId,
    TimeSlotId,
    DayOfWeek,
}

#[derive(Iden)]
enum TimeSlots {
    Table,
    TimeStart,
}
