use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teachers::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Teachers::FullName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Teachers::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teachers-department_id")
                            .from(Teachers::Table, Teachers::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create study_groups table
        manager
            .create_table(
                Table::create()
                    .table(StudyGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyGroups::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudyGroups::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StudyGroups::Course).small_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create classrooms table
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classrooms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Classrooms::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classrooms::Kind).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Subjects::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lesson_types table
        manager
            .create_table(
                Table::create()
                    .table(LessonTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LessonTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LessonTypes::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create time_slots table
        manager
            .create_table(
                Table::create()
                    .table(TimeSlots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TimeSlots::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(TimeSlots::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TimeSlots::TimeStart).time().not_null())
                    .col(ColumnDef::new(TimeSlots::TimeEnd).time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create schedules table; every reference blocks deletion of its target
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schedules::StudyGroupId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::LessonTypeId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::ClassroomId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::TimeSlotId).uuid().not_null())
                    .col(
                        ColumnDef::new(Schedules::DayOfWeek)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Schedules::DayOfWeek).between(1, 7)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-study_group_id")
                            .from(Schedules::Table, Schedules::StudyGroupId)
                            .to(StudyGroups::Table, StudyGroups::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-teacher_id")
                            .from(Schedules::Table, Schedules::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-subject_id")
                            .from(Schedules::Table, Schedules::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-lesson_type_id")
                            .from(Schedules::Table, Schedules::LessonTypeId)
                            .to(LessonTypes::Table, LessonTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-classroom_id")
                            .from(Schedules::Table, Schedules::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-time_slot_id")
                            .from(Schedules::Table, Schedules::TimeSlotId)
                            .to(TimeSlots::Table, TimeSlots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Subject)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::StudyGroupId).uuid())
                    .col(ColumnDef::new(Users::TeacherId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-study_group_id")
                            .from(Users::Table, Users::StudyGroupId)
                            .to(StudyGroups::Table, StudyGroups::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-teacher_id")
                            .from(Users::Table, Users::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TimeSlots::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LessonTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudyGroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
    DepartmentId,
    FullName,
    Email,
}

#[derive(Iden)]
enum StudyGroups {
    Table,
    Id,
    Name,
    Course,
}

#[derive(Iden)]
enum Classrooms {
    Table,
    Id,
    Name,
    Kind,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum LessonTypes {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum TimeSlots {
    Table,
    Id,
    Name,
    TimeStart,
    TimeEnd,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
    StudyGroupId,
    TeacherId,
    SubjectId,
    LessonTypeId,
    ClassroomId,
    TimeSlotId,
    DayOfWeek,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Subject,
    Role,
    FullName,
    StudyGroupId,
    TeacherId,
}
