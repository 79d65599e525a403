use sea_orm_migration::prelude::*;

/// Lesson types every faculty uses
const LESSON_TYPES: [&str; 3] = ["Лекция", "Практика", "Лабораторная работа"];

/// The standard bell schedule: (name, start, end)
const TIME_SLOTS: [(&str, &str, &str); 15] = [
    ("1 пара, 1 часть", "08:15", "09:00"),
    ("1 пара, 2 часть", "09:05", "09:50"),
    ("2 пара, 1 часть", "10:00", "10:45"),
    ("2 пара, 2 часть", "10:50", "11:35"),
    ("3 пара, 1 часть", "11:45", "12:30"),
    ("3 пара, 2 часть", "12:35", "13:20"),
    ("3 пара, 3 часть", "13:25", "14:10"),
    ("4 пара, 1 часть", "14:20", "15:05"),
    ("4 пара, 2 часть", "15:10", "15:55"),
    ("5 пара, 1 часть", "16:05", "16:50"),
    ("5 пара, 2 часть", "16:55", "17:40"),
    ("6 пара, 1 часть", "17:50", "18:35"),
    ("6 пара, 2 часть", "18:40", "19:25"),
    ("7 пара, 1 часть", "19:35", "20:20"),
    ("7 пара, 2 часть", "20:25", "21:10"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut lesson_types = Query::insert()
            .into_table(LessonTypes::Table)
            .columns([LessonTypes::Id, LessonTypes::Name])
            .on_conflict(OnConflict::column(LessonTypes::Name).do_nothing().to_owned())
            .to_owned();
        for name in LESSON_TYPES {
            lesson_types.values_panic([Expr::cust("gen_random_uuid()"), name.into()]);
        }
        manager.exec_stmt(lesson_types).await?;

        let mut time_slots = Query::insert()
            .into_table(TimeSlots::Table)
            .columns([
                TimeSlots::Id,
                TimeSlots::Name,
                TimeSlots::TimeStart,
                TimeSlots::TimeEnd,
            ])
            .on_conflict(OnConflict::column(TimeSlots::Name).do_nothing().to_owned())
            .to_owned();
        for (name, start, end) in TIME_SLOTS {
            time_slots.values_panic([
                Expr::cust("gen_random_uuid()"),
                name.into(),
                Expr::val(start).cast_as(Alias::new("time")),
                Expr::val(end).cast_as(Alias::new("time")),
            ]);
        }
        manager.exec_stmt(time_slots).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slot_names = TIME_SLOTS.iter().map(|(name, _, _)| *name);
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(TimeSlots::Table)
                    .and_where(Expr::col(TimeSlots::Name).is_in(slot_names))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(LessonTypes::Table)
                    .and_where(Expr::col(LessonTypes::Name).is_in(LESSON_TYPES))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
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
