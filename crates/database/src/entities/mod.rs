pub mod classroom;
pub mod department;
pub mod lesson_type;
pub mod schedule;
pub mod study_group;
pub mod subject;
pub mod teacher;
pub mod time_slot;
pub mod user;
