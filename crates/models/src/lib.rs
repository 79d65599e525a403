//! Domain model of the university timetable: weekdays, time slots, schedule
//! entries, conflict detection, the timetable grid and its exports.

pub mod conflict;
pub mod export;
pub mod grid;
pub mod schedule;
pub mod view;
pub mod weekday;
