use crate::weekday::Weekday;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};
use uuid::Uuid;

/// A named interval of the teaching day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Formats the slot as `HH:MM-HH:MM`
    pub fn range(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.name, self.start.format("%H:%M"))
    }
}

/// One weekly class meeting with the display names of everything it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub day: Weekday,
    pub time_slot: TimeSlot,
    pub group_id: Uuid,
    pub group_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub lesson_type_id: Uuid,
    pub lesson_type_name: String,
    pub classroom_id: Uuid,
    pub classroom_name: String,
}

/// Timetable order: by day, then by time slot start
pub fn entry_order(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    a.day
        .cmp(&b.day)
        .then_with(|| a.time_slot.start.cmp(&b.time_slot.start))
}


#[cfg(test)]
mod test {
    use super::fixtures::{entry, slot};
    use super::entry_order;
    use crate::weekday::Weekday;

    #[test]
    fn test_time_slot_range_format() {
        let first = slot("1 пара, 1 часть", (8, 15), (9, 0));
        assert_eq!(first.range(), "08:15-09:00");
        assert_eq!(first.to_string(), "1 пара, 1 часть (08:15)");
    }

    #[test]
    fn test_entry_order_by_day_then_slot_start() {
        let early = slot("1 пара", (8, 15), (9, 0));
        let late = slot("2 пара", (10, 0), (10, 45));

        let mut entries = vec![
            entry(Weekday::Tuesday, &early, "Физика"),
            entry(Weekday::Monday, &late, "Химия"),
            entry(Weekday::Monday, &early, "Математика"),
        ];
        entries.sort_by(entry_order);

        let subjects: Vec<_> = entries.iter().map(|e| e.subject_name.as_str()).collect();
        assert_eq!(subjects, vec!["Математика", "Химия", "Физика"]);
    }
}
