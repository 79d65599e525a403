use crate::{
    schedule::{ScheduleEntry, TimeSlot},
    weekday::{DaySet, Weekday},
};
use log::warn;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Day-by-time-slot lookup of a timetable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleGrid {
    cells: BTreeMap<Weekday, HashMap<Uuid, ScheduleEntry>>,
}

/// One row of a rendered timetable: a time slot and one cell per day
#[derive(Debug, Clone, Serialize)]
pub struct GridRow<'a> {
    pub time_slot: &'a TimeSlot,
    pub cells: Vec<Option<&'a ScheduleEntry>>,
}

impl ScheduleGrid {
    /// Places every entry at `grid[day][time slot]`.
    ///
    /// Only the days in `days` get a column; entries on any other day are
    /// dropped. A second entry for an occupied cell replaces the first, which
    /// only happens when the group uniqueness constraint has been bypassed.
    pub fn build<I>(entries: I, days: DaySet) -> Self
    where
        I: IntoIterator<Item = ScheduleEntry>,
    {
        let mut cells: BTreeMap<Weekday, HashMap<Uuid, ScheduleEntry>> =
            days.days().map(|day| (day, HashMap::new())).collect();

        for entry in entries {
            let Some(column) = cells.get_mut(&entry.day) else {
                continue;
            };

            let (day, slot_id) = (entry.day, entry.time_slot.id);
            if let Some(previous) = column.insert(slot_id, entry) {
                warn!(
                    "Schedule entry {} overwritten in grid cell (day {}, slot {})",
                    previous.id,
                    day.number(),
                    slot_id
                );
            }
        }

        Self { cells }
    }

    /// Builds the Monday to Saturday grid
    pub fn teaching_week<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ScheduleEntry>,
    {
        Self::build(entries, DaySet::TEACHING_WEEK)
    }

    /// Days that have a column, in week order
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.cells.keys().copied()
    }

    pub fn get(&self, day: Weekday, time_slot_id: Uuid) -> Option<&ScheduleEntry> {
        self.cells.get(&day)?.get(&time_slot_id)
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lays the grid out as table rows, one per time slot in the given order
    pub fn rows<'a>(&'a self, time_slots: &'a [TimeSlot]) -> Vec<GridRow<'a>> {
        time_slots
            .iter()
            .map(|time_slot| GridRow {
                time_slot,
                cells: self.days().map(|day| self.get(day, time_slot.id)).collect(),
            })
            .collect()
    }
}
