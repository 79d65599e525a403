use crate::schedule::{ScheduleEntry, entry_order};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Column headers of the CSV export
pub const CSV_HEADERS: [&str; 7] = ["Day", "Time", "Subject", "Type", "Room", "Group", "Teacher"];

/// A schedule entry flattened for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub day_of_week: &'static str,
    pub time_start: String,
    pub time_end: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub classroom: String,
    pub group: String,
    pub teacher: String,
}

impl From<&ScheduleEntry> for ExportRow {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            day_of_week: entry.day.label(),
            time_start: entry.time_slot.start.format("%H:%M").to_string(),
            time_end: entry.time_slot.end.format("%H:%M").to_string(),
            subject: entry.subject_name.clone(),
            lesson_type: entry.lesson_type_name.clone(),
            classroom: entry.classroom_name.clone(),
            group: entry.group_name.clone(),
            teacher: entry.teacher_name.clone(),
        }
    }
}

/// Whose timetable is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "lowercase")]
pub enum ExportTarget {
    Group(Uuid),
    Teacher(Uuid),
}

impl ExportTarget {
    pub fn file_name(&self, format: ExportFormat) -> String {
        let (scope, id) = match self {
            Self::Group(id) => ("group", id),
            Self::Teacher(id) => ("teacher", id),
        };
        format!("schedule_{scope}_{id}.{}", format.extension())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

/// Field separator of the CSV export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Semicolon => b';',
            Self::Comma => b',',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semicolon" | ";" => Ok(Self::Semicolon),
            "comma" | "," => Ok(Self::Comma),
            other => Err(format!("unknown delimiter: {other}")),
        }
    }
}

/// Projects entries to export rows in timetable order, whatever order they arrive in
pub fn export_rows<'a, I>(entries: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    let mut entries: Vec<&ScheduleEntry> = entries.into_iter().collect();
    entries.sort_by(|a, b| entry_order(a, b));
    entries.into_iter().map(ExportRow::from).collect()
}

/// Writes rows as CSV with the `Day,Time,Subject,Type,Room,Group,Teacher` header
pub fn to_csv(rows: &[ExportRow], delimiter: Delimiter) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        let time = format!("{}-{}", row.time_start, row.time_end);
        writer.write_record([
            row.day_of_week,
            time.as_str(),
            row.subject.as_str(),
            row.lesson_type.as_str(),
            row.classroom.as_str(),
            row.group.as_str(),
            row.teacher.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field written above is a &str, so the buffer is valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes rows as a pretty-printed JSON array
pub fn to_json(rows: &[ExportRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

#[cfg(test)]
mod test {
    use super::{Delimiter, ExportFormat, ExportTarget, export_rows, to_csv, to_json};
    use crate::{
        schedule::fixtures::{entry, slot},
        weekday::Weekday,
    };
    use uuid::Uuid;

    #[test]
    fn test_csv_header_and_semicolon_rows() {
        let first = slot("1 пара", (8, 15), (9, 0));
        let entries = vec![entry(Weekday::Monday, &first, "Математика")];

        let csv = to_csv(&export_rows(&entries), Delimiter::Semicolon).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("Day;Time;Subject;Type;Room;Group;Teacher"));
        assert_eq!(
            lines.next(),
            Some("Понедельник;08:15-09:00;Математика;Лекция;101;ИВТ-21;Иванов И.И.")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_comma_quotes_embedded_commas() {
        let first = slot("1 пара", (8, 15), (9, 0));
        let mut e = entry(Weekday::Saturday, &first, "Физика");
        e.classroom_name = "Корпус 2, 305".to_string();

        let csv = to_csv(&export_rows([&e]), Delimiter::Comma).unwrap();

        assert!(csv.starts_with("Day,Time,Subject,Type,Room,Group,Teacher\n"));
        assert!(csv.contains("Суббота,08:15-09:00,Физика,Лекция,\"Корпус 2, 305\""));
    }

    #[test]
    fn test_json_keys() {
        let first = slot("1 пара", (8, 15), (9, 0));
        let entries = vec![entry(Weekday::Tuesday, &first, "Химия")];

        let json = to_json(&export_rows(&entries)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value[0].as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "classroom",
                "day_of_week",
                "group",
                "subject",
                "teacher",
                "time_end",
                "time_start",
                "type"
            ]
        );
        assert_eq!(object["day_of_week"], "Вторник");
        assert_eq!(object["time_end"], "09:00");
    }

    #[test]
    fn test_export_file_names() {
        let id = Uuid::nil();
        assert_eq!(
            ExportTarget::Group(id).file_name(ExportFormat::Csv),
            format!("schedule_group_{id}.csv")
        );
        assert_eq!(
            ExportTarget::Teacher(id).file_name(ExportFormat::Json),
            format!("schedule_teacher_{id}.json")
        );
    }

    #[test]
    fn test_rows_follow_timetable_order() {
        let early = slot("1 пара", (8, 15), (9, 0));
        let late = slot("2 пара", (10, 0), (10, 45));
        let entries = vec![
            entry(Weekday::Wednesday, &early, "Физика"),
            entry(Weekday::Monday, &late, "Химия"),
            entry(Weekday::Sunday, &early, "Черчение"),
            entry(Weekday::Monday, &early, "Математика"),
        ];

        let subjects: Vec<_> = export_rows(&entries)
            .into_iter()
            .map(|row| row.subject)
            .collect();
        assert_eq!(subjects, vec!["Математика", "Химия", "Физика", "Черчение"]);
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!("comma".parse::<Delimiter>(), Ok(Delimiter::Comma));
        assert_eq!(";".parse::<Delimiter>(), Ok(Delimiter::Semicolon));
        assert!("tab".parse::<Delimiter>().is_err());
    }
}
