use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not},
};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Day of the week a class meets, numbered 1 (Monday) through 7 (Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Canonical day labels shown in the grid and in every export
    const LABELS: [&'static str; 7] = [
        "Понедельник",
        "Вторник",
        "Среда",
        "Четверг",
        "Пятница",
        "Суббота",
        "Воскресенье",
    ];

    pub fn number(self) -> i16 {
        self as i16
    }

    /// The timetable grid only shows Monday to Saturday, but flat exports
    /// list every stored entry, so Sunday keeps a label here too.
    pub fn label(self) -> &'static str {
        Self::LABELS[(self.number() - 1) as usize]
    }

    /// The single-day [`DaySet`] for this weekday
    pub fn as_set(self) -> DaySet {
        DaySet(1 << (self.number() - 1))
    }
}

impl TryFrom<i16> for Weekday {
    type Error = String;

    fn try_from(day: i16) -> Result<Self, Self::Error> {
        if (1..=7).contains(&day) {
            Ok(Self::ALL[(day - 1) as usize])
        } else {
            Err(format!("day of week must be between 1 and 7, got {day}"))
        }
    }
}

impl From<Weekday> for i16 {
    fn from(day: Weekday) -> Self {
        day.number()
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// A set of weekdays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SUNDAY: Self = DaySet(1 << 6);

    /// Days the timetable grid covers. Sunday is never taught.
    pub const TEACHING_WEEK: Self = DaySet(0b0111111);
    pub const NONE: Self = DaySet(0);

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    pub fn contains_day(self, day: Weekday) -> bool {
        self.contains(day.as_set())
    }

    pub fn add(&mut self, day: Weekday) {
        *self |= day.as_set();
    }

    /// Iterates the days in the set from Monday to Sunday
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(move |day| self.contains_day(*day))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for day in iter {
            set.add(day);
        }
        set
    }
}

impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DaySet(self.0 & rhs.0)
    }
}

impl Not for DaySet {
    type Output = Self;

    fn not(self) -> Self::Output {
        // Apply mask to keep only 7 bits
        DaySet((!self.0) & 0x7F)
    }
}

impl BitOrAssign for DaySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for DaySet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Weekday {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::SmallInt(Some(day)) => <Weekday as TryFrom<i16>>::try_from(day)
                .map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Weekday".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::SmallInt
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::SmallInteger
    }
}

#[cfg(feature = "database")]
impl From<Weekday> for Value {
    fn from(day: Weekday) -> Self {
        Value::SmallInt(Some(day.number()))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Weekday {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: i16 = res.try_get_by(index)?;

        <Weekday as TryFrom<i16>>::try_from(val).map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to decode Weekday: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Weekday {
    fn null() -> Value {
        Value::SmallInt(None)
    }
}

#[cfg(test)]
mod test {
    use super::{DaySet, Weekday};

    #[test]
    fn test_weekday_numbering() {
        assert_eq!(Weekday::try_from(1i16), Ok(Weekday::Monday));
        assert_eq!(Weekday::try_from(7i16), Ok(Weekday::Sunday));
        assert!(Weekday::try_from(0i16).is_err());
        assert!(Weekday::try_from(8i16).is_err());
        assert_eq!(Weekday::Saturday.number(), 6);
    }

    #[test]
    fn test_teaching_week_is_monday_to_saturday() {
        let days: Vec<_> = DaySet::TEACHING_WEEK.days().collect();
        assert_eq!(days.len(), 6);
        assert_eq!(days.first(), Some(&Weekday::Monday));
        assert_eq!(days.last(), Some(&Weekday::Saturday));
        assert!(!DaySet::TEACHING_WEEK.contains_day(Weekday::Sunday));
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            DaySet::TEACHING_WEEK.days().map(Weekday::label).collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(Weekday::Saturday.to_string(), "Суббота");
    }

    #[test]
    fn test_day_set_bitwise_operations() {
        let mwf = DaySet::MONDAY | DaySet::WEDNESDAY | DaySet::FRIDAY;
        assert!(mwf.contains_day(Weekday::Monday));
        assert!(!mwf.contains_day(Weekday::Tuesday));
        assert_eq!(!DaySet::TEACHING_WEEK, DaySet::SUNDAY);

        let set: DaySet = [Weekday::Monday, Weekday::Sunday].into_iter().collect();
        assert_eq!(set & DaySet::TEACHING_WEEK, DaySet::MONDAY);
    }

    #[test]
    fn test_sunday_has_a_label_outside_the_grid() {
        assert!(!DaySet::TEACHING_WEEK.contains_day(Weekday::Sunday));
        assert_eq!(Weekday::Sunday.label(), "Воскресенье");
    }

    #[test]
    fn test_weekday_serializes_as_number() {
        let json = serde_json::to_string(&Weekday::Thursday).unwrap();
        assert_eq!(json, "4");
        let day: Weekday = serde_json::from_str("6").unwrap();
        assert_eq!(day, Weekday::Saturday);
        assert!(serde_json::from_str::<Weekday>("9").is_err());
    }
}
