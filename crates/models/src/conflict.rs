use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// A proposed assignment awaiting a conflict check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub group_id: Uuid,
    pub teacher_id: Uuid,
    pub classroom_id: Uuid,
    pub day: Weekday,
    pub time_slot_id: Uuid,
}

/// An existing assignment as seen by the conflict checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub classroom_id: Uuid,
    pub classroom_name: String,
    pub day: Weekday,
    pub time_slot_id: Uuid,
}

impl Occupant {
    fn same_moment(&self, candidate: &Candidate, exclude_id: Option<Uuid>) -> bool {
        self.day == candidate.day
            && self.time_slot_id == candidate.time_slot_id
            && Some(self.id) != exclude_id
    }
}

/// Why a candidate assignment was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// The teacher already teaches in another classroom at that moment
    Teacher { classroom_name: String },
    /// Another teacher already holds the classroom at that moment
    Room { teacher_name: String },
    /// The group already has a class at that moment
    GroupTime,
}

impl Conflict {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Teacher { .. } => "TEACHER_CONFLICT",
            Self::Room { .. } => "ROOM_CONFLICT",
            Self::GroupTime => "GROUP_TIME_CONFLICT",
        }
    }
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Teacher { classroom_name } => write!(
                f,
                "the teacher is already scheduled in classroom {classroom_name} at this time"
            ),
            Self::Room { teacher_name } => write!(
                f,
                "the classroom is already occupied by {teacher_name} at this time"
            ),
            Self::GroupTime => f.write_str("the group already has a class at this time"),
        }
    }
}

impl std::error::Error for Conflict {}

/// Checks a candidate against existing assignments.
///
/// The teacher check runs first and only the first conflict found is
/// returned. `exclude_id` removes the assignment being edited from the
/// comparison. Group double-booking is left to the storage uniqueness
/// constraint and never reported here.
///
/// # Returns
/// `None` when the candidate collides with nothing
pub fn check_conflict<'a, I>(
    candidate: &Candidate,
    exclude_id: Option<Uuid>,
    occupants: I,
) -> Option<Conflict>
where
    I: IntoIterator<Item = &'a Occupant>,
    I::IntoIter: Clone,
{
    let occupants = occupants
        .into_iter()
        .filter(|o| o.same_moment(candidate, exclude_id));

    let teacher_busy = occupants.clone().find(|o| {
        o.teacher_id == candidate.teacher_id && o.classroom_id != candidate.classroom_id
    });
    if let Some(other) = teacher_busy {
        return Some(Conflict::Teacher {
            classroom_name: other.classroom_name.clone(),
        });
    }

    occupants
        .filter(|o| o.classroom_id == candidate.classroom_id && o.teacher_id != candidate.teacher_id)
        .map(|other| Conflict::Room {
            teacher_name: other.teacher_name.clone(),
        })
        .next()
}

#[cfg(test)]
mod test {
    use super::{Candidate, Conflict, Occupant, check_conflict};
    use crate::weekday::Weekday;
    use uuid::Uuid;

    struct Fixture {
        t1: Uuid,
        t2: Uuid,
        r1: Uuid,
        r2: Uuid,
        s1: Uuid,
        existing: Vec<Occupant>,
    }

    fn occupant(teacher: (Uuid, &str), room: (Uuid, &str), day: Weekday, slot: Uuid) -> Occupant {
        Occupant {
            id: Uuid::new_v4(),
            teacher_id: teacher.0,
            teacher_name: teacher.1.to_string(),
            classroom_id: room.0,
            classroom_name: room.1.to_string(),
            day,
            time_slot_id: slot,
        }
    }

    fn fixture() -> Fixture {
        let (t1, t2, r1, r2, s1) = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        let existing = vec![occupant((t1, "T1"), (r1, "R1"), Weekday::Monday, s1)];

        Fixture {
            t1,
            t2,
            r1,
            r2,
            s1,
            existing,
        }
    }

    fn candidate(teacher_id: Uuid, classroom_id: Uuid, day: Weekday, slot: Uuid) -> Candidate {
        Candidate {
            group_id: Uuid::new_v4(),
            teacher_id,
            classroom_id,
            day,
            time_slot_id: slot,
        }
    }

    #[test]
    fn test_teacher_in_other_room_is_teacher_conflict() {
        let f = fixture();
        let c = candidate(f.t1, f.r2, Weekday::Monday, f.s1);

        assert_eq!(
            check_conflict(&c, None, &f.existing),
            Some(Conflict::Teacher {
                classroom_name: "R1".to_string()
            })
        );
    }

    #[test]
    fn test_other_teacher_in_room_is_room_conflict() {
        let f = fixture();
        let c = candidate(f.t2, f.r1, Weekday::Monday, f.s1);

        assert_eq!(
            check_conflict(&c, None, &f.existing),
            Some(Conflict::Room {
                teacher_name: "T1".to_string()
            })
        );
    }

    #[test]
    fn test_disjoint_teacher_and_room_is_clear() {
        let f = fixture();
        let c = candidate(f.t2, f.r2, Weekday::Monday, f.s1);

        assert_eq!(check_conflict(&c, None, &f.existing), None);
    }

    #[test]
    fn test_same_teacher_same_room_is_not_reported() {
        // Both rules require the other axis to differ; a group clash here is
        // the storage constraint's job.
        let f = fixture();
        let c = candidate(f.t1, f.r1, Weekday::Monday, f.s1);

        assert_eq!(check_conflict(&c, None, &f.existing), None);
    }

    #[test]
    fn test_other_day_or_slot_is_clear() {
        let f = fixture();
        let other_day = candidate(f.t1, f.r2, Weekday::Tuesday, f.s1);
        let other_slot = candidate(f.t1, f.r2, Weekday::Monday, Uuid::new_v4());

        assert_eq!(check_conflict(&other_day, None, &f.existing), None);
        assert_eq!(check_conflict(&other_slot, None, &f.existing), None);
    }

    #[test]
    fn test_teacher_conflict_wins_over_room_conflict() {
        let f = fixture();
        let mut existing = f.existing.clone();
        // T2 holds R2 while T1 holds R1; moving T1 into R2 trips both rules
        existing.push(occupant((f.t2, "T2"), (f.r2, "R2"), Weekday::Monday, f.s1));

        let c = candidate(f.t1, f.r2, Weekday::Monday, f.s1);
        assert_eq!(
            check_conflict(&c, None, &existing),
            Some(Conflict::Teacher {
                classroom_name: "R1".to_string()
            })
        );
    }

    #[test]
    fn test_self_edit_is_excluded() {
        let f = fixture();
        let mut existing = f.existing.clone();
        let edited = occupant((f.t2, "T2"), (f.r2, "R2"), Weekday::Monday, f.s1);
        let edited_id = edited.id;
        existing.push(edited);

        // Moving T2's class into R1 would clash with T1 either way
        let c = candidate(f.t2, f.r1, Weekday::Monday, f.s1);
        assert!(check_conflict(&c, Some(edited_id), &existing).is_some());

        // Saving the class unchanged must not clash with itself
        let unchanged = candidate(f.t2, f.r2, Weekday::Monday, f.s1);
        assert_eq!(check_conflict(&unchanged, Some(edited_id), &existing), None);

        // Excluding the only clashing row clears the teacher conflict
        let c = candidate(f.t1, f.r2, Weekday::Monday, f.s1);
        assert_eq!(check_conflict(&c, Some(f.existing[0].id), &f.existing), None);
    }

    #[test]
    fn test_conflict_codes_and_messages() {
        let teacher = Conflict::Teacher {
            classroom_name: "305".to_string(),
        };
        assert_eq!(teacher.code(), "TEACHER_CONFLICT");
        assert!(teacher.to_string().contains("305"));

        let room = Conflict::Room {
            teacher_name: "Петров".to_string(),
        };
        assert_eq!(room.code(), "ROOM_CONFLICT");
        assert!(room.to_string().contains("Петров"));

        assert_eq!(Conflict::GroupTime.code(), "GROUP_TIME_CONFLICT");
    }
}
