use models::conflict::Conflict;
use sea_orm::{DbErr, RuntimeErr, SqlErr, sqlx};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Postgres SQLSTATE for an aborted serializable transaction
const SERIALIZATION_FAILURE: &str = "40001";

/// Errors returned by the database services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request collides with the existing timetable
    #[error("schedule conflict: {0}")]
    Conflict(#[from] Conflict),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A row cannot be deleted while other rows still reference it
    #[error("{0} is still referenced and cannot be deleted")]
    InUse(&'static str),

    /// An insert or update points at a row that does not exist
    #[error("{0} refers to a record that does not exist")]
    MissingReference(&'static str),

    #[error("duplicate value: {0}")]
    Duplicate(String),

    /// The account is missing the group or teacher record its role needs
    #[error("incomplete user profile: {0}")]
    Profile(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Classifies a failed schedule insert or update.
    ///
    /// The only unique index on `schedules` covers (group, day, time slot),
    /// so any unique violation there is a group double-booking.
    pub fn from_schedule_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(Conflict::GroupTime),
            sql_err => Self::classify(sql_err, err, "schedule entry", Self::MissingReference),
        }
    }

    /// Classifies a failed insert or update
    pub fn from_write(err: DbErr, entity: &'static str) -> Self {
        Self::classify(err.sql_err(), err, entity, Self::MissingReference)
    }

    /// Classifies a failed delete
    pub fn from_delete(err: DbErr, entity: &'static str) -> Self {
        Self::classify(err.sql_err(), err, entity, Self::InUse)
    }

    /// Whether Postgres aborted the transaction to keep it serializable.
    /// Retrying the whole request may succeed.
    pub fn is_serialization_failure(&self) -> bool {
        let Self::Database(
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(err)))
            | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(err)))
            | DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(err))),
        ) = self
        else {
            return false;
        };

        err.code().as_deref() == Some(SERIALIZATION_FAILURE)
    }

    /// `foreign_key` decides what a foreign key violation means for the caller
    fn classify(
        sql_err: Option<SqlErr>,
        err: DbErr,
        entity: &'static str,
        foreign_key: fn(&'static str) -> Self,
    ) -> Self {
        match sql_err {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Duplicate(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => foreign_key(entity),
            _ => match err {
                DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => Self::NotFound(entity),
                other => Self::Database(other),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::ServiceError;
    use models::conflict::Conflict;
    use sea_orm::{
        DbErr, RuntimeErr, SqlErr,
        sqlx::{
            self,
            error::{DatabaseError, ErrorKind},
        },
    };
    use std::{
        borrow::Cow,
        error::Error as StdError,
        fmt::{Display, Formatter, Result as FmtResult},
    };

    /// A driver error carrying only a SQLSTATE
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl Display for SqlState {
        fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
            write!(f, "SQLSTATE {}", self.0)
        }
    }

    impl StdError for SqlState {}

    impl DatabaseError for SqlState {
        fn message(&self) -> &str {
            "could not serialize access due to read/write dependencies among transactions"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn driver_error(code: &'static str) -> DbErr {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(
            SqlState(code),
        ))))
    }

    #[test]
    fn test_missing_row_on_update_is_not_found() {
        let err = ServiceError::from_schedule_write(DbErr::RecordNotUpdated);
        assert!(matches!(err, ServiceError::NotFound("schedule entry")));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = ServiceError::from_write(DbErr::Custom("connection reset".into()), "group");
        assert!(matches!(err, ServiceError::Database(DbErr::Custom(_))));
    }

    #[test]
    fn test_foreign_key_violation_depends_on_the_operation() {
        let violation = || Some(SqlErr::ForeignKeyConstraintViolation("fk".to_string()));
        let err = || DbErr::Custom("insert or update violates foreign key".into());

        let on_write =
            ServiceError::classify(violation(), err(), "schedule entry", ServiceError::MissingReference);
        assert!(matches!(on_write, ServiceError::MissingReference("schedule entry")));

        let on_delete = ServiceError::classify(violation(), err(), "classroom", ServiceError::InUse);
        assert!(matches!(on_delete, ServiceError::InUse("classroom")));
    }

    #[test]
    fn test_unique_violation_is_duplicate() {
        let err = ServiceError::classify(
            Some(SqlErr::UniqueConstraintViolation("teachers_email_key".to_string())),
            DbErr::Custom("duplicate key".into()),
            "teacher",
            ServiceError::MissingReference,
        );
        assert!(matches!(err, ServiceError::Duplicate(ref detail) if detail == "teachers_email_key"));
    }

    #[test]
    fn test_serialization_failure_is_recognised_by_sqlstate() {
        assert!(ServiceError::Database(driver_error("40001")).is_serialization_failure());
        assert!(!ServiceError::Database(driver_error("23503")).is_serialization_failure());
        assert!(
            !ServiceError::Database(DbErr::Custom("could not serialize access".into()))
                .is_serialization_failure()
        );
        assert!(!ServiceError::NotFound("group").is_serialization_failure());
    }

    #[test]
    fn test_conflict_message() {
        let err = ServiceError::from(Conflict::GroupTime);
        assert_eq!(
            err.to_string(),
            "schedule conflict: the group already has a class at this time"
        );
    }
}
