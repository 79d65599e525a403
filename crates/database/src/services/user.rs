use crate::{
    entities::{teacher, user},
    error::{ServiceError, ServiceResult},
};
use log::info;
use models::view::{Role, ScheduleView};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

/// Profile data the account's role requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProfile {
    Student { study_group_id: Uuid },
    Teacher { department_id: Uuid, email: String },
    Admin,
}

impl NewProfile {
    pub fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Teacher { .. } => Role::Teacher,
            Self::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub subject: String,
    pub full_name: String,
    pub profile: NewProfile,
}

pub struct UserService;

impl UserService {
    /// Looks up the account bound to an OIDC subject
    pub async fn find_by_subject<C: ConnectionTrait>(
        db: &C,
        subject: &str,
    ) -> ServiceResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Subject.eq(subject))
            .one(db)
            .await?)
    }

    /// Derives what part of the timetable a user may see
    pub fn resolve_view(user: &user::Model) -> ServiceResult<ScheduleView> {
        let role = Role::from_str(&user.role)
            .map_err(|_| ServiceError::Profile(format!("unknown role {:?}", user.role)))?;

        match role {
            Role::Student => user
                .study_group_id
                .map(|group_id| ScheduleView::Student { group_id })
                .ok_or_else(|| ServiceError::Profile("student has no study group".to_string())),
            Role::Teacher => user
                .teacher_id
                .map(|teacher_id| ScheduleView::Teacher { teacher_id })
                .ok_or_else(|| ServiceError::Profile("teacher has no teacher record".to_string())),
            Role::Admin => Ok(ScheduleView::Admin { filter: None }),
        }
    }

    /// Creates an account; teachers also get their teacher record
    pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> ServiceResult<user::Model> {
        let txn = db.begin().await?;
        let role = new_user.profile.role();

        let (study_group_id, teacher_id) = match new_user.profile {
            NewProfile::Student { study_group_id } => (Some(study_group_id), None),
            NewProfile::Teacher {
                department_id,
                email,
            } => {
                let teacher = teacher::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(department_id),
                    full_name: Set(new_user.full_name.clone()),
                    email: Set(email),
                }
                .insert(&txn)
                .await
                .map_err(|e| ServiceError::from_write(e, "teacher"))?;

                (None, Some(teacher.id))
            }
            NewProfile::Admin => (None, None),
        };

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            subject: Set(new_user.subject),
            role: Set(role.to_string()),
            full_name: Set(new_user.full_name),
            study_group_id: Set(study_group_id),
            teacher_id: Set(teacher_id),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, "user"))?;

        txn.commit().await?;

        info!("Created {role} account {}", model.id);
        Ok(model)
    }
}
