use super::{MAX_NAME_LEN, validate_name};
use crate::error::AppError;
use database::{
    entities::user,
    services::user::{NewProfile, NewUser},
};
use models::view::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// OIDC `sub` claim of the account
    pub subject: String,
    pub full_name: String,
    /// `student`, `teacher` or `admin`
    #[schema(value_type = String)]
    pub role: Role,
    /// Required for students
    pub study_group_id: Option<Uuid>,
    /// Required for teachers
    pub department_id: Option<Uuid>,
    /// Required for teachers
    pub email: Option<String>,
}

impl CreateUserRequest {
    pub fn validated(&self) -> Result<NewUser, AppError> {
        let subject = validate_name("subject", &self.subject, MAX_NAME_LEN)?;
        let full_name = validate_name("full_name", &self.full_name, MAX_NAME_LEN)?;

        let profile = match self.role {
            Role::Student => NewProfile::Student {
                study_group_id: self.study_group_id.ok_or_else(|| {
                    AppError::BadRequest("students need a study_group_id".to_string())
                })?,
            },
            Role::Teacher => {
                let department_id = self.department_id.ok_or_else(|| {
                    AppError::BadRequest("teachers need a department_id".to_string())
                })?;
                let email = self
                    .email
                    .as_deref()
                    .ok_or_else(|| AppError::BadRequest("teachers need an email".to_string()))?;
                let email = validate_name("email", email, MAX_NAME_LEN)?;
                if !email.contains('@') {
                    return Err(AppError::BadRequest(format!("invalid email {email:?}")));
                }
                NewProfile::Teacher {
                    department_id,
                    email,
                }
            }
            Role::Admin => NewProfile::Admin,
        };

        Ok(NewUser {
            subject,
            full_name,
            profile,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub subject: String,
    pub role: String,
    pub full_name: String,
    pub study_group_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            subject: model.subject,
            role: model.role,
            full_name: model.full_name,
            study_group_id: model.study_group_id,
            teacher_id: model.teacher_id,
        }
    }
}
