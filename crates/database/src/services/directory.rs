use crate::{
    entities::{classroom, department, lesson_type, study_group, subject, teacher},
    error::{ServiceError, ServiceResult},
};
use log::info;
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder,
};
use uuid::Uuid;

/// Administration of the reference tables the timetable points at
pub struct DirectoryService;

impl DirectoryService {
    pub async fn list_departments<C: ConnectionTrait>(
        db: &C,
    ) -> ServiceResult<Vec<department::Model>> {
        Ok(department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn create_department<C: ConnectionTrait>(
        db: &C,
        name: String,
    ) -> ServiceResult<department::Model> {
        let model = department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "department"))?;

        info!("Created department {} ({})", model.name, model.id);
        Ok(model)
    }

    pub async fn rename_department<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        name: String,
    ) -> ServiceResult<department::Model> {
        let model = department::ActiveModel {
            id: Unchanged(id),
            name: Set(name),
        }
        .update(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "department"))?;

        info!("Renamed department {id} to {}", model.name);
        Ok(model)
    }

    /// Fails with [`ServiceError::InUse`] while teachers belong to the department
    pub async fn delete_department<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<()> {
        Self::delete::<department::Entity, _>(db, id, "department").await
    }

    /// Groups ordered by course, then name
    pub async fn list_groups<C: ConnectionTrait>(db: &C) -> ServiceResult<Vec<study_group::Model>> {
        Ok(study_group::Entity::find()
            .order_by_asc(study_group::Column::Course)
            .order_by_asc(study_group::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn create_group<C: ConnectionTrait>(
        db: &C,
        name: String,
        course: i16,
    ) -> ServiceResult<study_group::Model> {
        let model = study_group::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            course: Set(course),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "group"))?;

        info!("Created group {} ({})", model.name, model.id);
        Ok(model)
    }

    /// Fails with [`ServiceError::InUse`] while students or classes reference the group
    pub async fn delete_group<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<()> {
        Self::delete::<study_group::Entity, _>(db, id, "group").await
    }

    pub async fn list_classrooms<C: ConnectionTrait>(
        db: &C,
    ) -> ServiceResult<Vec<classroom::Model>> {
        Ok(classroom::Entity::find()
            .order_by_asc(classroom::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn create_classroom<C: ConnectionTrait>(
        db: &C,
        name: String,
        kind: String,
    ) -> ServiceResult<classroom::Model> {
        let model = classroom::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            kind: Set(kind),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "classroom"))?;

        info!("Created classroom {} ({})", model.name, model.id);
        Ok(model)
    }

    /// Fails with [`ServiceError::InUse`] while classes are scheduled in the classroom
    pub async fn delete_classroom<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<()> {
        Self::delete::<classroom::Entity, _>(db, id, "classroom").await
    }

    pub async fn list_teachers<C: ConnectionTrait>(db: &C) -> ServiceResult<Vec<teacher::Model>> {
        Ok(teacher::Entity::find()
            .order_by_asc(teacher::Column::FullName)
            .all(db)
            .await?)
    }

    pub async fn list_subjects<C: ConnectionTrait>(db: &C) -> ServiceResult<Vec<subject::Model>> {
        Ok(subject::Entity::find()
            .order_by_asc(subject::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn create_subject<C: ConnectionTrait>(
        db: &C,
        name: String,
    ) -> ServiceResult<subject::Model> {
        let model = subject::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "subject"))?;

        info!("Created subject {} ({})", model.name, model.id);
        Ok(model)
    }

    pub async fn list_lesson_types<C: ConnectionTrait>(
        db: &C,
    ) -> ServiceResult<Vec<lesson_type::Model>> {
        Ok(lesson_type::Entity::find()
            .order_by_asc(lesson_type::Column::Name)
            .all(db)
            .await?)
    }

    async fn delete<E, C>(db: &C, id: Uuid, entity: &'static str) -> ServiceResult<()>
    where
        E: EntityTrait,
        E::PrimaryKey: sea_orm::PrimaryKeyTrait<ValueType = Uuid>,
        C: ConnectionTrait,
    {
        let result = E::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| ServiceError::from_delete(e, entity))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(entity));
        }

        info!("Deleted {entity} {id}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::DirectoryService;
    use crate::{entities::department, error::ServiceError};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_list_departments_returns_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                department::Model {
                    id: Uuid::new_v4(),
                    name: "Кафедра высшей математики".to_string(),
                },
                department::Model {
                    id: Uuid::new_v4(),
                    name: "Кафедра физики".to_string(),
                },
            ]])
            .into_connection();

        let departments = DirectoryService::list_departments(&db).await.unwrap();
        assert_eq!(departments.len(), 2);
        assert_eq!(departments[1].name, "Кафедра физики");
    }

    #[tokio::test]
    async fn test_delete_unknown_classroom_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = DirectoryService::delete_classroom(&db, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("classroom")));
    }
}
