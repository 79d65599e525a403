use crate::routes::{auth, directory, export, health, root, schedule, users};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        auth::me,
        users::create_user,
        schedule::get_schedule,
        schedule::check_entry,
        schedule::create_entry,
        schedule::update_entry,
        schedule::delete_entry,
        export::export_schedule,
        directory::list_departments,
        directory::create_department,
        directory::rename_department,
        directory::delete_department,
        directory::list_groups,
        directory::create_group,
        directory::delete_group,
        directory::list_classrooms,
        directory::create_classroom,
        directory::delete_classroom,
        directory::list_teachers,
        directory::list_subjects,
        directory::create_subject,
        directory::list_lesson_types,
        directory::list_time_slots
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "Accounts and the current user"),
        (name = "Schedule", description = "Timetable viewing, editing and export"),
        (name = "Directory", description = "Departments, groups, classrooms and other reference data"),
    ),
    info(
        title = "University Schedule API",
        version = "1.0.0",
        description = "Class schedule editor with conflict detection",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_document_lists_schedule_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/schedule"));
        assert!(doc.paths.paths.contains_key("/schedule/export/{scope}/{id}"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("jwt"))
        );
    }
}
