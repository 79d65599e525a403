mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{
    config::Config,
    doc::ApiDoc,
    routes::{auth, directory, export, health, root, schedule, users},
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes reachable without a bearer token
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
}

/// Routes behind the OAuth2 layer; handlers resolve the caller themselves
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/users", post(users::create_user))
        .route(
            "/schedule",
            get(schedule::get_schedule).post(schedule::create_entry),
        )
        .route("/schedule/check", post(schedule::check_entry))
        .route(
            "/schedule/{id}",
            put(schedule::update_entry).delete(schedule::delete_entry),
        )
        .route(
            "/schedule/export/{scope}/{id}",
            get(export::export_schedule),
        )
        .route(
            "/departments",
            get(directory::list_departments).post(directory::create_department),
        )
        .route(
            "/departments/{id}",
            put(directory::rename_department).delete(directory::delete_department),
        )
        .route(
            "/groups",
            get(directory::list_groups).post(directory::create_group),
        )
        .route("/groups/{id}", delete(directory::delete_group))
        .route(
            "/classrooms",
            get(directory::list_classrooms).post(directory::create_classroom),
        )
        .route("/classrooms/{id}", delete(directory::delete_classroom))
        .route("/teachers", get(directory::list_teachers))
        .route(
            "/subjects",
            get(directory::list_subjects).post(directory::create_subject),
        )
        .route("/lesson-types", get(directory::list_lesson_types))
        .route("/time-slots", get(directory::list_time_slots))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        info!("Migrations applied");
    }

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(&config.oidc_issuer_url)
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let app = public_routes()
        .merge(
            protected_routes()
                .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer())),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

#[cfg(test)]
mod test {
    use super::{protected_routes, public_routes};
    use crate::state::AppState;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(DatabaseConnection::Disconnected)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = public_routes()
            .with_state(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_missing_claims_are_unauthorized() {
        let response = protected_routes()
            .with_state(state())
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
