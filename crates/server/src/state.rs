use sea_orm::DatabaseConnection;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Pooled connection; cloning shares the pool
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
