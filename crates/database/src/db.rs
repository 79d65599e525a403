use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Creates a pooled database connection
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(options).await?;
    info!("Connected to database");
    Ok(db)
}
