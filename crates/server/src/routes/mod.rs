pub mod auth;
pub mod directory;
pub mod export;
pub mod health;
pub mod root;
pub mod schedule;
pub mod users;
