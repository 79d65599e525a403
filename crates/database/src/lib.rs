//! Persistence layer: sea-orm entities and the services the API calls.

pub mod db;
pub mod entities;
pub mod error;
pub mod services;
