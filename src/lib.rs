#![doc = "The `taskflow` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence, JWT authentication, routing and error handling for"]
#![doc = "the TaskFlow API. The `taskflow` binary serves it; the `seed` binary fills a"]
#![doc = "database with sample data."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;

pub use crate::config::Settings;
pub use crate::error::AppError;
