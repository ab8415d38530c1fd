pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod store;

pub use error::{Error, Result};
pub use models::*;
