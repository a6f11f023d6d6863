//! kosku-api: REST backend for menu and rental-contract management.
//!
//! Resources delegate all persistence to a shared parameterized SQL
//! builder/executor layer; rows are soft-deleted, never removed.

pub mod clock;
pub mod config;
pub mod contract;
pub mod error;
pub mod menu;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, FieldError};
pub use response::Pagination;
pub use routes::app;
pub use state::AppState;
