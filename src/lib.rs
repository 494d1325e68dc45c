// src/lib.rs

pub mod types;
pub mod config;
pub mod error;
pub mod logging;
pub mod compact;
pub mod validation;
pub mod providers;
pub mod api;
pub mod server;

// Re-export commonly used types
pub use types::*;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult, FailureBody};
pub use providers::ProviderError;
pub use server::{create_router, run_server, AppState};
