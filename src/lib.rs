pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use app::{build_router, AppState};
pub use config::AppConfig;
pub use services::DatabaseService;
