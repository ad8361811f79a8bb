pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod ui;
pub mod validate;
pub mod views;

pub use api::ApiClient;
pub use app::router;
pub use config::Config;
pub use controller::Controller;
pub use state::AppState;
