pub mod app;
pub mod attendance;
pub mod backend;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod punch;
pub mod session;
pub mod state;
pub mod validation;

pub use app::router;
pub use attendance::compute_monthly_attendance;
pub use config::Config;
pub use state::AppState;
