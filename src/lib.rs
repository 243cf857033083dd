pub mod aggregator;
pub mod app;
pub mod backup;
pub mod config;
pub mod errors;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod predictor;
pub mod state;
pub mod storage;
pub mod transfer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
