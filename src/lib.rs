pub mod app;
pub mod config;
pub mod errors;
pub mod fields;
pub mod handlers;
pub mod models;
pub mod reports;
pub mod schedule;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod summarizer;
pub mod summary;
pub mod sync;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::DayStore;
