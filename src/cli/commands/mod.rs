//! CLI command implementations.

mod config;
mod doctor;
mod search;
mod serve;
mod stats;

pub use config::run_config;
pub use doctor::run_doctor;
pub use search::run_search;
pub use serve::run_serve;
pub use stats::run_stats;
