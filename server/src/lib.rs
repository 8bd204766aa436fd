//! Priority Tasks server library
//!
//! Configuration loading, logging setup, database bootstrap and server
//! construction for the `priority-tasks` binary.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::Config;
pub use setup::{
    create_repository, create_server, ensure_database_directory, initialize_app, seed_database,
};
pub use telemetry::init_telemetry;
