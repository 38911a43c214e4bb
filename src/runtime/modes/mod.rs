//! Execution modes

pub mod seed;
pub mod server;

pub use seed::run_seed;
pub use server::run_server;
