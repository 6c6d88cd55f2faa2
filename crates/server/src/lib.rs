pub mod routes;
pub mod startup;
pub mod errors;
pub mod extract;
pub mod cors;
pub mod openapi;

pub use startup::{build_app, connect_store, run_with_config, shutdown_signal};
