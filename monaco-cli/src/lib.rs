//! Create-or-update Dynatrace configuration objects by name.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;

pub use api::{Api, DynatraceClient, DynatraceEntity, RestClient, SyncError, Value};
pub use config::ClientConfig;
