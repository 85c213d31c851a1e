//! Dynatrace configuration API module
//!
//! Name-addressed create/read/update/delete over the id-addressed
//! configuration API. The client resolves names by listing, writes JSON
//! families with POST/PUT, and routes the extension family through its
//! multipart upload.

pub mod client;
pub mod descriptor;
pub mod error;
pub mod extension;
pub mod models;
pub mod transport;

pub use client::{DynatraceClient, RestClient, find_by_name};
pub use descriptor::{Api, EXTENSION_API_ID, ListShape, UpsertStrategy, find_api, known_apis};
pub use error::{SyncError, SyncResult};
pub use models::{DynatraceEntity, Value};
pub use transport::{HttpTransport, TransportResponse};
