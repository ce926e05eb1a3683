// ambi-api: Async Rust client for the Ambi Climate cloud REST API

pub mod auth;
pub mod client;
pub mod control;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::Session;
pub use client::AmbiClient;
pub use error::Error;
pub use models::{CommandResponse, ControlQuantity, RemoteDevice};
pub use transport::{DEFAULT_BASE_URL, TransportConfig};
