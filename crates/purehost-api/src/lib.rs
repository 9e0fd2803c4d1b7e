// purehost-api: Async Rust client for the FlashArray REST API (hosts + connections)

pub mod auth;
pub mod client;
pub mod error;
pub mod hosts;
pub mod models;
pub mod transport;

pub use auth::Credentials;
pub use client::{ArrayClient, DEFAULT_API_VERSION};
pub use error::Error;
pub use models::{Host, HostAttributes, HostConnection, HostDetail};
pub use transport::{TlsMode, TransportConfig};
