// yieldboard-api: Async Rust client for the investment-product admin API

pub mod client;
pub mod error;
pub mod models;
pub mod products;
pub mod session;
pub mod transactions;
pub mod transport;

pub use client::AdminClient;
pub use error::{Error, ErrorBody};
pub use session::ProfileUpdate;
pub use transport::{TlsMode, TransportConfig};
