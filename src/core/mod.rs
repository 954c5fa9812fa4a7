//! Core bridge infrastructure: configuration, errors, the protocol
//! server, and the transport layer.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::BridgeServer;
