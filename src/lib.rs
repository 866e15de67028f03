//! # sotagents
//!
//! Typed client for the sotagents.com API: research papers, code repositories,
//! tasks, datasets, methods and benchmark evaluations.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Validated request and response types, and the [`Page`] listing
//! - [`client`]: The [`Client`] facade, one async method per API operation
//! - [`transport`]: The [`Transport`] seam with the reqwest and mock implementations
//! - [`config`]: Typed configuration backed by a TOML file
//! - [`error`]: The [`ClientError`] taxonomy
//! - [`ui`]: Terminal rendering used by the `sotagents` binary

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;
pub mod ui;

// Re-export commonly used types
pub use client::{Client, Pagination};
pub use config::Config;
pub use error::{ClientError, Result};
pub use models::{Model, Page};
pub use transport::{HttpTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
