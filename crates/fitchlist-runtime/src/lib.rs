//! Configuration and HTTP plumbing for fitchlist.
//!
//! [`Config`] describes where the API lives and which list resources it
//! exposes. [`ApiClient`] turns a resource into a
//! [`PageFetcher`](fitchlist_engine::PageFetcher) that speaks the
//! platform's paginated envelope.

pub mod client;
pub mod config;
pub mod error;
pub mod resource;

pub use client::{ApiClient, ResourceFetcher};
pub use config::{ApiConfig, Config};
pub use error::{Error, Result};
pub use resource::{ResourceConfig, builtin_resources};
