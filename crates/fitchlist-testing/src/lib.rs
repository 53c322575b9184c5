//! Testing infrastructure for fitchlist tests.
//!
//! - `fetchers`: scripted in-process [`PageFetcher`](fitchlist_engine::PageFetcher)s
//!   with per-request latency and a request log
//! - `fixtures`: sample records shaped like the platform's list payloads
//! - `server`: an axum server speaking the platform's paginated envelope
//! - `world`: isolated data directory + CLI invocation (`TestWorld`)
//! - `assertions`: checks over `fitchlist list --format json` output

pub mod assertions;
pub mod fetchers;
pub mod fixtures;
pub mod server;
pub mod world;

pub use fetchers::{Scripted, ScriptedFetcher};
pub use server::FixtureServer;
pub use world::TestWorld;
