//! Channel logo updater
//!
//! Assigns channel logos in XMLTV guides and M3U playlists. Guide channels
//! are matched against a catalog of known logo files; curated fixes then
//! override individual channels; playlist entries take their logo from the
//! finished guide, the fixes or the catalog, in that order.

pub mod config;
pub mod errors;
pub mod logo_matching;
pub mod m3u;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod services;
pub mod utils;
pub mod xmltv;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use pipeline::{Orchestrator, RunSummary};
