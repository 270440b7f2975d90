// Public fallible APIs in this crate share one concrete error contract (`RadarError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type"
)]

pub mod config;
pub mod delivery;
pub mod digest;
pub mod error;
#[cfg(feature = "markdown-preview")]
pub mod markdown_preview;
pub mod models;
pub mod pricing;
pub mod state;
pub mod subsidy;

pub use config::RadarConfig;
pub use error::{RadarError, Result};
pub use state::{ItemQuery, ItemStore};
