//! Study scheduling and session analytics engine.
//!
//! A library-shaped application over a local SQLite store. Front-ends open a
//! [`StudyEngine`] from an [`EngineConfig`] and call its components directly;
//! failures come back as [`StudyError`] values with a serializable
//! [`ErrorBody`](error::ErrorBody).

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod services;

pub use config::{EngineConfig, StoreLocation};
pub use engine::StudyEngine;
pub use error::{ErrorBody, ErrorKind, Result, StudyError};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
