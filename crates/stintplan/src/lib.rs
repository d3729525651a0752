//! `stintplan` - Team roster and stint planning for endurance sim races
//!
//! This library keeps every team's pilot availability and hour-by-hour driver
//! schedule in one shared document, reconciles the schedule whenever
//! availability changes, and derives the views, summaries and CSV exports a
//! team manager works from.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod availability;
pub mod cli;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod gateway;
pub mod logging;
pub mod reconcile;
pub mod session;
pub mod storage;
pub mod summary;
pub mod team;
pub mod view;

pub use config::Config;
pub use document::StoreDocument;
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use logging::init_logging;
pub use session::Session;
pub use storage::{DocumentStore, MemoryStore, Storage, StorageStats};
pub use summary::Summary;
pub use team::{PilotAvailability, RaceConfig, RaceDuration, StintAssignment, Team};
pub use view::TeamView;
