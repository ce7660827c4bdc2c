#![forbid(unsafe_code)]

//! Core domain model and business logic for MedTimer.
//!
//! This crate provides:
//! - Domain types (medicines, schedule times, dose statuses, profile)
//! - The dose status engine
//! - Record store and backup/restore
//! - Built-in location and condition catalogs
//! - The guided setup wizard state machine

pub mod types;
pub mod error;
pub mod status;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod backup;
pub mod wizard;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use status::{derive_status, effective_override, entry_status, summarize};
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use store::RecordStore;
pub use backup::{export_state, import_state};
pub use wizard::{SetupAction, SetupState, SetupStep};
