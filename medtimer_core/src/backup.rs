//! Backup and restore of the full application state.
//!
//! Export emits one pretty-printed JSON document holding the profile, the
//! medicine list, and the status overrides. Import validates the document
//! before anything is replaced: on any parse or validation failure it fails
//! with [`Error::Restore`] and the caller's existing state is untouched
//! (replacement only happens on `Ok`).

use crate::{AppState, DoseStatus, Error, MedicineEntry, Profile, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level keys a backup document must carry
const REQUIRED_KEYS: [&str; 2] = ["profile", "meds"];

#[derive(Serialize, Deserialize)]
struct BackupDocument {
    profile: Profile,
    meds: Vec<MedicineEntry>,
    #[serde(default)]
    med_status: HashMap<String, DoseStatus>,
}

/// Serialize the full in-memory state as one backup document
pub fn export_state(state: &AppState) -> Result<String> {
    let document = BackupDocument {
        profile: state.profile.clone(),
        meds: state.meds.clone(),
        med_status: state.overrides.clone(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse and validate a backup document into a fresh state.
///
/// `med_status` is optional and defaults to no overrides; `profile` and
/// `meds` are required.
pub fn import_state(document: &str) -> Result<AppState> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| Error::Restore(format!("not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::Restore("document root must be an object".into()))?;
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(Error::Restore(format!("missing required key '{}'", key)));
        }
    }

    let document: BackupDocument = serde_json::from_value(value)
        .map_err(|e| Error::Restore(format!("malformed document: {}", e)))?;

    Ok(AppState {
        profile: document.profile,
        meds: document.meds,
        overrides: document.med_status,
    })
}
