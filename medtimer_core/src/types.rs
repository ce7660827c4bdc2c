//! Core domain types for MedTimer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Schedule times and dose statuses
//! - Medicine entries and the record collection shape
//! - User profile and in-memory session state

use crate::{Error, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Schedule Time
// ============================================================================

/// A scheduled dose time of day, stored as a zero-padded 24h `HH:MM` string
/// on the wire.
///
/// Parsing is strict: exactly five characters, both fields zero-padded,
/// hour < 24 and minute < 60. Anything else is a precondition violation and
/// fails with [`Error::Format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime(NaiveTime);

impl ScheduleTime {
    /// Build a schedule time from hour and minute components
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| Error::Format(format!("{:02}:{:02}", hour, minute)))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// The underlying wall-clock time, for comparison against `now`
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl Default for ScheduleTime {
    /// 08:00, the time suggested medicines are initially scheduled at
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid wall-clock time"))
    }
}

impl FromStr for ScheduleTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[3].is_ascii_digit()
            && bytes[4].is_ascii_digit();
        if !well_formed {
            return Err(Error::Format(s.to_string()));
        }

        let hour: u32 = s[0..2].parse().map_err(|_| Error::Format(s.to_string()))?;
        let minute: u32 = s[3..5].parse().map_err(|_| Error::Format(s.to_string()))?;
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| Error::Format(s.to_string()))
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl From<ScheduleTime> for String {
    fn from(time: ScheduleTime) -> String {
        time.to_string()
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// ============================================================================
// Dose Status
// ============================================================================

/// Lifecycle state of a scheduled dose.
///
/// `Upcoming`, `Due` and `Missed` are normally derived from the clock on
/// every read; any of the four may also appear as an explicit user-set
/// override, which suppresses derivation entirely.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Upcoming,
    Due,
    Missed,
    Taken,
}

impl DoseStatus {
    /// Short display tag for schedule listings
    pub fn label(&self) -> &'static str {
        match self {
            DoseStatus::Upcoming => "upcoming",
            DoseStatus::Due => "DUE NOW",
            DoseStatus::Missed => "MISSED",
            DoseStatus::Taken => "taken",
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DoseStatus::Upcoming => "upcoming",
            DoseStatus::Due => "due",
            DoseStatus::Missed => "missed",
            DoseStatus::Taken => "taken",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Medicine Entry
// ============================================================================

/// One recorded medicine with its scheduled dose time.
///
/// Uniqueness is not enforced: duplicate names are allowed and
/// disambiguated by position in the record collection. The optional
/// `status` field is the persisted form of a user override; absent means
/// the status is recomputed from the clock on each read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MedicineEntry {
    pub medicine: String,
    pub time: ScheduleTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DoseStatus>,
}

impl MedicineEntry {
    /// Create a bare entry with just a name and dose time
    pub fn new(medicine: impl Into<String>, time: ScheduleTime) -> Self {
        Self {
            medicine: medicine.into(),
            time,
            disease: None,
            country: None,
            state: None,
            timezone: None,
            notes: None,
            status: None,
        }
    }
}

// ============================================================================
// Profile and Session State
// ============================================================================

/// User profile collected by the guided setup
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
}

/// The full in-memory application state: profile, records, and the
/// session-level status overrides (medicine name -> asserted status).
///
/// No process-wide singleton exists; callers own an `AppState` and pass it
/// through the pure transition and derivation functions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub profile: Profile,
    pub meds: Vec<MedicineEntry>,
    pub overrides: HashMap<String, DoseStatus>,
}

impl AppState {
    /// Fold session overrides into the per-entry status fields.
    ///
    /// Used when a session is persisted: the session map wins over whatever
    /// status the entries already carried.
    pub fn flatten_overrides(&mut self) {
        for entry in &mut self.meds {
            if let Some(status) = self.overrides.get(&entry.medicine) {
                entry.status = Some(*status);
            }
        }
        self.overrides.clear();
    }
}

/// Dashboard counts of entries by derived status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub taken: usize,
    pub missed: usize,
    pub due: usize,
    pub upcoming: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_times() {
        let time: ScheduleTime = "08:00".parse().unwrap();
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 0);

        let time: ScheduleTime = "23:59".parse().unwrap();
        assert_eq!(time.hour(), 23);
        assert_eq!(time.minute(), 59);

        let time: ScheduleTime = "00:00".parse().unwrap();
        assert_eq!(time.to_string(), "00:00");
    }

    #[test]
    fn test_parse_rejects_malformed_times() {
        for bad in ["8:00", "08:0", "0800", "08-00", "24:00", "08:60", "ab:cd", "", "08:00 "] {
            assert!(
                bad.parse::<ScheduleTime>().is_err(),
                "'{}' should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_display_is_zero_padded() {
        let time = ScheduleTime::new(7, 5).unwrap();
        assert_eq!(time.to_string(), "07:05");
    }

    #[test]
    fn test_times_order_chronologically() {
        let early: ScheduleTime = "08:30".parse().unwrap();
        let late: ScheduleTime = "17:00".parse().unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_time_serializes_as_string() {
        let time: ScheduleTime = "09:15".parse().unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"09:15\"");

        let parsed: ScheduleTime = serde_json::from_str("\"09:15\"").unwrap();
        assert_eq!(parsed, time);
    }

    #[test]
    fn test_entry_omits_absent_optional_fields() {
        let entry = MedicineEntry::new("Aspirin 75mg", ScheduleTime::default());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"medicine\""));
        assert!(!json.contains("notes"));
        assert!(!json.contains("status"));
    }

    #[test]
    fn test_flatten_overrides_prefers_session_map() {
        let mut entry = MedicineEntry::new("Metformin 500mg", ScheduleTime::default());
        entry.status = Some(DoseStatus::Missed);

        let mut state = AppState::default();
        state.meds.push(entry);
        state
            .overrides
            .insert("Metformin 500mg".into(), DoseStatus::Taken);

        state.flatten_overrides();

        assert_eq!(state.meds[0].status, Some(DoseStatus::Taken));
        assert!(state.overrides.is_empty());
    }
}
