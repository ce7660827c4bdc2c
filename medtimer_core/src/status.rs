//! Dose status engine.
//!
//! Classifies each scheduled dose as upcoming, due, missed, or taken from
//! the current wall-clock time, unless an explicit user override is present.
//! Derivation is pure and recomputed lazily on every read; nothing here is
//! pushed by timers.

use crate::{AppState, DoseStatus, MedicineEntry, ScheduleTime, StatusSummary};
use chrono::{NaiveTime, Timelike};
use std::collections::HashMap;

/// Half-width of the "due" window, in minutes
pub const DUE_WINDOW_MINUTES: i64 = 30;

/// Derive the display status for one dose.
///
/// The rules form a prioritized list, evaluated first match wins:
///
/// 1. An explicit override is terminal and returned unchanged.
/// 2. `now` strictly past the scheduled time -> `Missed`.
/// 3. Same hour as the scheduled time and within 30 minutes of it -> `Due`.
/// 4. Otherwise -> `Upcoming`.
///
/// Rule 2 is checked before rule 3, so a dose scheduled at 08:50 reads
/// `Missed` at 09:10 even though only 20 minutes have passed. The window is
/// asymmetric and only ever fires while `now` has not passed the schedule.
/// Stakeholders have flagged this as a possible latent quirk; the ordering
/// is kept exactly as-is rather than reworked into a symmetric window.
pub fn derive_status(
    scheduled: ScheduleTime,
    override_status: Option<DoseStatus>,
    now: NaiveTime,
) -> DoseStatus {
    if let Some(status) = override_status {
        return status;
    }

    if now > scheduled.as_naive() {
        DoseStatus::Missed
    } else if now.hour() == scheduled.hour()
        && (now.minute() as i64 - scheduled.minute() as i64).abs() <= DUE_WINDOW_MINUTES
    {
        DoseStatus::Due
    } else {
        DoseStatus::Upcoming
    }
}

/// Resolve which override applies to an entry.
///
/// Session-level overrides (keyed by medicine name) win over the status
/// persisted on the entry itself.
pub fn effective_override(
    overrides: &HashMap<String, DoseStatus>,
    entry: &MedicineEntry,
) -> Option<DoseStatus> {
    overrides.get(&entry.medicine).copied().or(entry.status)
}

/// Derive the display status of an entry within a session
pub fn entry_status(state: &AppState, entry: &MedicineEntry, now: NaiveTime) -> DoseStatus {
    derive_status(entry.time, effective_override(&state.overrides, entry), now)
}

/// Count entries by derived status for the dashboard summary
pub fn summarize(state: &AppState, now: NaiveTime) -> StatusSummary {
    let mut summary = StatusSummary {
        total: state.meds.len(),
        ..Default::default()
    };

    for entry in &state.meds {
        match entry_status(state, entry, now) {
            DoseStatus::Taken => summary.taken += 1,
            DoseStatus::Missed => summary.missed += 1,
            DoseStatus::Due => summary.due += 1,
            DoseStatus::Upcoming => summary.upcoming += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(s: &str) -> ScheduleTime {
        s.parse().unwrap()
    }

    fn clock(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_within_window_is_due() {
        assert_eq!(
            derive_status(scheduled("08:00"), None, clock(8, 0)),
            DoseStatus::Due
        );
    }

    #[test]
    fn test_after_schedule_is_missed() {
        assert_eq!(
            derive_status(scheduled("08:00"), None, clock(8, 45)),
            DoseStatus::Missed
        );
        assert_eq!(
            derive_status(scheduled("08:00"), None, clock(8, 1)),
            DoseStatus::Missed
        );
        assert_eq!(
            derive_status(scheduled("08:00"), None, clock(23, 59)),
            DoseStatus::Missed
        );
    }

    #[test]
    fn test_before_schedule_far_out_is_upcoming() {
        assert_eq!(
            derive_status(scheduled("08:00"), None, clock(7, 30)),
            DoseStatus::Upcoming
        );
        assert_eq!(
            derive_status(scheduled("17:00"), None, clock(9, 0)),
            DoseStatus::Upcoming
        );
    }

    #[test]
    fn test_scenario_0800() {
        // Under the literal rule order, anything past the schedule is
        // missed; the due window only exists at or before the schedule.
        let t = scheduled("08:00");
        assert_eq!(derive_status(t, None, clock(8, 15)), DoseStatus::Missed);
        assert_eq!(derive_status(t, None, clock(8, 45)), DoseStatus::Missed);
        assert_eq!(derive_status(t, None, clock(7, 30)), DoseStatus::Upcoming);

        // Same hour, not yet past, within 30 minutes: due
        assert_eq!(
            derive_status(scheduled("08:30"), None, clock(8, 15)),
            DoseStatus::Due
        );
    }

    #[test]
    fn test_missed_check_wins_across_hour_boundary() {
        // 20 minutes late but a different hour: the missed rule fires first,
        // the due window never gets a chance.
        assert_eq!(
            derive_status(scheduled("08:50"), None, clock(9, 10)),
            DoseStatus::Missed
        );
    }

    #[test]
    fn test_due_requires_same_hour() {
        // 15 minutes early but across an hour boundary is still upcoming
        assert_eq!(
            derive_status(scheduled("09:05"), None, clock(8, 50)),
            DoseStatus::Upcoming
        );
    }

    #[test]
    fn test_same_hour_outside_window_is_upcoming() {
        assert_eq!(
            derive_status(scheduled("08:55"), None, clock(8, 10)),
            DoseStatus::Upcoming
        );
    }

    #[test]
    fn test_seconds_count_toward_missed() {
        // The comparison is against the full clock reading, so one second
        // past the schedule already reads missed.
        let just_past = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
        assert_eq!(
            derive_status(scheduled("08:00"), None, just_past),
            DoseStatus::Missed
        );
    }

    #[test]
    fn test_override_always_wins() {
        let t = scheduled("08:00");
        for now in [clock(0, 0), clock(8, 15), clock(23, 59)] {
            assert_eq!(
                derive_status(t, Some(DoseStatus::Taken), now),
                DoseStatus::Taken
            );
            assert_eq!(
                derive_status(t, Some(DoseStatus::Missed), now),
                DoseStatus::Missed
            );
        }
    }

    #[test]
    fn test_session_override_beats_persisted_status() {
        let mut entry = MedicineEntry::new("Aspirin 75mg", scheduled("08:00"));
        entry.status = Some(DoseStatus::Missed);

        let mut overrides = HashMap::new();
        assert_eq!(
            effective_override(&overrides, &entry),
            Some(DoseStatus::Missed)
        );

        overrides.insert("Aspirin 75mg".into(), DoseStatus::Taken);
        assert_eq!(
            effective_override(&overrides, &entry),
            Some(DoseStatus::Taken)
        );
    }

    #[test]
    fn test_summarize_counts_each_bucket() {
        let mut state = AppState::default();

        let mut taken = MedicineEntry::new("Aspirin 75mg", scheduled("06:00"));
        taken.status = Some(DoseStatus::Taken);
        state.meds.push(taken);

        state
            .meds
            .push(MedicineEntry::new("Metformin 500mg", scheduled("07:00")));
        state
            .meds
            .push(MedicineEntry::new("Atorvastatin 10mg", scheduled("08:20")));
        state
            .meds
            .push(MedicineEntry::new("Telmisartan 40mg", scheduled("21:00")));

        let summary = summarize(&state, clock(8, 0));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.taken, 1);
        assert_eq!(summary.missed, 1);
        assert_eq!(summary.due, 1);
        assert_eq!(summary.upcoming, 1);
    }
}
