//! Guided setup wizard as a pure state machine.
//!
//! Earlier revisions kept wizard progress in process-wide session state.
//! Here the caller owns an explicit [`SetupState`] and every screen
//! transition is `apply(state, action) -> Result<state>`: invalid actions
//! return an error and the state the caller holds is unchanged.

use crate::catalog::{get_default_catalog, Catalog};
use crate::{AppState, DoseStatus, Error, MedicineEntry, Result, ScheduleTime};

/// The six screens of the guided setup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    Name,
    Location,
    Condition,
    Medicines,
    Schedule,
    Dashboard,
}

impl SetupStep {
    pub fn title(&self) -> &'static str {
        match self {
            SetupStep::Name => "Name",
            SetupStep::Location => "Location",
            SetupStep::Condition => "Condition",
            SetupStep::Medicines => "Medicines",
            SetupStep::Schedule => "Schedule",
            SetupStep::Dashboard => "Dashboard",
        }
    }

    /// 1-based step number for the "Step N of 6" indicator
    pub fn number(&self) -> usize {
        match self {
            SetupStep::Name => 1,
            SetupStep::Location => 2,
            SetupStep::Condition => 3,
            SetupStep::Medicines => 4,
            SetupStep::Schedule => 5,
            SetupStep::Dashboard => 6,
        }
    }

    fn previous(&self) -> SetupStep {
        match self {
            SetupStep::Name | SetupStep::Location => SetupStep::Name,
            SetupStep::Condition => SetupStep::Location,
            SetupStep::Medicines => SetupStep::Condition,
            SetupStep::Schedule => SetupStep::Medicines,
            SetupStep::Dashboard => SetupStep::Schedule,
        }
    }
}

/// Wizard position plus the application state being assembled
#[derive(Clone, Debug)]
pub struct SetupState {
    pub step: SetupStep,
    pub app: AppState,
}

impl Default for SetupState {
    fn default() -> Self {
        Self {
            step: SetupStep::Name,
            app: AppState::default(),
        }
    }
}

/// One user interaction on a wizard screen
#[derive(Clone, Debug)]
pub enum SetupAction {
    SubmitName(String),
    SubmitLocation { country: String, region_index: usize },
    SubmitCondition(String),
    AddMedicine(String),
    RenameMedicine { index: usize, name: String },
    RemoveMedicine(usize),
    SetTime { index: usize, time: ScheduleTime },
    Next,
    Back,
    MarkTaken(String),
    MarkMissed(String),
    Restart,
}

/// Apply an action against the default catalog
pub fn apply(state: SetupState, action: SetupAction) -> Result<SetupState> {
    apply_with_catalog(state, action, get_default_catalog())
}

/// Apply one wizard action, returning the next state
pub fn apply_with_catalog(
    mut state: SetupState,
    action: SetupAction,
    catalog: &Catalog,
) -> Result<SetupState> {
    match action {
        SetupAction::SubmitName(name) => {
            require_step(&state, SetupStep::Name)?;
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Setup("please enter your name".into()));
            }
            state.app.profile.name = name;
            state.step = SetupStep::Location;
        }

        SetupAction::SubmitLocation {
            country,
            region_index,
        } => {
            require_step(&state, SetupStep::Location)?;
            let info = catalog
                .countries
                .get(&country)
                .ok_or_else(|| Error::Setup(format!("unknown country '{}'", country)))?;

            let timezone = catalog.timezone_for(&country, region_index).ok_or_else(|| {
                Error::Setup(format!(
                    "region index {} out of range for {}",
                    region_index, country
                ))
            })?;

            state.app.profile.region = info.regions.get(region_index).cloned();
            state.app.profile.timezone = Some(timezone.to_string());
            state.app.profile.country = Some(country);
            state.step = SetupStep::Condition;
        }

        SetupAction::SubmitCondition(condition) => {
            require_step(&state, SetupStep::Condition)?;
            let country = state
                .app
                .profile
                .country
                .clone()
                .ok_or_else(|| Error::Setup("location has not been chosen yet".into()))?;
            let suggested = catalog
                .medicines_for(&country, &condition)
                .ok_or_else(|| {
                    Error::Setup(format!(
                        "unknown condition '{}' for {}",
                        condition, country
                    ))
                })?;

            // Seed the list with suggestions at the default dose time;
            // the next screens let the user edit names and times.
            state.app.meds = suggested
                .iter()
                .map(|medicine| MedicineEntry::new(medicine.clone(), ScheduleTime::default()))
                .collect();
            state.app.profile.disease = Some(condition);
            state.step = SetupStep::Medicines;
        }

        SetupAction::AddMedicine(name) => {
            require_step(&state, SetupStep::Medicines)?;
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Setup("medicine name cannot be empty".into()));
            }
            state
                .app
                .meds
                .push(MedicineEntry::new(name, ScheduleTime::default()));
        }

        SetupAction::RenameMedicine { index, name } => {
            require_step(&state, SetupStep::Medicines)?;
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Setup("medicine name cannot be empty".into()));
            }
            let entry = entry_at_mut(&mut state.app, index)?;
            entry.medicine = name;
        }

        SetupAction::RemoveMedicine(index) => {
            require_step(&state, SetupStep::Medicines)?;
            entry_at_mut(&mut state.app, index)?;
            state.app.meds.remove(index);
        }

        SetupAction::SetTime { index, time } => {
            require_step(&state, SetupStep::Schedule)?;
            let entry = entry_at_mut(&mut state.app, index)?;
            entry.time = time;
        }

        SetupAction::Next => match state.step {
            SetupStep::Medicines => state.step = SetupStep::Schedule,
            SetupStep::Schedule => state.step = SetupStep::Dashboard,
            other => {
                return Err(Error::Setup(format!(
                    "the {} screen needs its form submitted",
                    other.title()
                )))
            }
        },

        SetupAction::Back => {
            if state.step == SetupStep::Name {
                return Err(Error::Setup("already on the first screen".into()));
            }
            state.step = state.step.previous();
        }

        SetupAction::MarkTaken(name) => {
            require_step(&state, SetupStep::Dashboard)?;
            mark(&mut state.app, &name, DoseStatus::Taken)?;
        }

        SetupAction::MarkMissed(name) => {
            require_step(&state, SetupStep::Dashboard)?;
            mark(&mut state.app, &name, DoseStatus::Missed)?;
        }

        SetupAction::Restart => {
            // "Edit Settings": back to the first screen, data kept
            state.step = SetupStep::Name;
        }
    }

    Ok(state)
}

fn require_step(state: &SetupState, expected: SetupStep) -> Result<()> {
    if state.step != expected {
        return Err(Error::Setup(format!(
            "action belongs to the {} screen, currently on {}",
            expected.title(),
            state.step.title()
        )));
    }
    Ok(())
}

fn entry_at_mut(app: &mut AppState, index: usize) -> Result<&mut MedicineEntry> {
    let len = app.meds.len();
    app.meds
        .get_mut(index)
        .ok_or_else(|| Error::Setup(format!("no medicine at index {} (have {})", index, len)))
}

fn mark(app: &mut AppState, name: &str, status: DoseStatus) -> Result<()> {
    if !app.meds.iter().any(|entry| entry.medicine == name) {
        return Err(Error::Setup(format!("no medicine named '{}'", name)));
    }
    app.overrides.insert(name.to_string(), status);
    Ok(())
}
