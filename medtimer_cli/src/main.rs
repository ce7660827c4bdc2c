use clap::{Parser, Subcommand};
use medtimer_core::*;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medtimer")]
#[command(about = "Personal medicine reminder tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's schedule with derived statuses (default)
    List,

    /// Quick-add a medicine
    Add {
        /// Medicine name
        medicine: String,

        /// Scheduled dose time (HH:MM, 24h); defaults to the configured time
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        disease: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        timezone: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a medicine as taken
    Take { medicine: String },

    /// Mark a medicine as missed
    Miss { medicine: String },

    /// Clear a medicine's override so its status is recomputed
    Reset { medicine: String },

    /// Remove the first medicine matching the given name
    Remove { medicine: String },

    /// Remove all medicines
    Clear,

    /// List catalog conditions for a country, or suggested medicines for a condition
    Suggest {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        disease: Option<String>,
    },

    /// Run the guided setup wizard
    Setup,

    /// Export the full state as one JSON document
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the full state from a backup document
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    medtimer_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let errors = get_default_catalog().validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Some(Commands::Add {
            medicine,
            time,
            disease,
            country,
            state,
            timezone,
            notes,
        }) => cmd_add(
            &data_dir, &config, medicine, time, disease, country, state, timezone, notes,
        ),
        Some(Commands::Take { medicine }) => cmd_mark(&data_dir, &medicine, Some(DoseStatus::Taken)),
        Some(Commands::Miss { medicine }) => cmd_mark(&data_dir, &medicine, Some(DoseStatus::Missed)),
        Some(Commands::Reset { medicine }) => cmd_mark(&data_dir, &medicine, None),
        Some(Commands::Remove { medicine }) => cmd_remove(&data_dir, &medicine),
        Some(Commands::Clear) => cmd_clear(&data_dir),
        Some(Commands::Suggest { country, disease }) => cmd_suggest(&config, country, disease),
        Some(Commands::Setup) => cmd_setup(&data_dir),
        Some(Commands::Export { out }) => cmd_export(&data_dir, out),
        Some(Commands::Import { path }) => cmd_import(&data_dir, &path),
        Some(Commands::List) | None => cmd_list(&data_dir),
    }
}

fn profile_path(data_dir: &Path) -> PathBuf {
    data_dir.join(store::PROFILE_FILE)
}

fn load_state(data_dir: &Path) -> Result<AppState> {
    let meds = RecordStore::in_dir(data_dir).load()?;
    let profile = Profile::load(&profile_path(data_dir))?;
    tracing::debug!("Loaded {} records from {:?}", meds.len(), data_dir);
    Ok(AppState {
        profile,
        meds,
        overrides: HashMap::new(),
    })
}

fn save_state(data_dir: &Path, state: &AppState) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    RecordStore::in_dir(data_dir).save(&state.meds)?;
    state.profile.save(&profile_path(data_dir))?;
    Ok(())
}

fn cmd_list(data_dir: &Path) -> Result<()> {
    let state = load_state(data_dir)?;
    let now = chrono::Local::now().time();

    if state.meds.is_empty() {
        println!("No medicines added yet. Add your first with 'medtimer add'.");
        return Ok(());
    }

    if state.profile.name.is_empty() {
        println!("Today's schedule");
    } else {
        println!("Today's schedule for {}", state.profile.name);
    }
    println!("─────────────────────────────────────────");

    // Stable sort keeps duplicate names in record order
    let mut entries: Vec<&MedicineEntry> = state.meds.iter().collect();
    entries.sort_by_key(|entry| entry.time);

    for entry in entries {
        let status = entry_status(&state, entry, now);
        print!("  {}  {:<24} [{}]", entry.time, entry.medicine, status.label());
        if let Some(ref notes) = entry.notes {
            print!("  {}", notes);
        }
        println!();
    }

    let summary = summarize(&state, now);
    println!("─────────────────────────────────────────");
    println!(
        "  Total: {}  taken: {}  missed: {}  due: {}  upcoming: {}",
        summary.total, summary.taken, summary.missed, summary.due, summary.upcoming
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_add(
    data_dir: &Path,
    config: &Config,
    medicine: String,
    time: Option<String>,
    disease: Option<String>,
    country: Option<String>,
    state_name: Option<String>,
    timezone: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let time = match time {
        Some(raw) => raw.parse::<ScheduleTime>()?,
        None => config.defaults.dose_time,
    };

    if let Some(ref name) = country {
        if !get_default_catalog().countries.contains_key(name) {
            eprintln!("Unknown country: {}. Storing as given.", name);
        }
    }

    let mut state = load_state(data_dir)?;
    let mut entry = MedicineEntry::new(medicine.clone(), time);
    entry.disease = disease;
    entry.country = country;
    entry.state = state_name;
    entry.timezone = timezone;
    entry.notes = notes;
    state.meds.push(entry);

    save_state(data_dir, &state)?;
    println!("✓ {} added (scheduled {})", medicine, time);
    Ok(())
}

/// Set or clear the persisted override on the first entry matching `name`
fn cmd_mark(data_dir: &Path, name: &str, status: Option<DoseStatus>) -> Result<()> {
    let mut state = load_state(data_dir)?;
    let entry = state
        .meds
        .iter_mut()
        .find(|entry| entry.medicine == name)
        .ok_or_else(|| Error::Other(format!("no medicine named '{}'", name)))?;

    entry.status = status;
    save_state(data_dir, &state)?;

    match status {
        Some(s) => println!("✓ {} marked {}", name, s),
        None => println!("✓ {} status reset", name),
    }
    Ok(())
}

fn cmd_remove(data_dir: &Path, name: &str) -> Result<()> {
    let mut state = load_state(data_dir)?;
    let index = state
        .meds
        .iter()
        .position(|entry| entry.medicine == name)
        .ok_or_else(|| Error::Other(format!("no medicine named '{}'", name)))?;

    state.meds.remove(index);
    save_state(data_dir, &state)?;
    println!("✓ {} removed", name);
    Ok(())
}

fn cmd_clear(data_dir: &Path) -> Result<()> {
    let mut state = load_state(data_dir)?;
    let count = state.meds.len();
    state.meds.clear();
    save_state(data_dir, &state)?;
    println!("✓ All medicines cleared ({} removed)", count);
    Ok(())
}

fn cmd_suggest(config: &Config, country: Option<String>, disease: Option<String>) -> Result<()> {
    let catalog = get_default_catalog();
    let country = country.unwrap_or_else(|| config.defaults.country.clone());

    match disease {
        Some(condition) => {
            let medicines = catalog
                .medicines_for(&country, &condition)
                .ok_or_else(|| {
                    Error::Other(format!(
                        "no suggestions for '{}' in {}",
                        condition, country
                    ))
                })?;
            println!("Suggested medicines for {} ({}):", condition, country);
            for medicine in medicines {
                println!("  - {}", medicine);
            }
        }
        None => {
            let conditions = catalog
                .conditions_for(&country)
                .ok_or_else(|| Error::Other(format!("unknown country '{}'", country)))?;
            println!("Conditions with suggestions in {}:", country);
            for condition in conditions {
                println!("  - {}", condition);
            }
        }
    }
    Ok(())
}

fn cmd_export(data_dir: &Path, out: Option<PathBuf>) -> Result<()> {
    let state = load_state(data_dir)?;
    let document = export_state(&state)?;

    match out {
        Some(path) => {
            std::fs::write(&path, &document)?;
            println!("✓ Exported {} medicines to {}", state.meds.len(), path.display());
        }
        None => println!("{}", document),
    }
    Ok(())
}

fn cmd_import(data_dir: &Path, path: &Path) -> Result<()> {
    let document = std::fs::read_to_string(path)?;

    // Existing files are only replaced once the document validates
    let mut state = import_state(&document)?;
    state.flatten_overrides();
    save_state(data_dir, &state)?;

    println!("✓ Data restored: {} medicines", state.meds.len());
    Ok(())
}

fn cmd_setup(data_dir: &Path) -> Result<()> {
    let catalog = get_default_catalog();
    let mut state = SetupState::default();

    println!("Welcome to MedTimer guided setup.");

    loop {
        if state.step == SetupStep::Dashboard {
            break;
        }
        println!("\nStep {} of 6: {}", state.step.number(), state.step.title());

        let next = match state.step {
            SetupStep::Name => {
                let name = prompt("Your name")?;
                wizard::apply(state.clone(), SetupAction::SubmitName(name))
            }

            SetupStep::Location => {
                let names = catalog.country_names();
                let country = choose("Country", &names)?.to_string();
                let region_index = match catalog.countries.get(&country) {
                    Some(info) if info.timezones.len() > 1 => {
                        let regions: Vec<&str> =
                            info.regions.iter().map(String::as_str).collect();
                        let region = choose("Region", &regions)?;
                        info.regions
                            .iter()
                            .position(|r| r == region)
                            .unwrap_or_default()
                    }
                    _ => 0,
                };
                wizard::apply(
                    state.clone(),
                    SetupAction::SubmitLocation {
                        country,
                        region_index,
                    },
                )
            }

            SetupStep::Condition => {
                let country = state.app.profile.country.clone().unwrap_or_default();
                let conditions = catalog
                    .conditions_for(&country)
                    .ok_or_else(|| Error::Other(format!("unknown country '{}'", country)))?;
                let condition = choose("Condition", &conditions)?.to_string();
                wizard::apply(state.clone(), SetupAction::SubmitCondition(condition))
            }

            SetupStep::Medicines => {
                println!("Current medicines:");
                for (i, entry) in state.app.meds.iter().enumerate() {
                    println!("  {}. {}", i + 1, entry.medicine);
                }
                let input = prompt("Add another medicine (blank to continue)")?;
                if input.is_empty() {
                    wizard::apply(state.clone(), SetupAction::Next)
                } else {
                    wizard::apply(state.clone(), SetupAction::AddMedicine(input))
                }
            }

            SetupStep::Schedule => {
                let mut working = state.clone();
                for index in 0..working.app.meds.len() {
                    let label = format!(
                        "Time for {} [{}]",
                        working.app.meds[index].medicine, working.app.meds[index].time
                    );
                    let input = prompt(&label)?;
                    if input.is_empty() {
                        continue;
                    }
                    match input.parse::<ScheduleTime>() {
                        Ok(time) => {
                            working =
                                wizard::apply(working, SetupAction::SetTime { index, time })?;
                        }
                        Err(e) => eprintln!("{}; keeping the current time", e),
                    }
                }
                wizard::apply(working, SetupAction::Next)
            }

            SetupStep::Dashboard => break,
        };

        match next {
            Ok(new_state) => state = new_state,
            Err(e) => eprintln!("{}", e),
        }
    }

    let mut app = state.app;
    app.flatten_overrides();
    save_state(data_dir, &app)?;

    println!(
        "\n✓ Setup complete! {} medicines saved for {}.",
        app.meds.len(),
        app.profile.name
    );
    println!("  Run 'medtimer list' to see today's schedule.");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Err(Error::Other("input closed".into()));
    }
    Ok(input.trim().to_string())
}

/// Pick from a numbered list, accepting either the number or the exact name
fn choose<'a>(label: &str, options: &'a [&str]) -> Result<&'a str> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    loop {
        let input = prompt(label)?;
        if let Ok(n) = input.parse::<usize>() {
            if n >= 1 && n <= options.len() {
                return Ok(options[n - 1]);
            }
        }
        if let Some(found) = options.iter().find(|option| **option == input) {
            return Ok(found);
        }
        eprintln!(
            "Pick a number between 1 and {} or an exact name.",
            options.len()
        );
    }
}
