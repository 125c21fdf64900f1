#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roulement::{
    audit, default_roster, generate_schedule, io, summary::SummaryRenderer, GenerateOptions,
    HolidayCalendar, ManualEdit, Nurse, NurseId, SavedSchedule, ScheduleEntry, ScheduleStore,
    Shift, TextSummary, WeekendOnly, WorkCondition,
};
use std::collections::HashMap;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planning d'infirmières (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire des plannings sauvegardés
    #[arg(long, global = true, default_value = "schedules")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning d'un mois
    Generate {
        #[arg(long)]
        year: i32,
        /// 1 à 12
        #[arg(long)]
        month: u32,
        /// CSV `id,name,work_condition` (roster par défaut sinon)
        #[arg(long)]
        nurses: Option<String>,
        /// CSV `nurse,date`
        #[arg(long)]
        vacations: Option<String>,
        /// CSV `date[,name]` des jours fériés
        #[arg(long)]
        holidays: Option<String>,
        /// Graine du bruit aléatoire (reproductible)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        /// Sauvegarder sous ce nom dans le dépôt
        #[arg(long)]
        save: Option<String>,
    },

    /// Lister les plannings sauvegardés
    List,

    /// Afficher/exporter un planning sauvegardé
    Show {
        #[arg(long)]
        id: String,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        /// Ignorer les retouches manuelles
        #[arg(long)]
        raw: bool,
    },

    /// Retoucher une case d'un planning sauvegardé
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        nurse: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// DAY, MID-DAY, EVENING, NIGHT ou OFF
        #[arg(long)]
        shift: String,
    },

    /// Supprimer un planning sauvegardé
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Vérifier les invariants d'un planning sauvegardé
    Check {
        #[arg(long)]
        id: String,
        /// CSV `date[,name]` des jours fériés
        #[arg(long)]
        holidays: Option<String>,
    },

    /// Récapitulatif par infirmière d'un planning sauvegardé
    Summary {
        #[arg(long)]
        id: String,
        #[arg(long)]
        holidays: Option<String>,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let store = ScheduleStore::new(&cli.store);

    let code = match cli.cmd {
        Commands::Generate {
            year,
            month,
            nurses,
            vacations,
            holidays,
            seed,
            out_json,
            out_csv,
            save,
        } => {
            let roster = match nurses {
                Some(path) => io::import_nurses_csv(path)?,
                None => default_roster(),
            };
            if roster.is_empty() {
                bail!("aucune infirmière dans le roster");
            }
            let vacations = match vacations {
                Some(path) => io::import_vacations_csv(path)?,
                None => Vec::new(),
            };
            let calendar = load_calendar(holidays.as_deref())?;

            let generated = generate_schedule(
                year,
                month,
                &vacations,
                &roster,
                calendar.as_ref(),
                GenerateOptions { seed },
            )?;
            for warning in &generated.warnings {
                eprintln!("Warning: {warning}");
            }

            if let Some(path) = out_json {
                io::export_schedule_json(path, &generated.entries)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &generated.entries, &roster)?;
            }
            if let Some(name) = save {
                let saved =
                    SavedSchedule::new(name, year, month, generated.entries.clone(), vacations, &roster);
                store.save(&saved)?;
                println!("Saved schedule {} ({})", saved.id, saved.name);
            }

            print_grid(&generated.entries, &roster);
            0
        }
        Commands::List => {
            for info in store.list()? {
                println!(
                    "{} | {}-{:02} | {} | {}",
                    info.id,
                    info.year,
                    info.month,
                    info.name,
                    info.created_at.to_rfc3339()
                );
            }
            0
        }
        Commands::Show {
            id,
            out_json,
            out_csv,
            raw,
        } => {
            let saved = store.load(&id)?;
            let entries = if raw {
                saved.entries.clone()
            } else {
                saved.display_entries()
            };
            let roster = roster_of(&saved);
            if let Some(path) = out_json {
                io::export_schedule_json(path, &entries)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &entries, &roster)?;
            }
            print_grid(&entries, &roster);
            0
        }
        Commands::Edit {
            id,
            nurse,
            date,
            shift,
        } => {
            let mut saved = store.load(&id)?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")?;
            let shift: Shift = shift.parse().map_err(anyhow::Error::msg)?;
            saved.upsert_edit(ManualEdit {
                nurse: NurseId::new(nurse),
                date,
                shift,
            });
            store.save(&saved)?;
            0
        }
        Commands::Delete { id } => {
            store.delete(&id)?;
            0
        }
        Commands::Check { id, holidays } => {
            let saved = store.load(&id)?;
            let roster = roster_of(&saved);
            let calendar = load_calendar(holidays.as_deref())?;
            let violations = audit(
                &saved.entries,
                saved.year,
                saved.month,
                &roster,
                &saved.vacations,
                calendar.as_ref(),
            );
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for violation in &violations {
                    eprintln!("  {violation}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Summary { id, holidays, out } => {
            let saved = store.load(&id)?;
            let roster = roster_of(&saved);
            let calendar = load_calendar(holidays.as_deref())?;
            let totals =
                roulement::summarize(&saved.display_entries(), &roster, calendar.as_ref());
            let text = TextSummary.render(&totals);
            match out {
                Some(path) => std::fs::write(path, &text)?,
                None => print!("{text}"),
            }
            0
        }
    };

    std::process::exit(code);
}

fn load_calendar(path: Option<&str>) -> Result<Box<dyn HolidayCalendar>> {
    match path {
        Some(path) => Ok(Box::new(io::import_holidays_csv(path)?)),
        None => Ok(Box::new(WeekendOnly)),
    }
}

/// Roster d'affichage : instantané du blob, sinon reconstruit des libellés.
fn roster_of(saved: &SavedSchedule) -> Vec<Nurse> {
    if let Some(nurses) = &saved.nurses {
        return nurses.clone();
    }
    if !saved.labels.is_empty() {
        return saved
            .labels
            .iter()
            .map(|(id, name)| Nurse::new(id, name.clone(), WorkCondition::Flexible))
            .collect();
    }
    default_roster()
}

/// Impression compacte : une ligne par date.
fn print_grid(entries: &[ScheduleEntry], roster: &[Nurse]) {
    let mut by_cell: HashMap<(&NurseId, NaiveDate), Shift> = HashMap::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    for entry in entries {
        by_cell.insert((&entry.nurse, entry.date), entry.shift);
        dates.push(entry.date);
    }
    dates.sort_unstable();
    dates.dedup();

    for date in dates {
        let cells: Vec<String> = roster
            .iter()
            .map(|n| {
                let shift = by_cell
                    .get(&(&n.id, date))
                    .map(|s| s.as_str())
                    .unwrap_or("-");
                format!("{}={}", n.id, shift)
            })
            .collect();
        println!("{} | {}", date, cells.join(" "));
    }
}
