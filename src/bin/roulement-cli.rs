#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use roulement::{
    alerts::{scan_alerts, AlertOptions},
    calendar,
    engine::{ConstraintContext, Engine, Severity},
    io,
    model::{Holiday, ShiftCategory, ShiftCode, StaffMember, TimeRange, Workbook},
    patterns,
    report::{self, AlertRenderer, TextReport},
    stats,
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de contrôle d'un planning mensuel (candidats, échanges, alertes)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du classeur
    #[arg(long, global = true, default_value = "workbook.json")]
    workbook: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer le personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Remplacer une case du planning
    Set {
        /// AAAA-MM-JJ
        #[arg(long)]
        date: NaiveDate,
        /// identifiant ou nom
        #[arg(long)]
        staff: String,
        /// A, B, C, D, E, J, off, transfer, paid ou unset
        #[arg(long)]
        code: ShiftCode,
    },

    /// Déclarer un jour férié
    Holiday {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Plage horaire d'un temps partiel pour une date
    TimeRange {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        staff: String,
        /// HH:MM
        #[arg(long, value_parser = parse_hm, required_unless_present = "clear")]
        start: Option<NaiveTime>,
        /// HH:MM
        #[arg(long, value_parser = parse_hm, required_unless_present = "clear")]
        end: Option<NaiveTime>,
        /// Efface la plage enregistrée
        #[arg(long, conflicts_with_all = ["start", "end"])]
        clear: bool,
    },

    /// Lister les candidats pour une case
    Candidates {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        code: ShiftCode,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Simuler l'échange des postes de deux personnes
    Swap {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        staff: String,
        #[arg(long)]
        with: String,
    },

    /// Lister les partenaires d'échange possibles
    SwapCandidates {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        staff: String,
    },

    /// Balayer le mois à la recherche d'alertes
    Alerts {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long, default_value_t = 5)]
        min_headcount: u32,
        #[arg(long, default_value_t = 6)]
        streak: u32,
        #[arg(long, default_value_t = 3)]
        early_streak: u32,
        #[arg(long, default_value_t = 3)]
        late_streak: u32,
        /// Export CSV des alertes (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Équité de répartition des postes A et J
    Balance {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long, default_value_t = stats::DEFAULT_FAIRNESS_THRESHOLD)]
        threshold: f64,
    },

    /// Présents par heure pour une date
    Coverage {
        #[arg(long)]
        date: NaiveDate,
    },

    /// Exporter ou charger les définitions de postes
    Patterns {
        #[arg(long)]
        out: Option<String>,
        #[arg(long)]
        load: Option<String>,
    },
}

fn parse_hm(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}

fn resolve<'a>(workbook: &'a Workbook, key: &str) -> Result<&'a StaffMember> {
    workbook
        .resolve_staff(key)
        .with_context(|| format!("unknown staff: {key}"))
}

fn context_for(workbook: &Workbook, date: NaiveDate) -> Result<ConstraintContext<'_>> {
    Ok(ConstraintContext::new(
        &workbook.schedule,
        &workbook.staff,
        &workbook.holidays,
        &workbook.settings,
        date.year(),
        date.month(),
    )?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.workbook)?;
    let mut workbook = storage.load_or_default()?;
    let engine = Engine::new();

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            for member in staff {
                if workbook.find_staff(member.id).is_some() {
                    bail!("duplicate staff id: {}", member.id);
                }
                workbook.staff.push(member);
            }
            storage.save(&workbook)?;
            0
        }
        Commands::Set { date, staff, code } => {
            let id = resolve(&workbook, &staff)?.id;
            workbook.schedule.set(date, id, code);
            // plus d'horaires un jour de congé
            if code.is_leave() {
                workbook.clear_time_range(date, id);
            }
            storage.save(&workbook)?;
            0
        }
        Commands::TimeRange {
            date,
            staff,
            start,
            end,
            clear,
        } => {
            let member = resolve(&workbook, &staff)?;
            if member.category != ShiftCategory::PartTime {
                bail!("time ranges only apply to part-time staff: {}", member.name);
            }
            let id = member.id;
            if clear {
                if !workbook.clear_time_range(date, id) {
                    println!("no time range recorded for {staff} on {date}");
                }
            } else {
                let (Some(start), Some(end)) = (start, end) else {
                    bail!("--start and --end are required");
                };
                let range = TimeRange::new(start, end).map_err(anyhow::Error::msg)?;
                workbook.set_time_range(date, id, range);
            }
            storage.save(&workbook)?;
            0
        }
        Commands::Holiday { date, name } => {
            workbook.add_holiday(Holiday::new(date, name));
            storage.save(&workbook)?;
            0
        }
        Commands::Candidates {
            date,
            code,
            out_json,
        } => {
            let ctx = context_for(&workbook, date)?;
            let candidates = engine.evaluate_candidates(&ctx, date.day(), code);
            if let Some(path) = out_json {
                io::export_json(path, &candidates)?;
            }
            print!("{}", report::render_candidates(date, code, &candidates));
            0
        }
        Commands::Swap { date, staff, with } => {
            let source = resolve(&workbook, &staff)?.id;
            let target = resolve(&workbook, &with)?.id;
            let ctx = context_for(&workbook, date)?;
            let violations = engine.evaluate_swap(&ctx, source, target, date.day())?;
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                for v in &violations {
                    println!("[{:?}] {}", v.severity, v.description);
                }
                // code 2 : au moins une violation de gravité erreur
                if violations.iter().any(|v| v.severity == Severity::Error) {
                    2
                } else {
                    0
                }
            }
        }
        Commands::SwapCandidates { date, staff } => {
            let source = resolve(&workbook, &staff)?.id;
            let ctx = context_for(&workbook, date)?;
            let candidates = engine.swap_candidates(&ctx, source, date.day())?;
            print!("{}", report::render_swap_candidates(date, &candidates));
            0
        }
        Commands::Alerts {
            year,
            month,
            min_headcount,
            streak,
            early_streak,
            late_streak,
            report,
        } => {
            if calendar::month_start(year, month).is_none() {
                bail!("invalid month: {year}-{month}");
            }
            let opts = AlertOptions {
                min_headcount,
                work_streak: streak,
                early_streak,
                late_streak,
            };
            let days = calendar::month_days(year, month);
            let alerts = scan_alerts(
                &workbook.staff,
                &workbook.schedule,
                &days,
                year,
                month,
                &workbook.holidays,
                &opts,
            );
            if let Some(path) = report {
                io::export_alerts_csv(path, &alerts)?;
            }
            print!("{}", TextReport.render(&alerts));
            if alerts.iter().any(|a| a.severity == Severity::Error) {
                2
            } else {
                0
            }
        }
        Commands::Balance {
            year,
            month,
            threshold,
        } => {
            let days = calendar::month_days(year, month);
            for code in [ShiftCode::A, ShiftCode::J] {
                let score = stats::fairness(
                    &workbook.staff,
                    &workbook.schedule,
                    year,
                    month,
                    &days,
                    code,
                    threshold,
                );
                print!("{}", report::render_fairness(&score));
            }
            0
        }
        Commands::Coverage { date } => {
            let hours = stats::hourly_coverage(
                &workbook.staff,
                &workbook.schedule,
                &workbook.time_ranges,
                &workbook.patterns,
                date,
            );
            print!("{}", report::render_coverage(date, &hours));
            0
        }
        Commands::Patterns { out, load } => {
            if let Some(path) = load {
                workbook.patterns = patterns::load_patterns_from_file(path)?;
                storage.save(&workbook)?;
            }
            if let Some(path) = out {
                patterns::export_patterns_json(path, &workbook.patterns)?;
            }
            for p in workbook.patterns.iter() {
                println!(
                    "{} {} {}-{} pause {} min, effectif min {}",
                    p.code,
                    p.name,
                    p.start.format("%H:%M"),
                    p.end.format("%H:%M"),
                    p.break_minutes,
                    p.min_headcount
                );
            }
            0
        }
    };

    std::process::exit(code);
}
