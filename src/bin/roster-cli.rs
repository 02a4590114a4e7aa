#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use duty_roster::{
    model::{Holiday, Staff},
    period_summary,
    reminder::{
        run_watch_loop, JsonLinesSink, LogSink, ReminderEvent, ReminderSink, ReminderWatcher,
    },
    scheduler::{ConflictKind, RandomSource, RngSource, Scheduler, SchedulingConfig},
    storage::{JsonStorage, Storage},
};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use tokio::sync::watch;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning de garde (fichier JSON, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un membre du personnel
    AddStaff {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
        /// Nombre de gardes visé sur la période
        #[arg(long, default_value_t = 0)]
        target: u32,
    },

    /// Déclarer un jour férié (affichage uniquement)
    AddHoliday {
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        name: String,
    },

    /// Poser une personne sur un créneau (remplace l'occupant)
    Assign {
        #[arg(long)]
        date: NaiveDate,
        /// Numéro de poste, à partir de 1
        #[arg(long)]
        slot: u32,
        /// Identifiant ou nom exact
        #[arg(long)]
        staff: String,
    },

    /// Libérer un créneau
    Clear {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        slot: u32,
    },

    /// Remplir automatiquement les créneaux vides
    AutoFill {
        #[command(flatten)]
        period: PeriodArgs,
        /// Modifie et enregistre le nombre de postes par jour
        #[arg(long)]
        shifts_per_day: Option<u32>,
        /// Force l'autorisation (ou l'interdiction) de doubles affectations
        #[arg(long)]
        allow_double_booking: Option<bool>,
        /// Graine pour un résultat reproductible
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Lister les affectations
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Vérifier les conflits
    Check,

    /// Statistiques par personne sur une période
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Surveiller les gardes à venir et émettre les rappels
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
        /// Journal JSON lines des rappels envoyés
        #[arg(long)]
        notify_log: Option<String>,
        /// Un seul passage puis sortie
        #[arg(long)]
        once: bool,
    },
}

#[derive(clap::Args, Debug)]
struct PeriodArgs {
    /// Mois YYYY-MM (par défaut : mois courant)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    month: Option<String>,
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            return Ok((from, to));
        }
        let (year, month) = match &self.month {
            Some(raw) => parse_month(raw)?,
            None => {
                let today = Local::now().date_naive();
                (today.year(), today.month())
            }
        };
        let config = SchedulingConfig::month(year, month, 1)?;
        Ok((config.period_start, config.period_end))
    }
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (y, m) = raw
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got {raw}"))?;
    let year = y.trim().parse().with_context(|| format!("invalid year in {raw}"))?;
    let month = m.trim().parse().with_context(|| format!("invalid month in {raw}"))?;
    Ok((year, month))
}

/// Affiche chaque rappel, le trace et l'ajoute au journal si demandé.
struct CliSink {
    trace: LogSink,
    log: Option<JsonLinesSink>,
}

impl ReminderSink for CliSink {
    fn deliver(&mut self, event: &ReminderEvent) -> Result<()> {
        println!(
            "[{}] {} → {}: {}",
            event.milestone,
            event.shift_date,
            event.recipient_name,
            event.message
        );
        self.trace.deliver(event)?;
        if let Some(log) = self.log.as_mut() {
            log.deliver(event)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;

    let code = match cli.cmd {
        Commands::AddStaff {
            name,
            department,
            target,
        } => {
            let _lock = storage.lock()?;
            let mut roster = storage.load_or_default()?;
            let staff = Staff::new(name, department).with_target(target);
            println!("{}", staff.id.as_str());
            roster.staff.push(staff);
            storage.save(&roster)?;
            0
        }
        Commands::AddHoliday { date, name } => {
            let _lock = storage.lock()?;
            let mut roster = storage.load_or_default()?;
            roster.holidays.push(Holiday::new(date, name));
            roster.holidays.sort_by_key(|h| h.date);
            storage.save(&roster)?;
            0
        }
        Commands::Assign { date, slot, staff } => {
            let _lock = storage.lock()?;
            let mut scheduler = Scheduler::from_roster(storage.load_or_default()?);
            let staff_id = scheduler
                .roster()
                .resolve_staff(&staff)
                .map(|s| s.id.clone())
                .ok_or_else(|| anyhow!("unknown staff: {}", staff))?;
            let slot_index = slot.checked_sub(1).context("slot numbers start at 1")?;
            let id = scheduler.assign_slot(date, slot_index, &staff_id)?;
            storage.save(scheduler.roster())?;
            println!("{}", id.as_str());
            0
        }
        Commands::Clear { date, slot } => {
            let _lock = storage.lock()?;
            let mut scheduler = Scheduler::from_roster(storage.load_or_default()?);
            let slot_index = slot.checked_sub(1).context("slot numbers start at 1")?;
            match scheduler.clear_slot(date, slot_index) {
                Some(_) => {
                    storage.save(scheduler.roster())?;
                    0
                }
                None => {
                    eprintln!("slot {date} #{slot} already empty");
                    0
                }
            }
        }
        Commands::AutoFill {
            period,
            shifts_per_day,
            allow_double_booking,
            seed,
        } => {
            let _lock = storage.lock()?;
            let mut scheduler = Scheduler::from_roster(storage.load_or_default()?);
            if let Some(n) = shifts_per_day {
                scheduler.roster_mut().settings.shifts_per_day = n;
            }
            let (start, end) = period.resolve()?;
            let mut config =
                SchedulingConfig::new(scheduler.roster().settings.shifts_per_day, start, end);
            if let Some(allow) = allow_double_booking {
                config = config.with_double_booking(allow);
            }
            let mut rng: Box<dyn RandomSource> = match seed {
                Some(seed) => Box::new(RngSource::new(StdRng::seed_from_u64(seed))),
                None => Box::new(RngSource::thread()),
            };

            let outcome = scheduler.auto_fill(&config, rng.as_mut())?;
            storage.save(scheduler.roster())?;

            if outcome.filled_count == 0 {
                println!("nothing to fill between {start} and {end}");
            } else {
                println!("filled {} slot(s)", outcome.filled_count);
            }
            if outcome.is_complete() {
                0
            } else {
                eprintln!("{} slot(s) left empty", outcome.unfilled.len());
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::List { period } => {
            let roster = storage.load_or_default()?;
            let (start, end) = period.resolve()?;
            for a in roster
                .assignments
                .iter()
                .filter(|a| start <= a.date && a.date <= end)
            {
                let name = roster
                    .find_staff_by_id(&a.staff_id)
                    .map(|s| s.name.as_str())
                    .unwrap_or("?");
                let holiday = roster
                    .holiday_on(a.date)
                    .map(|h| format!(" ({})", h.name))
                    .unwrap_or_default();
                println!("{}{} | #{} | {}", a.date, holiday, a.slot_index + 1, name);
            }
            0
        }
        Commands::Check => {
            let roster = storage.load_or_default()?;
            let shifts_per_day = roster.settings.shifts_per_day;
            let scheduler = Scheduler::from_roster(roster);
            let conflicts = scheduler.detect_conflicts(shifts_per_day);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                for c in &conflicts {
                    let kind = match c.kind {
                        ConflictKind::SlotCollision => "slot",
                        ConflictKind::DoubleBooking => "double",
                        ConflictKind::SlotOutOfRange => "range",
                        ConflictKind::UnknownStaff => "staff",
                    };
                    let second = c.second.as_ref().map(|id| id.as_str()).unwrap_or("-");
                    println!("{} | {} | {} | {}", c.date, kind, c.first.as_str(), second);
                }
                2
            }
        }
        Commands::Summary { period, json } => {
            let roster = storage.load_or_default()?;
            let (start, end) = period.resolve()?;
            let summary = period_summary(&roster, start, end, roster.settings.shifts_per_day)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} → {} : {} affectation(s), {} poste(s) vide(s)",
                    summary.start, summary.end, summary.total_assignments, summary.unfilled_slots
                );
                for load in &summary.staff {
                    println!(
                        "{} | {} | {}/{} | fériés: {}",
                        load.name, load.department, load.assigned, load.target, load.holiday_shifts
                    );
                }
            }
            0
        }
        Commands::Watch {
            interval_secs,
            notify_log,
            once,
        } => {
            if interval_secs == 0 {
                bail!("interval must be at least one second");
            }
            let roster = storage.load_or_default()?;
            let watcher = ReminderWatcher::new(roster.settings.reminders.clone());
            let mut sink = CliSink {
                trace: LogSink,
                log: notify_log.map(JsonLinesSink::new),
            };

            if once {
                let mut watcher = watcher;
                let now = Local::now();
                for event in watcher.tick(&roster.staff, &roster.assignments, &now) {
                    sink.deliver(&event)?;
                }
            } else {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(async move {
                    let (tx, rx) = watch::channel(false);
                    tokio::spawn(async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            let _ = tx.send(true);
                        }
                    });
                    run_watch_loop(
                        watcher,
                        storage,
                        sink,
                        Local::now,
                        Duration::from_secs(interval_secs),
                        rx,
                    )
                    .await
                })?;
            }
            0
        }
    };

    std::process::exit(code);
}
