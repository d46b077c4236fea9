use anyhow::{bail, Context, Result};
use cadence_core::plan::sessions_on;
use cadence_core::time::{format_clock, format_hours};
use cadence_core::{
    find_first_date_with_slot, find_next_available_slot, materialize_all, plan_for_task,
    resolve_window, validate_task, FixedCommitment, Materialization, PlannedSession, Slot,
    StudyPlan, Task, UserSettings,
};
use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

mod config;
mod logging;
mod snapshot;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "cadence",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CADENCE_BUILD_SHA"), ")"),
    about = "Study session slot finder and planner"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Earliest free slot of a given length on one date
    Slot {
        #[arg(long)]
        input: PathBuf,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        hours: f64,
    },

    /// Urgency tier and estimated sessions per task
    Distribute {
        #[arg(long)]
        input: PathBuf,
        /// Only the task with this title
        #[arg(long)]
        task: Option<String>,
    },

    /// Validate every task; exits non-zero when any task has errors
    Check {
        #[arg(long)]
        input: PathBuf,
    },

    /// Propose dated sessions for every task
    Plan {
        #[arg(long)]
        input: PathBuf,
        /// Print proposals as JSON
        #[arg(long)]
        json: bool,
    },

    /// First date from today with room for a session
    NextSlot {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        hours: f64,
        /// Days to search (default: planning horizon)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Manage ~/.cadence/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config and today's date in its timezone
    Show,
}

/// Everything one command needs, loaded from config plus snapshot.
struct Workspace {
    today: NaiveDate,
    settings: UserSettings,
    tasks: Vec<Task>,
    commitments: Vec<FixedCommitment>,
    plans: Vec<StudyPlan>,
}

impl Workspace {
    fn load(input: &Path) -> Result<Self> {
        let cfg = config::load_config()?;
        let today = cfg.today()?;
        let snap = snapshot::load_snapshot(input)?;

        let settings = match &snap.settings {
            Some(s) => {
                s.validate()
                    .with_context(|| format!("settings in {}", input.display()))?;
                s.clone()
            }
            None => cfg.settings()?,
        };
        debug!(%today, tasks = snap.tasks.len(), plans = snap.plans.len(), "loaded snapshot");

        Ok(Self {
            today,
            settings,
            tasks: snap.tasks(today),
            commitments: snap.commitments,
            plans: snap.plans,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Slot { input, date, hours } => slot(&input, date, hours)?,
        Command::Distribute { input, task } => distribute(&input, task.as_deref())?,
        Command::Check { input } => check(&input)?,
        Command::Plan { input, json } => plan(&input, json)?,
        Command::NextSlot { input, hours, days } => next_slot(&input, hours, days)?,
        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let path = config::config_path()?;
                match config::init_config_at(&path)? {
                    config::InitOutcome::Created => println!("Wrote {}", path.display()),
                    config::InitOutcome::AlreadyExists => {
                        println!("{} exists, leaving it alone", path.display())
                    }
                }
            }
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                println!("\n# today in {}: {}", cfg.timezone, cfg.today()?);
                cfg.settings()?;
            }
        },
    }

    Ok(())
}

fn render_slot(slot: &Slot) -> String {
    format!(
        "{}-{} ({})",
        format_clock(slot.start),
        format_clock(slot.end),
        format_hours(slot.hours())
    )
}

fn slot(input: &Path, date: NaiveDate, hours: f64) -> Result<()> {
    if !(hours > 0.0) {
        bail!("--hours must be positive, got {hours}");
    }
    let ws = Workspace::load(input)?;
    let window = resolve_window(date, &ws.settings)?;
    let occupied: Vec<PlannedSession> = sessions_on(&ws.plans, date).cloned().collect();

    match find_next_available_slot(
        hours,
        &occupied,
        &ws.commitments,
        window.start_hour,
        window.end_hour,
        ws.settings.buffer_hours(),
        date,
        &ws.settings,
    ) {
        Some(s) => println!("{date}: {}", render_slot(&s)),
        None => println!(
            "{date}: no free slot of {} between {} and {}",
            format_hours(hours),
            format_clock(window.start_hour),
            format_clock(window.end_hour)
        ),
    }
    Ok(())
}

fn distribute(input: &Path, title: Option<&str>) -> Result<()> {
    let ws = Workspace::load(input)?;
    let tasks: Vec<&Task> = ws
        .tasks
        .iter()
        .filter(|t| title.is_none_or(|want| t.title == want))
        .collect();
    if tasks.is_empty() {
        bail!("no matching task in {}", input.display());
    }

    for t in tasks {
        let d = plan_for_task(t).with_context(|| format!("task '{}'", t.title))?;
        println!("{} [{}]", t.title, t.id);
        println!("  total:    {}", format_hours(t.effective_total_hours()));
        match d.days_until_deadline {
            Some(days) => println!("  deadline: {days} day(s), {}", d.tier),
            None => println!("  deadline: none"),
        }
        println!("  cadence:  {}", d.cadence.label());
        println!("  sessions: {}", d.estimated_sessions);
        println!("  {}", d.description);
    }
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let ws = Workspace::load(input)?;
    let mut failed = 0;

    for t in &ws.tasks {
        let report = validate_task(t, ws.today, &ws.settings, &ws.plans, &ws.commitments)
            .with_context(|| format!("task '{}'", t.title))?;
        let status = if report.is_valid() { "ok" } else { "FAILED" };
        println!("{} [{}]: {status}", t.title, t.id);
        for e in &report.errors {
            println!("  error:   {e}");
        }
        for w in &report.warnings {
            println!("  warning: {w}");
        }
        if !report.is_valid() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} task(s) failed validation");
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    task_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    materialization: Option<&'a Materialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn plan(input: &Path, json: bool) -> Result<()> {
    let ws = Workspace::load(input)?;
    let outcomes = materialize_all(&ws.tasks, &ws.plans, &ws.commitments, &ws.settings)?;

    if json {
        let out: Vec<PlanOutput> = outcomes
            .iter()
            .map(|o| PlanOutput {
                task_id: &o.task_id,
                materialization: o.result.as_ref().ok(),
                error: o.result.as_ref().err().map(ToString::to_string),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for o in &outcomes {
        match &o.result {
            Ok(m) => {
                println!(
                    "{}: {} session(s), {} scheduled",
                    o.task_id,
                    m.sessions.len(),
                    format_hours(m.scheduled_hours)
                );
                for s in &m.sessions {
                    println!("  #{} {} {}", s.session_number, s.date, render_slot(&s.slot));
                }
                if !m.is_complete() {
                    println!("  unscheduled: {}", format_hours(m.unscheduled_hours));
                }
            }
            Err(e) => println!("{}: {e}", o.task_id),
        }
    }
    Ok(())
}

fn next_slot(input: &Path, hours: f64, days: Option<u32>) -> Result<()> {
    if !(hours > 0.0) {
        bail!("--hours must be positive, got {hours}");
    }
    let ws = Workspace::load(input)?;
    let days = days.unwrap_or(ws.settings.planning_horizon_days).max(1);
    let until = ws
        .today
        .checked_add_days(Days::new(u64::from(days) - 1))
        .context("search range out of bounds")?;

    match find_first_date_with_slot(ws.today, until, hours, &ws.plans, &ws.commitments, &ws.settings)? {
        Some((date, s)) => println!("{date}: {}", render_slot(&s)),
        None => println!(
            "no free slot of {} between {} and {until}",
            format_hours(hours),
            ws.today
        ),
    }
    Ok(())
}
