//! `duecard` - command-line dashboard for household credit-card reminders.
//!
//! # Responsibility
//! - Map every dashboard action (add/remove people and cards, edit card
//!   fields, mark paid, reset, backup) onto a subcommand.
//! - Render the derived reminder and statistics views as text or JSON.
//!
//! # Invariants
//! - All state changes go through `duecard_core`; this binary holds no
//!   business logic of its own.
//! - The wall clock is consulted here only; core receives `today` as an
//!   explicit argument.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use uuid::Uuid;

use duecard_core::db::open_db;
use duecard_core::{
    default_log_level, init_logging, Cadence, CardPatch, CreditCardAccount, HouseholdService,
    HouseholdSnapshot, NewCardRequest, Person, ReminderQuery, ReminderStatus,
    SqliteHouseholdRepository, UpcomingReminder, DEFAULT_LOOKAHEAD_DAYS,
    DEFAULT_REMINDER_LEAD_DAYS,
};

const DATA_DIR_NAME: &str = "duecard";
const DB_FILE_NAME: &str = "duecard.sqlite3";

/// Household credit-card bill reminder dashboard.
///
/// Tracks each person's cards, due dates and payment cadence, and surfaces
/// which bills are due soon or overdue.
#[derive(Debug, Parser)]
#[command(name = "duecard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the database and logs (defaults to the platform
    /// data directory)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show aggregate stats, every person's cards and upcoming reminders
    Dashboard {
        /// Emit the derived view as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Override the lookahead window in days
        #[arg(long, value_name = "DAYS")]
        lookahead: Option<i64>,
    },
    /// Register a person
    AddPerson {
        /// Display name
        name: String,
        /// Optional contact email
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove a person and all of their cards
    RemovePerson {
        person_id: Uuid,
    },
    /// Add a credit card to a person
    AddCard {
        person_id: Uuid,
        /// Card nickname, e.g. "Sapphire"
        #[arg(long)]
        nickname: String,
        /// Issuer name, e.g. "Chase"
        #[arg(long)]
        issuer: String,
        /// Next due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: NaiveDate,
        /// Amount due; non-numeric input falls back to 0
        #[arg(long, default_value = "0")]
        amount: String,
        /// Issuer pulls the payment automatically
        #[arg(long)]
        autopay: bool,
        /// Days before the due date to surface a reminder
        #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_REMINDER_LEAD_DAYS)]
        remind_days: u32,
        #[arg(long, value_enum, default_value = "monthly")]
        cadence: CadenceArg,
        /// Explicit #rrggbb display color (derived from the nickname when
        /// omitted)
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove one card
    RemoveCard {
        card_id: Uuid,
    },
    /// Edit individual card fields in place
    Set {
        card_id: Uuid,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long, value_name = "DATE")]
        due: Option<NaiveDate>,
        /// Non-numeric input falls back to 0
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, value_name = "BOOL")]
        autopay: Option<bool>,
        #[arg(long, value_name = "DAYS")]
        remind_days: Option<u32>,
        #[arg(long, value_enum)]
        cadence: Option<CadenceArg>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Log a manual payment: stamps today and rolls the due date forward
    MarkPaid {
        card_id: Uuid,
    },
    /// Show the payment history of one card
    History {
        card_id: Uuid,
    },
    /// Clear the store and restore the bundled sample data
    Reset,
    /// Write a JSON snapshot of the full collection
    Export {
        /// Target file; stdout when omitted
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Replace the full collection with a JSON snapshot
    Import {
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CadenceArg {
    Weekly,
    Biweekly,
    Monthly,
}

impl From<CadenceArg> for Cadence {
    fn from(value: CadenceArg) -> Self {
        match value {
            CadenceArg::Weekly => Cadence::Weekly,
            CadenceArg::Biweekly => Cadence::Biweekly,
            CadenceArg::Monthly => Cadence::Monthly,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = data_dir.join("logs");
    init_logging(&level, &log_dir.to_string_lossy())?;

    let conn = open_db(data_dir.join(DB_FILE_NAME))?;
    let repo = SqliteHouseholdRepository::try_new(&conn)?;
    let service = HouseholdService::new(repo);
    let today = Local::now().date_naive();

    if service.ensure_seed_data(today)? {
        println!("Empty store: seeded the bundled sample household.");
    }
    info!("event=cli_start module=cli status=ok today={today}");

    match cli.command {
        Command::Dashboard { json, lookahead } => {
            let query = ReminderQuery {
                lookahead_days: lookahead.unwrap_or(DEFAULT_LOOKAHEAD_DAYS),
            };
            let snapshot = service.dashboard(today, &query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                render_dashboard(
                    &service.people()?,
                    &snapshot.stats,
                    &snapshot.reminders,
                    today,
                    query.lookahead_days,
                );
            }
        }
        Command::AddPerson { name, email } => {
            let person = service.register_person(name, email)?;
            println!("Registered {} ({})", person.name, person.id);
        }
        Command::RemovePerson { person_id } => {
            service.remove_person(person_id)?;
            println!("Removed person {person_id} and their cards.");
        }
        Command::AddCard {
            person_id,
            nickname,
            issuer,
            due,
            amount,
            autopay,
            remind_days,
            cadence,
            color,
        } => {
            let mut request = NewCardRequest::new(nickname, issuer, due, cadence.into());
            request.amount_due = parse_amount(&amount);
            request.autopay = autopay;
            request.remind_days_before = remind_days;
            request.color = color;
            let card = service.add_card(person_id, &request)?;
            println!(
                "Added {} ({}) due {} for ${:.2}",
                card.nickname, card.id, card.due_date, card.amount_due
            );
        }
        Command::RemoveCard { card_id } => {
            service.remove_card(card_id)?;
            println!("Removed card {card_id}.");
        }
        Command::Set {
            card_id,
            nickname,
            issuer,
            due,
            amount,
            autopay,
            remind_days,
            cadence,
            color,
        } => {
            let patch = CardPatch {
                nickname,
                issuer,
                color,
                due_date: due,
                amount_due: amount.as_deref().map(parse_amount),
                autopay,
                remind_days_before: remind_days,
                cadence: cadence.map(Into::into),
            };
            let card = service.update_card(card_id, &patch)?;
            println!("Updated {}:", card.nickname);
            print_card(&card, today, "  ");
        }
        Command::MarkPaid { card_id } => {
            let card = service.mark_paid(card_id, today)?;
            println!(
                "Marked {} paid on {}; next due {}.",
                card.nickname, today, card.due_date
            );
        }
        Command::History { card_id } => {
            let entries = service.payment_history(card_id)?;
            if entries.is_empty() {
                println!("No payments logged yet.");
            }
            for entry in entries {
                println!(
                    "{}  ${:.2}  due {} -> {}",
                    entry.paid_on, entry.amount, entry.due_before, entry.due_after
                );
            }
        }
        Command::Reset => {
            let people = service.reset_to_sample(today)?;
            println!("Store reset; restored sample data ({} people).", people.len());
        }
        Command::Export { output } => {
            let snapshot = service.snapshot()?;
            let json = serde_json::to_string_pretty(&snapshot)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    println!("Exported snapshot to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Import { file } => {
            let json = fs::read_to_string(&file)?;
            let snapshot: HouseholdSnapshot = serde_json::from_str(&json)?;
            let restored = service.replace_with_snapshot(&snapshot)?;
            println!("Imported snapshot ({restored} people).");
        }
    }

    Ok(())
}

fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    let dir = match override_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .ok_or("could not determine the platform data directory")?
            .join(DATA_DIR_NAME),
    };
    fs::create_dir_all(&dir)?;
    // Logging requires an absolute directory; normalize user-provided
    // relative paths here.
    Ok(dir.canonicalize()?)
}

/// Numeric form fields fall back to zero instead of failing the action.
fn parse_amount(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

fn render_dashboard(
    people: &[Person],
    stats: &duecard_core::DashboardStats,
    reminders: &[UpcomingReminder],
    today: NaiveDate,
    lookahead_days: i64,
) {
    println!("Household credit-card reminders ({today})");
    println!(
        "People {} · Cards {} · Autopay {}/{} · Due ${:.2} · Overdue {}",
        stats.people, stats.cards, stats.autopay_cards, stats.cards, stats.total_amount_due,
        stats.overdue_cards
    );

    for person in people {
        println!();
        match &person.email {
            Some(email) => println!("{} <{}>  [{}]", person.name, email, person.id),
            None => println!("{}  [{}]", person.name, person.id),
        }
        if person.cards.is_empty() {
            println!("  (no cards yet)");
        }
        for card in &person.cards {
            print_card(card, today, "  ");
        }
    }

    println!();
    println!("Upcoming reminders (next {lookahead_days} days):");
    if reminders.is_empty() {
        println!("  none; add cards or adjust due dates to get started");
    }
    for reminder in reminders {
        println!(
            "  {:<9} {} · {} · due {} ({}) · {}",
            status_label(reminder.status),
            reminder.card_nickname,
            reminder.person_name,
            reminder.due_date,
            due_phrase(reminder.days_until_due),
            autopay_label(reminder.autopay),
        );
    }
}

fn print_card(card: &CreditCardAccount, today: NaiveDate, indent: &str) {
    let status = duecard_core::reminder_status(card.due_date, today);
    println!(
        "{indent}{} ({}) · due {} · ${:.2} · [{}] · {} · remind {}d before · {}  [{}]",
        card.nickname,
        card.issuer,
        card.due_date,
        card.amount_due,
        status_label(status),
        autopay_label(card.autopay),
        card.remind_days_before,
        card.cadence.as_str(),
        card.id
    );
}

fn status_label(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Overdue => "Overdue",
        ReminderStatus::DueToday => "Due today",
        ReminderStatus::DueSoon => "Due soon",
        ReminderStatus::Scheduled => "Scheduled",
    }
}

fn autopay_label(autopay: bool) -> &'static str {
    if autopay {
        "Autopay"
    } else {
        "Manual"
    }
}

fn due_phrase(days: i64) -> String {
    if days < 0 {
        format!("{} days ago", -days)
    } else if days == 0 {
        "today".to_string()
    } else {
        format!("in {days} days")
    }
}
