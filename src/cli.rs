/// CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::chart::format_minutes;
use crate::color::ColorAssigner;
use crate::db::{self, BlobStore};
use crate::stats::compute_range_totals;
use crate::types::{Range, Records, Settings};

#[derive(Parser)]
#[command(
    name = "studytick",
    version,
    about = "studytick - a terminal study timer with per-subject statistics"
)]
pub struct Cli {
    /// Path to the SQLite database.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },
    /// Print recorded minutes per subject.
    Stats {
        #[arg(short, long, value_enum, default_value = "month")]
        range: Range,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubjectCommand {
    Add { name: String },
    List,
}

/// Execute a CLI command against the blob store.
pub fn run(command: Command, store: &dyn BlobStore) -> Result<()> {
    let output = match command {
        Command::Subject {
            command: SubjectCommand::Add { name },
        } => handle_subject_add(&name, store)?,
        Command::Subject {
            command: SubjectCommand::List,
        } => render_subjects(&db::load_settings(store)),
        Command::Stats { range } => {
            let (records, _) = db::load_records(store);
            render_stats(&records, range)
        }
    };
    print!("{output}");
    Ok(())
}

fn handle_subject_add(name: &str, store: &dyn BlobStore) -> Result<String> {
    let mut settings = db::load_settings(store);
    let Some(added) = settings.add_subject(name) else {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok("Subject name is empty.\n".to_string());
        }
        return Ok(format!("Subject '{trimmed}' already exists.\n"));
    };
    db::save_settings(store, &settings)?;
    info!(subject = %added, "subject added");
    Ok(format!("Added subject '{added}'.\n"))
}

fn render_subjects(settings: &Settings) -> String {
    let mut out = String::new();
    for (index, subject) in settings.subjects.iter().enumerate() {
        if index == 0 {
            out.push_str(&format!("* {subject} (default)\n"));
        } else {
            out.push_str(&format!("  {subject}\n"));
        }
    }
    out
}

fn render_stats(records: &Records, range: Range) -> String {
    let totals = compute_range_totals(records, range, Local::now());
    if totals.is_empty() {
        return format!("No study time recorded this {}.\n", range.label().to_lowercase());
    }

    let mut colors = ColorAssigner::new();
    let sum = totals.sum() as f64;
    let width = totals
        .iter()
        .map(|(subject, _)| subject.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{} totals\n", range.label());
    for (index, (subject, minutes)) in totals.iter().enumerate() {
        let percent = f64::from(minutes) / sum * 100.0;
        let color = colors.color_for(subject, index);
        out.push_str(&format!(
            "{subject:<width$}  {:>8}  {percent:>5.1}%  {color}\n",
            format_minutes(minutes),
        ));
    }
    let total = u32::try_from(totals.sum()).unwrap_or(u32::MAX);
    out.push_str(&format!("{:<width$}  {:>8}\n", "Total", format_minutes(total)));
    out
}
