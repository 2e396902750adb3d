use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use crate::calendar::grid::shift_month;
use crate::calendar::render::{render_day, render_month, render_skipped};
use crate::calendar::Zone;
use crate::clients::diary_client::DiaryClient;
use crate::config::Settings;
use crate::models::song;
use crate::service::calendar_service::CalendarService;
use crate::service::diary_api::DiaryApi;
use crate::service::journal_service::JournalService;

#[derive(Debug, Parser)]
#[command(name = "emotionary", version, about = "Music and photo diary, laid out on a calendar")]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:5001/api
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// IANA timezone used to decide which day an entry belongs to
    #[arg(long, global = true)]
    pub timezone: Option<Zone>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a month with per-day song and photo counts
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        /// Go back N months
        #[arg(long, conflicts_with = "next")]
        prev: Option<u32>,
        /// Go forward N months
        #[arg(long)]
        next: Option<u32>,
    },
    /// List everything logged on one day
    Day { date: NaiveDate },
    Songs,
    Photos,
    AddSong {
        title: String,
        #[arg(long)]
        artist: Option<String>,
    },
    /// Upload an image file as a diary photo
    AddPhoto {
        path: PathBuf,
        #[arg(long)]
        label: Option<String>,
    },
    /// Identify a song from an audio file and log it
    Recognize { path: PathBuf },
    /// Ask a question about your listening and photo history
    Ask { question: Vec<String> },
    DeletePhoto { id: i64 },
    /// Delete every song and photo
    ClearHistory {
        #[arg(long)]
        yes: bool,
    },
    Health,
}

pub fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got {:?}", s))
}

/// Applies command-line overrides on top of file/env settings.
pub fn apply_overrides(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(base) = &cli.api_base {
        settings.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(zone) = cli.timezone {
        settings.zone = zone;
    }
    settings
}

pub async fn cli(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let client = DiaryClient::new(&settings.api_base, settings.timeout)?;
    run_command(&client, cli.command, &settings.zone).await
}

pub async fn run_command<A: DiaryApi + ?Sized>(
    api: &A,
    command: Commands,
    zone: &Zone,
) -> anyhow::Result<()> {
    match command {
        Commands::Calendar { month, prev, next } => {
            let delta = match (prev, next) {
                (Some(n), _) => -i64::from(n),
                (_, Some(n)) => i64::from(n),
                _ => 0,
            };
            let delta = i32::try_from(delta).context("month offset is too large")?;
            let cursor = month.unwrap_or_else(|| zone.today());
            let cursor = shift_month(cursor, delta).ok_or_else(|| anyhow!("month is out of range"))?;
            let grid = CalendarService::month(api, cursor, zone).await?;
            print!("{}", render_month(&grid, zone.today()));
            print_skipped(&render_skipped(&grid.skipped));
        }
        Commands::Day { date } => {
            let (cell, grid) = CalendarService::day(api, date, zone).await?;
            print!("{}", render_day(&cell, zone));
            print_skipped(&render_skipped(&grid.skipped));
        }
        Commands::Songs => {
            let songs = JournalService::songs(api).await?;
            if songs.is_empty() {
                println!("No songs logged yet");
            }
            for s in songs {
                println!(
                    "#{:<5} {}  {}",
                    s.id,
                    s.listened_at,
                    song::describe(&s.title, s.artist.as_deref())
                );
            }
        }
        Commands::Photos => {
            let photos = JournalService::photos(api).await?;
            if photos.is_empty() {
                println!("No photos saved yet");
            }
            for p in photos {
                println!(
                    "#{:<5} {}  {}  ({} KB)",
                    p.id,
                    p.taken_at,
                    p.label.as_deref().filter(|l| !l.is_empty()).unwrap_or("(untitled)"),
                    p.data_url.len() / 1024
                );
            }
        }
        Commands::AddSong { title, artist } => {
            let ack = JournalService::add_song(api, &title, artist.as_deref()).await?;
            println!("{}", ack.message);
        }
        Commands::AddPhoto { path, label } => {
            let ack = JournalService::add_photo(api, &path, label.as_deref()).await?;
            println!("{}", ack.message);
        }
        Commands::Recognize { path } => {
            let recognition = JournalService::recognize(api, &path).await?;
            match recognition.song {
                Some(s) => println!(
                    "{}: {}",
                    recognition.message,
                    song::describe(&s.title, s.artist.as_deref())
                ),
                None => println!("{}", recognition.message),
            }
        }
        Commands::Ask { question } => {
            let question = if question.is_empty() {
                specify_question()?
            } else {
                question.join(" ")
            };
            let answer = JournalService::ask(api, &question).await?;
            println!("{}", answer_or_placeholder(&answer));
        }
        Commands::DeletePhoto { id } => {
            let ack = JournalService::delete_photo(api, id).await?;
            println!("{}", ack.message);
        }
        Commands::ClearHistory { yes } => {
            if !yes && !confirm_clear()? {
                println!("Nothing was deleted");
                return Ok(());
            }
            let ack = JournalService::clear_history(api).await?;
            println!("{}", ack.message);
        }
        Commands::Health => {
            let health = JournalService::health(api).await?;
            println!("{}: {}", health.status, health.message);
        }
    }
    Ok(())
}

fn print_skipped(lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("{} entries could not be placed on the calendar:", lines.len());
    for line in lines {
        println!("  {}", line);
    }
}

fn answer_or_placeholder(answer: &str) -> &str {
    if answer.trim().is_empty() {
        "(no answer)"
    } else {
        answer
    }
}

fn specify_question() -> anyhow::Result<String> {
    Ok(Text::new("What would you like to know about your music and photos?").prompt()?)
}

fn confirm_clear() -> anyhow::Result<bool> {
    Ok(Confirm::new("Clear ALL songs and photos? This cannot be undone.")
        .with_default(false)
        .prompt()?)
}
