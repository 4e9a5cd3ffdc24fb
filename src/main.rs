mod config;
mod date;
mod error;
mod ics;
mod merge;
mod scrape;
mod store;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use config::Config;
use date::FridayDate;
use merge::MergeOutcome;
use store::IcsStore;

#[derive(Parser)]
#[command(name = "bcfriday")]
#[command(about = "Scrape upcoming Bandcamp Friday dates and keep a subscribable .ics calendar up to date")]
struct Cli {
    /// Path of the .ics file to maintain
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Page to scrape dates from
    #[arg(long)]
    url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Report what would change without writing the file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;
    if let Some(file) = cli.file {
        cfg.ics_file = file;
    }
    if let Some(url) = cli.url {
        cfg.source_url = url;
    }
    if let Some(timeout) = cli.timeout {
        cfg.timeout_secs = timeout;
    }

    run(&cfg, cli.dry_run).await
}

/// One fetch-merge-write cycle.
///
/// Fetch and extraction failures degrade to "no dates found" and exit 0;
/// only storage failures (other than a missing file) and a corrupt document
/// propagate and exit non-zero.
async fn run(cfg: &Config, dry_run: bool) -> Result<()> {
    println!("Scraping Bandcamp Friday dates from {}...", cfg.source_url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;

    let extraction = match scrape::fetch(&client, &cfg.source_url).await {
        Ok(body) => scrape::extract_dates(&body),
        Err(e) => {
            println!("{}", format!("Fetch failed: {:#}", e).red());
            scrape::Extraction::default()
        }
    };

    if extraction.skipped > 0 {
        println!(
            "{}",
            format!("Skipped {} items with unparseable dates", extraction.skipped).yellow()
        );
    }

    if extraction.dates.is_empty() {
        println!("No dates found. Calendar not updated.");
        return Ok(());
    }

    println!(
        "Found {} dates: {}",
        extraction.dates.len(),
        render_dates(&extraction.dates)
    );

    let store = IcsStore::new(&cfg.ics_file);

    if dry_run {
        let existing = store.load()?;
        let pending = merge::pending_dates(existing.as_ref(), &extraction.dates);
        if pending.is_empty() {
            println!("No new dates to add.");
        } else {
            println!(
                "Would add {} new dates: {}",
                pending.len(),
                render_dates(&pending)
            );
        }
        return Ok(());
    }

    match merge::merge(&store, &extraction.dates, chrono::Utc::now())? {
        MergeOutcome::UpToDate => println!("No new dates to add."),
        MergeOutcome::Written { added, created } => {
            println!(
                "Adding {} new dates: {}",
                added.len(),
                render_dates(&added)
            );
            let verb = if created { "Created" } else { "Updated" };
            println!(
                "{}",
                format!("{} {}", verb, cfg.ics_file.display()).green()
            );
        }
    }

    Ok(())
}

fn render_dates(dates: &[FridayDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
