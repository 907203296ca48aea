use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rollcall::cli::{Cli, Command};
use rollcall::sink::JsonLinesSink;
use rollcall::source::{DirectorySource, HttpJournalSource, JournalSource};
use rollcall::ui::ScrapeProgress;
use rollcall::{Chamber, ScraperConfig, VoteScraper};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "rollcall=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = ScraperConfig::load()?;
    let output = cli.output.as_deref();

    match cli.command {
        Command::Scrape { chamber, session } => {
            let source = HttpJournalSource::new(config.clone())?;
            run(source, &config, chamber.into(), &session, output).await?;
        }
        Command::Parse {
            dir,
            chamber,
            session,
        } => {
            run(DirectorySource::new(dir), &config, chamber.into(), &session, output).await?;
        }
        Command::Sessions => {
            for (id, slug) in &config.sessions {
                println!("{id}\t{slug}");
            }
        }
    }

    Ok(())
}

async fn run<S: JournalSource>(
    source: S,
    config: &ScraperConfig,
    chamber: Chamber,
    session: &str,
    output: Option<&Path>,
) -> Result<()> {
    let patterns = config.patterns()?;
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let progress = ScrapeProgress::start(&format!(
        "Scraping {chamber} journals for session {session}"
    ));
    let mut scraper =
        VoteScraper::new(source, JsonLinesSink::new(writer), patterns).with_progress(progress);
    scraper
        .scrape(chamber, session)
        .await
        .with_context(|| format!("scrape of {chamber} session {session} failed"))?;
    Ok(())
}
