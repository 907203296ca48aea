//! Extraction of roll-call vote records from legislative journal text.
//!
//! The core is [`journal::VoteMachine`], a line-by-line fold that turns
//! converted journal text into [`journal::VoteRecord`]s. [`scraper`] drives
//! it over whole documents pulled from a [`source::JournalSource`] and hands
//! the results to a [`sink::VoteSink`].

pub mod cli;
pub mod config;
pub mod error;
pub mod journal;
pub mod scraper;
pub mod sink;
pub mod source;
pub mod ui;

pub use config::ScraperConfig;
pub use error::{DataQualityWarning, FetchError, ParseFault, ScrapeError};
pub use journal::{Chamber, VoteRecord};
pub use scraper::{ScrapeSummary, VoteScraper, parse_document};
