//! Text patterns used to classify journal lines.
//!
//! The header and date patterns are configurable (see
//! [`ScraperConfig`](crate::config::ScraperConfig)); the remaining markers
//! are fixed parts of the journal layout.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

/// Running page header, e.g. `JOURNAL OF THE HOUSE 12th DAY`.
pub const DEFAULT_HEADER_PATTERN: &str = r"JOURNAL OF THE (HOUSE|SENATE).*\d+.*DAY";

/// Weekday date line, e.g. `MONDAY, JANUARY 12, 2015`.
pub const DEFAULT_DATE_PATTERN: &str = r"(?P<date>(MONDAY|TUESDAY|WEDNESDAY|THURSDAY|FRIDAY|SATURDAY|SUNDAY),\s\w+\s\d{1,2},\s\d{4})";

/// chrono format for the part of a date line after the weekday.
pub const DATE_FORMAT: &str = "%B %d, %Y";

const WEEKDAYS: &[&str] = &[
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

pub const ROLL_CALL_MARKER: &str = "ROLL CALL";

/// Appointment confirmations share the vote-list layout but are not bill votes.
pub const APPOINTMENT_CONFIRMATION: &str = "The Senate advises and consents to the appointment";

/// Lowercase words that mark the sentence concluding a vote.
pub const DISPOSITION_KEYWORDS: &[&str] = &[
    "passed",
    "adopted",
    "sustained",
    "prevailed",
    "lost",
    "failed",
];

/// Lowercase phrase marking a motion that needs a two-thirds majority.
pub const VETO_OVERRIDE_PHRASE: &str = "over the governor's veto";

lazy_static! {
    /// Bill reference: chamber, optional committee marker, type, number.
    static ref BILL_REFERENCE_PATTERN: Regex =
        Regex::new(r"(?i)(H|S|J)(C?)(B|R|M) (\d+)").unwrap();
}

/// Compiled line-level patterns for one scrape.
#[derive(Debug, Clone)]
pub struct Patterns {
    header: Regex,
    date: Regex,
}

impl Patterns {
    pub fn new(header: &str, date: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            header: Regex::new(header)?,
            date: Regex::new(date)?,
        })
    }

    /// Headers, date lines and blank lines carry no vote information.
    pub fn is_noise(&self, line: &str) -> bool {
        line.trim().is_empty() || self.header.is_match(line) || self.date.is_match(line)
    }

    /// Date on the first line of `text` that has one; the last one when that
    /// line holds several. Uses the `date` capture group when the pattern
    /// defines one, otherwise the whole match.
    pub fn find_date<'t>(&self, text: &'t str) -> Option<&'t str> {
        let first = self.date.find(text)?;
        let start = text[..first.start()].rfind('\n').map_or(0, |i| i + 1);
        let end = text[first.end()..]
            .find('\n')
            .map_or(text.len(), |i| first.end() + i);

        let caps = self.date.captures_iter(&text[start..end]).last()?;
        caps.name("date")
            .or_else(|| caps.get(0))
            .map(|m| m.as_str())
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_PATTERN, DEFAULT_DATE_PATTERN)
            .expect("default journal patterns are valid")
    }
}

/// Calendar date of a journal date line such as `MONDAY, MARCH 3, 2015`.
/// The weekday is dropped without checking it against the date.
pub fn parse_journal_date(raw: &str) -> Option<NaiveDate> {
    let date = match raw.split_once(',') {
        Some((weekday, rest)) if WEEKDAYS.contains(&weekday.trim().to_uppercase().as_str()) => {
            rest.trim()
        }
        _ => raw.trim(),
    };
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Whether a line contains one of the [`DISPOSITION_KEYWORDS`].
pub fn is_disposition(line: &str) -> bool {
    let lower = line.to_lowercase();
    DISPOSITION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// A bill reference as captured from a decision line, e.g. `SCR 4003`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillReference {
    pub chamber: String,
    pub committee: String,
    pub kind: String,
    pub number: String,
}

impl BillReference {
    /// The identifier as written, with one space before the number.
    pub fn id(&self) -> String {
        format!(
            "{}{}{} {}",
            self.chamber, self.committee, self.kind, self.number
        )
    }
}

/// The last bill reference on the line, if any.
pub fn last_bill_reference(line: &str) -> Option<BillReference> {
    BILL_REFERENCE_PATTERN
        .captures_iter(line)
        .last()
        .map(|caps| BillReference {
            chamber: caps[1].to_string(),
            committee: caps[2].to_string(),
            kind: caps[3].to_string(),
            number: caps[4].to_string(),
        })
}
