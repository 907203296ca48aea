use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patterns::{BillReference, VETO_OVERRIDE_PHRASE};
use super::state::Categories;

/// Legislative chamber, as used both for the chamber under scrape and for a
/// bill's chamber of origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Lower,
    Upper,
    Joint,
    Other,
}

impl Chamber {
    /// Chamber of origin from the first character of a bill identifier.
    pub fn from_bill_id(bill_id: &str) -> Self {
        match bill_id.chars().next() {
            Some('H') => Chamber::Lower,
            Some('S') => Chamber::Upper,
            Some('J') => Chamber::Joint,
            _ => Chamber::Other,
        }
    }

    /// Name used in journal index URLs.
    pub fn journal_name(&self) -> &'static str {
        match self {
            Chamber::Lower => "house",
            Chamber::Upper => "senate",
            Chamber::Joint => "joint",
            Chamber::Other => "other",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chamber::Lower => write!(f, "lower"),
            Chamber::Upper => write!(f, "upper"),
            Chamber::Joint => write!(f, "joint"),
            Chamber::Other => write!(f, "other"),
        }
    }
}

/// Where a document came from: the document itself and the index page
/// that linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocators {
    pub document: String,
    pub index: String,
}

/// Per-document facts shared by every vote in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub date: NaiveDate,
    pub chamber: Chamber,
    pub session: String,
    pub sources: SourceLocators,
}

/// Outcome bucket a vote category is tallied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Yes,
    No,
    Other,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Yes, Bucket::No, Bucket::Other];

    /// The category label this bucket is read from.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Yes => "YEAS",
            Bucket::No => "NAYS",
            Bucket::Other => "ABSENT AND NOT VOTING",
        }
    }
}

/// A single concluded roll-call vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub chamber: Chamber,
    pub date: NaiveDate,
    pub motion: String,
    pub passed: bool,
    pub yes_count: usize,
    pub no_count: usize,
    pub other_count: usize,
    pub session: String,
    pub bill_id: String,
    pub bill_chamber: Chamber,
    pub sources: Vec<String>,
    pub yes_votes: Vec<String>,
    pub no_votes: Vec<String>,
    pub other_votes: Vec<String>,
}

impl VoteRecord {
    /// Build a record from the categories and motion collected for one vote.
    ///
    /// Only the three known labels are tallied; empty names left behind by
    /// trailing semicolons are dropped before counting.
    pub fn build(
        ctx: &DocumentContext,
        motion: &str,
        categories: &Categories,
        bill: &BillReference,
    ) -> Self {
        let [yes_votes, no_votes, other_votes] =
            Bucket::ALL.map(|bucket| bucket_members(categories, bucket));

        let yes_count = yes_votes.len();
        let no_count = no_votes.len();
        let other_count = other_votes.len();

        let bill_id = bill.id();
        let bill_chamber = Chamber::from_bill_id(&bill_id);

        Self {
            chamber: ctx.chamber,
            date: ctx.date,
            motion: motion.to_string(),
            passed: vote_passed(motion, yes_count, no_count),
            yes_count,
            no_count,
            other_count,
            session: ctx.session.clone(),
            bill_id,
            bill_chamber,
            sources: vec![ctx.sources.document.clone(), ctx.sources.index.clone()],
            yes_votes,
            no_votes,
            other_votes,
        }
    }

    pub fn total_count(&self) -> usize {
        self.yes_count + self.no_count + self.other_count
    }
}

fn bucket_members(categories: &Categories, bucket: Bucket) -> Vec<String> {
    categories
        .get(bucket.label())
        .map(|names| {
            names
                .iter()
                .filter(|name| !name.is_empty())
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Simple majority, or strictly more than two thirds when overriding a veto.
/// Ties fail.
pub fn vote_passed(motion: &str, yes: usize, no: usize) -> bool {
    if motion.to_lowercase().contains(VETO_OVERRIDE_PHRASE) {
        yes * 2 > no * 3
    } else {
        yes > no
    }
}
