//! Document driver: fetches journals, dates them, folds their lines through
//! the vote parser and hands records to the sink.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DataQualityWarning, ParseFault, ScrapeError};
use crate::journal::{
    Chamber, DocumentContext, LineEvent, ParserState, Patterns, SourceLocators, VoteMachine,
    VoteRecord, parse_journal_date,
};
use crate::sink::VoteSink;
use crate::source::JournalSource;
use crate::ui::ScrapeProgress;

/// Counters and warnings for one scrape invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapeSummary {
    pub documents_seen: usize,
    pub documents_parsed: usize,
    pub documents_skipped: usize,
    pub votes_emitted: usize,
    pub warnings: Vec<DataQualityWarning>,
}

/// What one document yielded. `date` is `None` when the document was skipped
/// for lack of a usable date.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub date: Option<NaiveDate>,
    pub records: Vec<VoteRecord>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Date a document. The first dated line of the text dates every vote in
/// it; without a usable date the document must not be parsed.
pub fn document_context(
    text: &str,
    chamber: Chamber,
    session: &str,
    sources: &SourceLocators,
    patterns: &Patterns,
) -> Result<DocumentContext, DataQualityWarning> {
    let raw_date = patterns
        .find_date(text)
        .ok_or_else(|| DataQualityWarning::MissingDate {
            document: sources.document.clone(),
        })?;
    let date =
        parse_journal_date(raw_date).ok_or_else(|| DataQualityWarning::UnparseableDate {
            document: sources.document.clone(),
            date: raw_date.to_string(),
        })?;

    Ok(DocumentContext {
        date,
        chamber,
        session: session.to_string(),
        sources: sources.clone(),
    })
}

/// Date a document and collect all of its votes.
///
/// Nothing is returned for a document that hits a [`ParseFault`];
/// [`VoteScraper`] emits votes line by line instead.
pub fn parse_document(
    text: &str,
    chamber: Chamber,
    session: &str,
    sources: &SourceLocators,
    patterns: &Patterns,
) -> Result<ParsedDocument, ParseFault> {
    let ctx = match document_context(text, chamber, session, sources, patterns) {
        Ok(ctx) => ctx,
        Err(warning) => {
            return Ok(ParsedDocument {
                date: None,
                records: Vec::new(),
                warnings: vec![warning],
            });
        }
    };
    let machine = VoteMachine::new(&ctx, patterns);

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for event in machine.run(text.lines())? {
        match event {
            LineEvent::Vote(record) => records.push(record),
            LineEvent::Discarded(warning) => warnings.push(warning),
        }
    }

    Ok(ParsedDocument {
        date: Some(ctx.date),
        records,
        warnings,
    })
}

/// Drives every journal document of a chamber and session through the parser.
pub struct VoteScraper<S, K> {
    source: S,
    sink: K,
    patterns: Patterns,
    progress: Option<ScrapeProgress>,
}

impl<S: JournalSource, K: VoteSink> VoteScraper<S, K> {
    pub fn new(source: S, sink: K, patterns: Patterns) -> Self {
        Self {
            source,
            sink,
            patterns,
            progress: None,
        }
    }

    /// Report per-document progress on a terminal spinner.
    pub fn with_progress(mut self, progress: ScrapeProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Scrape every document of `chamber` in `session`, in listing order.
    ///
    /// Transient fetch failures and data-quality problems are logged and
    /// skipped. A [`ParseFault`] stops the run.
    pub async fn scrape(
        &mut self,
        chamber: Chamber,
        session: &str,
    ) -> Result<ScrapeSummary, ScrapeError> {
        let result = self.scrape_documents(chamber, session).await;
        if let Some(progress) = &self.progress {
            match &result {
                Ok(summary) => progress.finish(summary),
                Err(_) => progress.abandon(),
            }
        }
        result
    }

    async fn scrape_documents(
        &mut self,
        chamber: Chamber,
        session: &str,
    ) -> Result<ScrapeSummary, ScrapeError> {
        let documents = self.source.list_documents(chamber, session).await?;
        info!(%chamber, session, documents = documents.len(), "scraping journals");

        let total = documents.len();
        let mut summary = ScrapeSummary::default();

        for (position, locators) in documents.iter().enumerate() {
            summary.documents_seen += 1;
            if let Some(progress) = &self.progress {
                progress.document(position + 1, total, &locators.document);
            }

            let text = match self.source.fetch_text(locators).await {
                Ok(text) => text,
                Err(err) if err.is_transient() => {
                    warn!(document = %locators.document, error = %err, "skipping document");
                    summary.documents_skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let ctx = match document_context(&text, chamber, session, locators, &self.patterns) {
                Ok(ctx) => ctx,
                Err(warning) => {
                    warn!(document = %locators.document, "{warning}");
                    summary.warnings.push(warning);
                    summary.documents_skipped += 1;
                    continue;
                }
            };

            // Votes reach the sink as soon as they are recognized, so a later
            // fault in the same document does not take them back.
            let machine = VoteMachine::new(&ctx, &self.patterns);
            let mut state = ParserState::default();
            let mut votes = 0;
            for line in text.lines() {
                let (next, event) =
                    machine
                        .step(state, line)
                        .map_err(|fault| ScrapeError::Parse {
                            document: locators.document.clone(),
                            fault,
                        })?;
                state = next;

                match event {
                    Some(LineEvent::Vote(record)) => {
                        self.sink.emit(record)?;
                        votes += 1;
                        summary.votes_emitted += 1;
                    }
                    Some(LineEvent::Discarded(warning)) => {
                        warn!(document = %locators.document, "{warning}");
                        summary.warnings.push(warning);
                    }
                    None => {}
                }
            }

            debug!(
                document = %locators.document,
                date = %ctx.date,
                votes,
                "parsed journal"
            );
            summary.documents_parsed += 1;
        }

        info!(
            votes = summary.votes_emitted,
            parsed = summary.documents_parsed,
            skipped = summary.documents_skipped,
            "scrape finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;

    const JOURNAL: &str = "\
JOURNAL OF THE HOUSE 40th DAY
TUESDAY, MARCH 3, 2015

ROLL CALL
A MOTION TO CONCUR
ABSENT AND NOT VOTING
YEAS: Alice; Bob
NAYS: Carol
Motion prevailed. HB 1012 passed.
";

    fn sources(document: &str) -> SourceLocators {
        SourceLocators {
            document: document.into(),
            index: "http://legis.test/house-journal.html".into(),
        }
    }

    fn parse(text: &str) -> Result<ParsedDocument, ParseFault> {
        parse_document(text, Chamber::Lower, "64", &sources("day40"), &Patterns::default())
    }

    #[test]
    fn concur_scenario_yields_one_record() {
        let parsed = parse(JOURNAL).unwrap();
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.records.len(), 1);

        let record = &parsed.records[0];
        assert_eq!(record.motion, "A MOTION TO CONCUR ABSENT AND NOT VOTING");
        assert_eq!(record.yes_votes, vec!["Alice", "Bob"]);
        assert_eq!(record.no_votes, vec!["Carol"]);
        assert!(record.other_votes.is_empty());
        assert!(record.passed);
        assert_eq!(record.bill_id, "HB 1012");
        assert_eq!(record.bill_chamber, Chamber::Lower);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2015, 3, 3).unwrap());
        assert_eq!(record.session, "64");
        assert_eq!(
            record.sources,
            vec!["day40", "http://legis.test/house-journal.html"]
        );
    }

    #[test]
    fn document_without_date_is_skipped() {
        let parsed = parse("ROLL CALL\nA MOTION ABSENT AND NOT VOTING\nYEAS: Alice\nHB 1 passed.\n")
            .unwrap();
        assert_eq!(parsed.date, None);
        assert!(parsed.records.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![DataQualityWarning::MissingDate {
                document: "day40".into()
            }]
        );
    }

    #[test]
    fn mismatched_weekday_still_dates_document() {
        let text = JOURNAL.replace("TUESDAY, MARCH 3, 2015", "MONDAY, MARCH 3, 2015");
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2015, 3, 3));
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn impossible_date_is_skipped() {
        let parsed = parse("TUESDAY, FEBRUARY 30, 2015\nROLL CALL\n").unwrap();
        assert_eq!(parsed.date, None);
        assert!(parsed.records.is_empty());
        assert!(matches!(
            parsed.warnings.as_slice(),
            [DataQualityWarning::UnparseableDate { date, .. }] if date == "TUESDAY, FEBRUARY 30, 2015"
        ));
    }

    #[test]
    fn document_is_dated_by_last_date_on_first_dated_line() {
        let text = JOURNAL.replace(
            "TUESDAY, MARCH 3, 2015",
            "TUESDAY, MARCH 3, 2015 continued from FRIDAY, MARCH 6, 2015",
        );
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2015, 3, 6));
        assert_eq!(
            parsed.records[0].date,
            NaiveDate::from_ymd_opt(2015, 3, 6).unwrap()
        );
    }

    #[test]
    fn multiple_votes_with_continuations_and_discards() {
        let text = "\
FRIDAY, MARCH 6, 2015
ROLL CALL
The question being on the final passage of the amended bill, which has been read,
the roll was called and there were 60 YEAS, 30 NAYS, 4 EXCUSED, 0 ABSENT AND NOT
VOTING.
YEAS: Anderson; Beadle; Boe; Brabandt;
Carlson; Damschen;
NAYS: Delmore; Glassheim
ABSENT AND NOT VOTING: Kelsh;
Reengrossed SB 2103 passed.
JOURNAL OF THE HOUSE 43rd DAY
ROLL CALL
ON THE MOTION ABSENT AND NOT VOTING
YEAS: Anderson
The motion prevailed.
ROLL CALL
CONFIRMATION ABSENT AND NOT VOTING
YEAS: Anderson; Boe
The Senate advises and consents to the appointment of John Smith.
ROLL CALL
SHALL THE BILL PASS ABSENT AND NOT VOTING
YEAS: Anderson
NAYS: Boe; Carlson
HCR 3001 failed.
";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);

        let first = &parsed.records[0];
        assert_eq!(first.bill_id, "SB 2103");
        assert_eq!(first.bill_chamber, Chamber::Upper);
        assert_eq!(
            first.yes_votes,
            vec!["Anderson", "Beadle", "Boe", "Brabandt", "Carlson", "Damschen"]
        );
        assert_eq!(first.no_votes, vec!["Delmore", "Glassheim"]);
        assert_eq!(first.other_votes, vec!["Kelsh"]);
        assert_eq!(first.chamber, Chamber::Lower);
        assert!(first.passed);

        let second = &parsed.records[1];
        assert_eq!(second.bill_id, "HCR 3001");
        assert!(!second.passed);
        assert_eq!((second.yes_count, second.no_count), (1, 2));

        assert!(matches!(
            &parsed.warnings[0],
            DataQualityWarning::MissingBillOrMotion { motion, .. } if motion == "ON THE MOTION ABSENT AND NOT VOTING"
        ));
    }

    #[test]
    fn tallies_match_filtered_names() {
        let parsed = parse(JOURNAL).unwrap();
        for record in &parsed.records {
            let names = record.yes_votes.len() + record.no_votes.len() + record.other_votes.len();
            assert_eq!(record.total_count(), names);
            assert!(
                record
                    .yes_votes
                    .iter()
                    .chain(&record.no_votes)
                    .chain(&record.other_votes)
                    .all(|n| !n.is_empty())
            );
        }
    }

    #[test]
    fn reparsing_is_identical() {
        let first = serde_json::to_string(&parse(JOURNAL).unwrap().records).unwrap();
        let second = serde_json::to_string(&parse(JOURNAL).unwrap().records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn veto_override_uses_two_thirds_rule() {
        let yeas: Vec<String> = (0..66).map(|i| format!("Y{i}")).collect();
        let nays: Vec<String> = (0..44).map(|i| format!("N{i}")).collect();
        let text = format!(
            "TUESDAY, MARCH 3, 2015\nROLL CALL\nSHALL HB 1234 PASS OVER THE GOVERNOR'S VETO ABSENT AND NOT VOTING\nYEAS: {}\nNAYS: {}\nHB 1234 failed.\n",
            yeas.join("; "),
            nays.join("; ")
        );
        let parsed = parse(&text).unwrap();
        let record = &parsed.records[0];
        assert_eq!((record.yes_count, record.no_count), (66, 44));
        assert!(!record.passed);
    }

    #[test]
    fn vote_data_in_motion_is_fatal() {
        let text = "TUESDAY, MARCH 3, 2015\nROLL CALL\nYEAS: Alice NAYS: Bob ABSENT AND NOT VOTING\nHB 1 passed.\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ParseFault::VoteDataInMotion { .. }));
    }

    enum Doc {
        Text(&'static str),
        Unreachable,
        Gone,
    }

    struct MockSource {
        docs: Vec<(&'static str, Doc)>,
    }

    impl JournalSource for MockSource {
        async fn list_documents(
            &self,
            _chamber: Chamber,
            _session: &str,
        ) -> Result<Vec<SourceLocators>, ScrapeError> {
            Ok(self.docs.iter().map(|(name, _)| sources(name)).collect())
        }

        async fn fetch_text(&self, locators: &SourceLocators) -> Result<String, FetchError> {
            let (_, doc) = self
                .docs
                .iter()
                .find(|(name, _)| *name == locators.document)
                .expect("listed document");
            match doc {
                Doc::Text(text) => Ok(text.to_string()),
                Doc::Unreachable => Err(FetchError::Io {
                    locator: locators.document.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
                }),
                Doc::Gone => Err(FetchError::Status {
                    locator: locators.document.clone(),
                    status: 404,
                }),
            }
        }
    }

    #[tokio::test]
    async fn scrape_skips_transient_failures_and_undated_documents() {
        let source = MockSource {
            docs: vec![
                ("day1", Doc::Unreachable),
                ("day2", Doc::Text("no date here\nROLL CALL\n")),
                ("day3", Doc::Text(JOURNAL)),
            ],
        };
        let mut scraper = VoteScraper::new(source, MemorySink::default(), Patterns::default());
        let summary = scraper.scrape(Chamber::Lower, "64").await.unwrap();

        assert_eq!(summary.documents_seen, 3);
        assert_eq!(summary.documents_skipped, 2);
        assert_eq!(summary.documents_parsed, 1);
        assert_eq!(summary.votes_emitted, 1);
        assert_eq!(summary.warnings.len(), 1);

        let sink = scraper.into_sink();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].sources[0], "day3");
    }

    #[tokio::test]
    async fn scrape_stops_on_permanent_fetch_error() {
        let source = MockSource {
            docs: vec![("day1", Doc::Gone), ("day2", Doc::Text(JOURNAL))],
        };
        let mut scraper = VoteScraper::new(source, MemorySink::default(), Patterns::default());
        let err = scraper.scrape(Chamber::Lower, "64").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::Status { status: 404, .. })));
        assert!(scraper.sink().records.is_empty());
    }

    #[tokio::test]
    async fn scrape_stops_on_parse_fault() {
        let source = MockSource {
            docs: vec![
                ("day1", Doc::Text(JOURNAL)),
                (
                    "day2",
                    Doc::Text("TUESDAY, MARCH 3, 2015\nROLL CALL\nX ABSENT AND NOT VOTING\nYEAS: A\nROLL CALL\n"),
                ),
                ("day3", Doc::Text(JOURNAL)),
            ],
        };
        let mut scraper = VoteScraper::new(source, MemorySink::default(), Patterns::default());
        let err = scraper.scrape(Chamber::Lower, "64").await.unwrap_err();

        match err {
            ScrapeError::Parse { document, fault } => {
                assert_eq!(document, "day2");
                assert!(matches!(fault, ParseFault::ModeConflict { .. }));
            }
            other => panic!("expected parse fault, got {other}"),
        }
        assert_eq!(scraper.sink().records.len(), 1);
    }

    #[tokio::test]
    async fn votes_before_a_fault_reach_the_sink() {
        let source = MockSource {
            docs: vec![(
                "day1",
                Doc::Text(
                    "TUESDAY, MARCH 3, 2015\n\
                     ROLL CALL\n\
                     FIRST MOTION ABSENT AND NOT VOTING\n\
                     YEAS: Alice\n\
                     HB 1 passed.\n\
                     ROLL CALL\n\
                     SECOND MOTION ABSENT AND NOT VOTING\n\
                     YEAS: Bob\n\
                     ROLL CALL\n",
                ),
            )],
        };
        let mut scraper = VoteScraper::new(source, MemorySink::default(), Patterns::default());
        let err = scraper.scrape(Chamber::Lower, "64").await.unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::Parse {
                fault: ParseFault::ModeConflict { .. },
                ..
            }
        ));
        let records = &scraper.sink().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bill_id, "HB 1");
        assert_eq!(records[0].yes_votes, vec!["Alice"]);
    }
}
