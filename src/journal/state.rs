use std::fmt;

use crate::error::{DataQualityWarning, ParseFault};

use super::patterns::{
    APPOINTMENT_CONFIRMATION, Patterns, ROLL_CALL_MARKER, is_disposition, last_bill_reference,
};
use super::record::{DocumentContext, VoteRecord};

/// The three modes of the roll-call parser.
///
/// A vote flows through: OUTSIDE → IN_MOTION → IN_VOTE → OUTSIDE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Outside,
    InMotion,
    InVote,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Outside => write!(f, "OUTSIDE"),
            Mode::InMotion => write!(f, "IN_MOTION"),
            Mode::InVote => write!(f, "IN_VOTE"),
        }
    }
}

/// Vote category label → member names, in the order labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    entries: Vec<(String, Vec<String>)>,
}

impl Categories {
    /// Start a category. Re-opening a label replaces its list but keeps its
    /// original position.
    pub fn open(&mut self, label: impl Into<String>, names: Vec<String>) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = names,
            None => self.entries.push((label, names)),
        }
    }

    /// Append continuation names to an open category. Returns false if the
    /// label was never opened.
    pub fn extend(&mut self, label: &str, names: Vec<String>) -> bool {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, existing)) => {
                existing.extend(names);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, names)| names.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything accumulated for the vote currently being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub mode: Mode,
    pub motion: String,
    pub categories: Categories,
    /// Label most recently opened by a colon line; continuation lines land here.
    pub current: Option<String>,
}

impl ParserState {
    fn push_motion(&mut self, line: &str) {
        if !self.motion.is_empty() {
            self.motion.push(' ');
        }
        self.motion.push_str(line);
    }
}

/// Something a single line produced besides a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    Vote(VoteRecord),
    Discarded(DataQualityWarning),
}

/// Folds journal lines into vote records for one document.
pub struct VoteMachine<'a> {
    ctx: &'a DocumentContext,
    patterns: &'a Patterns,
}

impl<'a> VoteMachine<'a> {
    pub fn new(ctx: &'a DocumentContext, patterns: &'a Patterns) -> Self {
        Self { ctx, patterns }
    }

    /// Advance the parser by one line.
    ///
    /// - Noise lines never change state.
    /// - `ROLL CALL` opens a motion from `Outside`; inside a vote list it is
    ///   a [`ParseFault::ModeConflict`].
    /// - In `InMotion` lines accumulate until one ends in `VOTING`.
    /// - In `InVote` lines open or continue categories until a decision line
    ///   emits a record or a warning and resets to `Outside`.
    pub fn step(
        &self,
        mut state: ParserState,
        line: &str,
    ) -> Result<(ParserState, Option<LineEvent>), ParseFault> {
        if self.patterns.is_noise(line) {
            return Ok((state, None));
        }

        let trimmed = line.trim();
        if trimmed == ROLL_CALL_MARKER {
            match state.mode {
                Mode::Outside => state.mode = Mode::InMotion,
                Mode::InMotion => {}
                Mode::InVote => {
                    return Err(ParseFault::ModeConflict {
                        motion: state.motion,
                    });
                }
            }
            return Ok((state, None));
        }

        match state.mode {
            Mode::Outside => Ok((state, None)),
            Mode::InMotion => {
                state.push_motion(trimmed);
                if trimmed.ends_with("VOTING") || trimmed.ends_with("VOTING.") {
                    state.mode = Mode::InVote;
                }
                Ok((state, None))
            }
            Mode::InVote => self.collect_vote_line(state, line),
        }
    }

    /// Fold every line of a document, returning events in line order.
    /// A vote still open at the end is dropped.
    pub fn run<'l>(
        &self,
        lines: impl IntoIterator<Item = &'l str>,
    ) -> Result<Vec<LineEvent>, ParseFault> {
        let mut state = ParserState::default();
        let mut events = Vec::new();
        for line in lines {
            let (next, event) = self.step(state, line)?;
            state = next;
            events.extend(event);
        }
        Ok(events)
    }

    fn collect_vote_line(
        &self,
        mut state: ParserState,
        line: &str,
    ) -> Result<(ParserState, Option<LineEvent>), ParseFault> {
        if line.contains(APPOINTMENT_CONFIRMATION) {
            return Ok((ParserState::default(), None));
        }

        if let Some((label, names)) = line.split_once(':') {
            let label = label.trim().to_string();
            state.categories.open(label.clone(), split_names(names));
            state.current = Some(label);
            return Ok((state, None));
        }

        if is_disposition(line) {
            return self.conclude(state, line);
        }

        if let Some(label) = state.current.clone() {
            state.categories.extend(&label, split_names(line));
        }
        Ok((state, None))
    }

    fn conclude(
        &self,
        state: ParserState,
        line: &str,
    ) -> Result<(ParserState, Option<LineEvent>), ParseFault> {
        let bill = match last_bill_reference(line) {
            Some(bill) if !state.motion.trim().is_empty() => bill,
            _ => {
                let warning = DataQualityWarning::MissingBillOrMotion {
                    motion: state.motion,
                    line: line.trim().to_string(),
                };
                return Ok((ParserState::default(), Some(LineEvent::Discarded(warning))));
            }
        };

        if state.motion.contains("YEAS:") || state.motion.contains("NAYS:") {
            return Err(ParseFault::VoteDataInMotion {
                motion: state.motion,
            });
        }

        let record = VoteRecord::build(self.ctx, &state.motion, &state.categories, &bill);
        Ok((ParserState::default(), Some(LineEvent::Vote(record))))
    }
}

fn split_names(text: &str) -> Vec<String> {
    text.split(';').map(|name| name.trim().to_string()).collect()
}
