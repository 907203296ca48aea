mod patterns;
mod record;
mod state;

pub use patterns::{
    BillReference, DATE_FORMAT, DEFAULT_DATE_PATTERN, DEFAULT_HEADER_PATTERN, Patterns,
    is_disposition, last_bill_reference, parse_journal_date,
};
pub use record::{Bucket, Chamber, DocumentContext, SourceLocators, VoteRecord, vote_passed};
pub use state::{Categories, LineEvent, Mode, ParserState, VoteMachine};
