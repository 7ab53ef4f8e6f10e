mod history;
mod ids;
mod ledger;
mod media;
mod outcome;
mod question;
mod topic;

pub use history::{HistoryEntry, HistoryEntryError};
pub use ids::{HistoryId, ParseIdError, QuestionId, TopicId};
pub use ledger::{AnswerLedger, LedgerError};
pub use media::{MediaUri, MediaValidationError};
pub use outcome::{Outcome, OutcomeError};
pub use question::{AnswerKey, Question, QuestionAid, QuestionError, RecordedAnswer};
pub use topic::{Category, Level, Topic, TopicError};
