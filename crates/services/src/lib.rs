#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use practice_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    CountdownTimer, HistoryListItem, HistoryService, Navigator, PracticeSession, QuestionStatus,
    SessionCompletion, SessionLoopService, SessionProgress, SessionState,
};
