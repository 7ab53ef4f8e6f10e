use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic title cannot be empty")]
    EmptyTitle,

    #[error("topic must declare at least one question")]
    InvalidQuestionCount,
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// CEFR proficiency level of an assessment, lowest to highest.
///
/// The ordering is meaningful: the time allotted to a session is a fixed
/// two-tier lookup on the level, not a per-topic setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// Seconds allotted to upper-level sessions (B2 and above).
const UPPER_TIER_SECS: u32 = 1_800;

/// Seconds allotted to lower-level sessions (below B2).
const LOWER_TIER_SECS: u32 = 1_200;

impl Level {
    /// Seconds allotted to a session at this level.
    ///
    /// Upper levels get the longer allotment; the split is fixed policy and
    /// not user-configurable.
    #[must_use]
    pub fn time_limit_secs(self) -> u32 {
        if self >= Level::B2 {
            UPPER_TIER_SECS
        } else {
            LOWER_TIER_SECS
        }
    }

    /// Stable string code used at the persistence boundary.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Level::A1 => "a1",
            Level::A2 => "a2",
            Level::B1 => "b1",
            Level::B2 => "b2",
            Level::C1 => "c1",
            Level::C2 => "c2",
        }
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Skill area an assessment exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Listening,
    Reading,
    Grammar,
    Vocabulary,
}

impl Category {
    /// Stable string code used at the persistence boundary.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Category::Listening => "listening",
            Category::Reading => "reading",
            Category::Grammar => "grammar",
            Category::Vocabulary => "vocabulary",
        }
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// One assessment in the catalog: a named, levelled question set.
///
/// A topic is copied into a session at start and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    title: String,
    level: Level,
    category: Category,
    question_count: u32,
}

impl Topic {
    /// Creates a new Topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyTitle` if the title is empty or
    /// whitespace-only, and `TopicError::InvalidQuestionCount` if the
    /// declared question count is zero.
    pub fn new(
        id: TopicId,
        title: impl Into<String>,
        level: Level,
        category: Category,
        question_count: u32,
    ) -> Result<Self, TopicError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TopicError::EmptyTitle);
        }
        if question_count == 0 {
            return Err(TopicError::InvalidQuestionCount);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            level,
            category,
            question_count,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
