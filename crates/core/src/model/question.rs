use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::media::MediaUri;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a choice question needs at least two options")]
    NotEnoughOptions,

    #[error("option text cannot be empty")]
    EmptyOption,

    #[error("correct option {correct} is outside 1..={options}")]
    CorrectOptionOutOfRange { correct: u32, options: usize },

    #[error("expected answer text cannot be empty")]
    EmptyExpectedText,

    #[error("a free-text question cannot carry options")]
    UnexpectedOptions,
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// The reference a recorded answer is checked against.
///
/// Catalog data numbers choice keys from 1, so `Choice` keeps the 1-based
/// index; recorded answers use 0-based option positions and the comparison
/// bridges the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
    /// 1-based index into the question's option list.
    Choice(u32),
    /// Exact-match free text.
    Text(String),
}

/// Answer a learner recorded for one question position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedAnswer {
    /// 0-based index into the question's option list.
    Choice(usize),
    /// Typed free text.
    Text(String),
}

//
// ─── AUXILIARY CONTENT ─────────────────────────────────────────────────────────
//

/// Explanatory material attached to a question.
///
/// None of this participates in scoring; it is carried for the review and
/// feedback collaborators and persisted with the question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAid {
    pub explanation: Option<String>,
    pub transcript: Option<String>,
    pub translation: Option<String>,
    pub media: Option<MediaUri>,
}

impl QuestionAid {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explanation.is_none()
            && self.transcript.is_none()
            && self.translation.is_none()
            && self.media.is_none()
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One immutable assessment item.
///
/// Option order is part of the question's identity: positions are stable
/// across renders, and both the answer key and recorded answers refer to
/// options by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    key: AnswerKey,
    aid: QuestionAid,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is empty, a choice key does
    /// not fit its option list, options are missing or blank, or a free-text
    /// question carries options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        key: AnswerKey,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        match &key {
            AnswerKey::Choice(correct) => {
                if options.len() < 2 {
                    return Err(QuestionError::NotEnoughOptions);
                }
                if options.iter().any(|o| o.trim().is_empty()) {
                    return Err(QuestionError::EmptyOption);
                }
                if *correct == 0 || *correct as usize > options.len() {
                    return Err(QuestionError::CorrectOptionOutOfRange {
                        correct: *correct,
                        options: options.len(),
                    });
                }
            }
            AnswerKey::Text(expected) => {
                if expected.trim().is_empty() {
                    return Err(QuestionError::EmptyExpectedText);
                }
                if !options.is_empty() {
                    return Err(QuestionError::UnexpectedOptions);
                }
            }
        }

        Ok(Self {
            id,
            prompt: prompt.trim().to_owned(),
            options,
            key,
            aid: QuestionAid::default(),
        })
    }

    /// Attaches auxiliary content.
    #[must_use]
    pub fn with_aid(mut self, aid: QuestionAid) -> Self {
        self.aid = aid;
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    #[must_use]
    pub fn aid(&self) -> &QuestionAid {
        &self.aid
    }

    /// Checks a recorded answer against this question's key.
    ///
    /// One rule, applied everywhere: choice answers match when the 0-based
    /// recorded index equals the 1-based key minus one; text answers match
    /// on trimmed, case-sensitive equality. An answer of the wrong kind for
    /// the question never matches.
    #[must_use]
    pub fn accepts(&self, answer: &RecordedAnswer) -> bool {
        match (&self.key, answer) {
            (AnswerKey::Choice(correct), RecordedAnswer::Choice(picked)) => {
                *picked == (*correct as usize) - 1
            }
            (AnswerKey::Text(expected), RecordedAnswer::Text(given)) => {
                given.trim() == expected.trim()
            }
            _ => false,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn question_rejects_empty_prompt() {
        let err = Question::new(QuestionId::new(1), "  ", options(3), AnswerKey::Choice(1))
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn choice_question_needs_two_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick one",
            options(1),
            AnswerKey::Choice(1),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::NotEnoughOptions);
    }

    #[test]
    fn choice_key_must_fit_option_list() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick one",
            options(3),
            AnswerKey::Choice(4),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectOptionOutOfRange {
                correct: 4,
                options: 3
            }
        ));

        let err = Question::new(
            QuestionId::new(1),
            "Pick one",
            options(3),
            AnswerKey::Choice(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectOptionOutOfRange { correct: 0, .. }
        ));
    }

    #[test]
    fn text_question_rejects_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Translate: hello",
            options(2),
            AnswerKey::Text("hallo".into()),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnexpectedOptions);
    }

    #[test]
    fn text_question_rejects_blank_expected() {
        let err = Question::new(
            QuestionId::new(1),
            "Translate: hello",
            Vec::new(),
            AnswerKey::Text("   ".into()),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyExpectedText);
    }

    #[test]
    fn choice_comparison_bridges_one_based_key() {
        let q = Question::new(
            QuestionId::new(1),
            "Pick one",
            options(3),
            AnswerKey::Choice(2),
        )
        .unwrap();

        assert!(q.accepts(&RecordedAnswer::Choice(1)));
        assert!(!q.accepts(&RecordedAnswer::Choice(2)));
        assert!(!q.accepts(&RecordedAnswer::Text("option 2".into())));
    }

    #[test]
    fn text_comparison_trims_but_keeps_case() {
        let q = Question::new(
            QuestionId::new(1),
            "Translate: hello",
            Vec::new(),
            AnswerKey::Text("hallo".into()),
        )
        .unwrap();

        assert!(q.accepts(&RecordedAnswer::Text("  hallo ".into())));
        assert!(!q.accepts(&RecordedAnswer::Text("Hallo".into())));
        assert!(!q.accepts(&RecordedAnswer::Choice(0)));
    }

    #[test]
    fn aid_travels_with_question() {
        let aid = QuestionAid {
            transcript: Some("Guten Tag, wie geht es Ihnen?".into()),
            ..QuestionAid::default()
        };
        let q = Question::new(
            QuestionId::new(1),
            "What did the speaker say?",
            options(4),
            AnswerKey::Choice(3),
        )
        .unwrap()
        .with_aid(aid.clone());

        assert_eq!(q.aid(), &aid);
        assert!(!q.aid().is_empty());
    }
}
