//! Pure scoring over a question list and an answer ledger.
//!
//! Callable at any point in a session, not only at completion; the result is
//! a fresh value object and the inputs are never touched.

use crate::model::{AnswerLedger, Outcome, Question};

/// Scores the ledger against the question list.
///
/// Each position lands in exactly one bucket: a recorded answer the question
/// accepts is correct, any other recorded answer is wrong, and a position
/// with no recorded answer is skipped — regardless of how navigation moved
/// past it.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerLedger) -> Outcome {
    let mut correct = 0_u32;
    let mut wrong = 0_u32;
    let mut skipped = 0_u32;

    for (position, question) in questions.iter().enumerate() {
        match answers.get(position) {
            Some(answer) if question.accepts(answer) => correct += 1,
            Some(_) => wrong += 1,
            None => skipped += 1,
        }
    }

    Outcome::from_counts(correct, wrong, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKey, QuestionId, RecordedAnswer};

    fn choice_question(id: u64, correct: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            AnswerKey::Choice(correct),
        )
        .unwrap()
    }

    fn text_question(id: u64, expected: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            Vec::new(),
            AnswerKey::Text(expected.into()),
        )
        .unwrap()
    }

    #[test]
    fn empty_ledger_scores_all_skipped() {
        let questions = vec![choice_question(1, 1), choice_question(2, 2)];
        let outcome = score(&questions, &AnswerLedger::new(2));

        assert_eq!(outcome.correct(), 0);
        assert_eq!(outcome.wrong(), 0);
        assert_eq!(outcome.skipped(), 2);
        assert_eq!(outcome.percentage(), 0);
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let questions = vec![choice_question(1, 2), text_question(2, "hallo")];
        let mut ledger = AnswerLedger::new(2);
        ledger.record(0, RecordedAnswer::Choice(1));
        ledger.record(1, RecordedAnswer::Text("hallo".into()));

        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.correct(), 2);
        assert_eq!(outcome.percentage(), 100);
    }

    #[test]
    fn wrong_kind_of_answer_counts_as_wrong() {
        let questions = vec![choice_question(1, 1)];
        let mut ledger = AnswerLedger::new(1);
        ledger.record(0, RecordedAnswer::Text("a".into()));

        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.wrong(), 1);
    }

    #[test]
    fn unanswered_positions_never_count_as_wrong() {
        let questions = vec![
            choice_question(1, 1),
            choice_question(2, 2),
            choice_question(3, 3),
        ];
        let mut ledger = AnswerLedger::new(3);
        ledger.record(1, RecordedAnswer::Choice(0));

        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.correct(), 0);
        assert_eq!(outcome.wrong(), 1);
        assert_eq!(outcome.skipped(), 2);
    }

    #[test]
    fn mixed_session_matches_expected_counts() {
        // Keys 1, 2, 1, 3 (1-based); answers 0, 1, 0 recorded, position 3 left open.
        let questions = vec![
            choice_question(1, 1),
            choice_question(2, 2),
            choice_question(3, 1),
            choice_question(4, 3),
        ];
        let mut ledger = AnswerLedger::new(4);
        ledger.record(0, RecordedAnswer::Choice(0));
        ledger.record(1, RecordedAnswer::Choice(1));
        ledger.record(2, RecordedAnswer::Choice(0));

        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.correct(), 3);
        assert_eq!(outcome.wrong(), 0);
        assert_eq!(outcome.skipped(), 1);
        assert_eq!(outcome.total(), 4);
        assert_eq!(outcome.percentage(), 75);
    }

    #[test]
    fn scoring_is_pure() {
        let questions = vec![choice_question(1, 1)];
        let mut ledger = AnswerLedger::new(1);
        ledger.record(0, RecordedAnswer::Choice(0));
        let before = ledger.clone();

        let first = score(&questions, &ledger);
        let second = score(&questions, &ledger);

        assert_eq!(first, second);
        assert_eq!(ledger, before);
    }
}
