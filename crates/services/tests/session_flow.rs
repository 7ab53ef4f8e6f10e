use practice_core::model::{
    AnswerKey, Category, Level, Question, QuestionId, RecordedAnswer, Topic, TopicId,
};
use practice_core::time::{fixed_clock, fixed_now};
use services::SessionLoopService;
use storage::repository::{HistoryRepository, InMemoryRepository};

fn build_topic(count: u32) -> Topic {
    Topic::new(
        TopicId::new(1),
        "Smoke Topic",
        Level::B1,
        Category::Reading,
        count,
    )
    .unwrap()
}

fn build_questions(keys: &[u32]) -> Vec<Question> {
    keys.iter()
        .enumerate()
        .map(|(i, &correct)| {
            Question::new(
                QuestionId::new(i as u64 + 1),
                format!("Q{}", i + 1),
                vec!["a".into(), "b".into(), "c".into()],
                AnswerKey::Choice(correct),
            )
            .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn full_session_persists_history_entry() {
    let repo = InMemoryRepository::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), std::sync::Arc::new(repo.clone()));

    let mut session = loop_svc
        .start_session(build_topic(4), build_questions(&[1, 2, 1, 3]))
        .unwrap();
    assert!(session.is_running());

    // Answer the first three questions, leave the last one open.
    loop_svc.answer_current(&mut session, RecordedAnswer::Choice(0));
    session.jump_to(1);
    loop_svc.answer_current(&mut session, RecordedAnswer::Choice(1));
    session.jump_to(2);
    loop_svc.answer_current(&mut session, RecordedAnswer::Choice(0));
    session.mark_reviewed(3);

    assert!(!session.can_submit());

    let completion = loop_svc.submit(&mut session).await.unwrap();
    assert_eq!(completion.outcome.correct(), 3);
    assert_eq!(completion.outcome.wrong(), 0);
    assert_eq!(completion.outcome.skipped(), 1);
    assert_eq!(completion.outcome.percentage(), 75);

    let id = completion.history_id.expect("entry persisted");
    let entry = repo.get_entry(id).await.unwrap();
    assert_eq!(entry.outcome().percentage(), 75);
    assert_eq!(entry.topic().title(), "Smoke Topic");
    assert_eq!(entry.answers().answered_count(), 3);
    assert_eq!(entry.completed_at(), fixed_now());

    assert_eq!(repo.list_entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn countdown_expiry_completes_and_persists() {
    let repo = InMemoryRepository::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), std::sync::Arc::new(repo.clone()));

    let mut session = loop_svc
        .start_session(build_topic(2), build_questions(&[1, 2]))
        .unwrap();
    loop_svc.answer_current(&mut session, RecordedAnswer::Choice(0));

    let limit = session.time_limit_secs();
    let mut completion = None;
    for _ in 0..limit {
        if let Some(done) = loop_svc.tick(&mut session).await.unwrap() {
            completion = Some(done);
        }
    }

    let completion = completion.expect("expiry should complete the session");
    assert!(session.is_complete());
    assert_eq!(session.elapsed_secs(), limit);
    assert_eq!(completion.outcome.correct(), 1);
    assert_eq!(completion.outcome.skipped(), 1);

    assert_eq!(repo.list_entries().await.unwrap().len(), 1);
}
