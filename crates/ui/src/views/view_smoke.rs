use std::sync::Arc;

use quiz_core::model::{FileId, Question, QuestionId, Quiz, QuizId};
use services::QuizStore;
use storage::repository::{QuizRepository, Storage, StorageError};

use super::test_harness::{
    QUIZ_ID, ViewKind, setup_view_harness, setup_view_harness_with_quiz_repo,
};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_links_to_quiz_list() {
    let mut harness = setup_view_harness(ViewKind::Home).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Study file: f1"), "missing file label in {html}");
    assert!(html.contains("/dashboard/f1/quiz"), "missing quiz list link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_view_smoke_renders_quiz_card() {
    let mut harness = setup_view_harness(ViewKind::QuizList).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Rust basics"), "missing title in {html}");
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(
        html.contains("/dashboard/f1/quiz/q1/attempt"),
        "missing start link in {html}"
    );
}

struct FailingQuizRepo;

#[async_trait::async_trait]
impl QuizRepository for FailingQuizRepo {
    async fn upsert_quiz(&self, _quiz: &Quiz, _questions: &[Question]) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_quiz(&self, _id: &QuizId) -> Result<Quiz, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_questions(&self, _quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_quizzes(&self, _file_id: &FileId, _limit: u32) -> Result<Vec<Quiz>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_quiz_repo(
        ViewKind::QuizList,
        Storage::in_memory(),
        Arc::new(FailingQuizRepo),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Something went wrong. Please try again."),
        "missing error message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_starts_attempt_on_first_question() {
    let mut harness = setup_view_harness(ViewKind::Attempt(QUIZ_ID)).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(harness.store.snapshot().current_attempt.is_some());
    assert!(html.contains("Question 1 of 2"), "missing position in {html}");
    assert!(
        html.contains("Which keyword declares an immutable binding?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("mut"), "missing choices in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_notifies_when_quiz_cannot_start() {
    let mut harness = setup_view_harness(ViewKind::Attempt("missing")).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(harness.store.snapshot().current_attempt.is_none());
    assert!(
        html.contains("Failed to start quiz. Please try again."),
        "missing toast in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_summary() {
    let mut harness = setup_view_harness(ViewKind::Results(None)).await;
    let store = Arc::clone(&harness.store);
    store
        .start_quiz(&QuizId::new(QUIZ_ID).unwrap())
        .await
        .expect("start");
    store
        .submit_response(&QuestionId::new("q1-1").unwrap(), "let", 12)
        .await
        .expect("submit");
    store.complete_quiz().await.expect("complete");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Results"), "missing title in {html}");
    assert!(html.contains("1 / 2"), "missing score in {html}");
    assert!(html.contains("50%"), "missing percentage in {html}");
    assert!(html.contains("View answers"), "missing action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_without_attempt_renders_no_scores() {
    let mut harness = setup_view_harness(ViewKind::Results(Some("a1"))).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(!html.contains("Score"), "unexpected results in {html}");
    assert!(harness.store.snapshot().current_attempt.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_hides_other_attempts() {
    let mut harness = setup_view_harness(ViewKind::Results(Some("not-this-one"))).await;
    let store = Arc::clone(&harness.store);
    store
        .start_quiz(&QuizId::new(QUIZ_ID).unwrap())
        .await
        .expect("start");
    store.complete_quiz().await.expect("complete");

    harness.rebuild();
    let html = harness.render();
    assert!(!html.contains("Score"), "unexpected results in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_hides_unfinished_attempt() {
    let mut harness = setup_view_harness(ViewKind::Results(None)).await;
    let store = Arc::clone(&harness.store);
    store
        .start_quiz(&QuizId::new(QUIZ_ID).unwrap())
        .await
        .expect("start");

    harness.rebuild();
    let html = harness.render();
    assert!(!html.contains("Score"), "unexpected results in {html}");
    assert!(store.snapshot().current_attempt.is_some_and(|a| !a.is_completed()));
}
