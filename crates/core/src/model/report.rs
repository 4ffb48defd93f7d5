use crate::model::attempt::{Attempt, AttemptScore};
use crate::model::ids::{AttemptId, QuestionId, QuizId};
use crate::model::quiz::{Question, Quiz};
use crate::model::response::Responses;

/// One row of the per-question review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub position: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub time_spent_secs: u32,
    pub explanation: Option<String>,
}

/// Aggregate results of an attempt, derived from quiz/attempt/questions/responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub attempt_id: AttemptId,
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub total_time_secs: u64,
    pub reviews: Vec<QuestionReview>,
}

impl AttemptReport {
    /// Build the report in question order. Unanswered questions count as wrong.
    #[must_use]
    pub fn build(
        quiz: &Quiz,
        attempt: &Attempt,
        questions: &[Question],
        responses: &Responses,
    ) -> Self {
        let reviews: Vec<QuestionReview> = questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let response = responses.get(question.id());
                QuestionReview {
                    position: idx + 1,
                    question_id: question.id().clone(),
                    prompt: question.prompt().to_string(),
                    your_answer: response.map(|r| r.answer.clone()),
                    correct_answer: question.correct_answer().to_string(),
                    is_correct: response.is_some_and(|r| r.is_correct),
                    time_spent_secs: response.map_or(0, |r| r.time_spent_secs),
                    explanation: question.explanation().map(str::to_string),
                }
            })
            .collect();

        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Self {
            quiz_id: quiz.id().clone(),
            quiz_title: quiz.title().to_string(),
            attempt_id: attempt.id().clone(),
            total: count(reviews.len()),
            answered: count(reviews.iter().filter(|r| r.your_answer.is_some()).count()),
            correct: count(reviews.iter().filter(|r| r.is_correct).count()),
            total_time_secs: reviews.iter().map(|r| u64::from(r.time_spent_secs)).sum(),
            reviews,
        }
    }

    /// Score recomputed from the review rows.
    #[must_use]
    pub fn score(&self) -> AttemptScore {
        AttemptScore::clamped(self.correct, self.total)
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.score().percent()
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total.saturating_sub(self.answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::FileId;
    use crate::model::quiz::AnswerFormat;
    use crate::model::response::Response;
    use crate::time::fixed_now;

    fn qid(raw: &str) -> QuestionId {
        QuestionId::new(raw).unwrap()
    }

    fn fixture() -> (Quiz, Attempt, Vec<Question>) {
        let questions = vec![
            Question::new(
                qid("q1-1"),
                "2 + 2?",
                AnswerFormat::MultipleChoice {
                    options: vec!["3".into(), "4".into()],
                },
                "4",
                Some("Basic arithmetic".into()),
            )
            .unwrap(),
            Question::new(qid("q1-2"), "Rust is fun", AnswerFormat::TrueFalse, "True", None)
                .unwrap(),
            Question::new(qid("q1-3"), "Borrow checker?", AnswerFormat::ShortAnswer, "yes", None)
                .unwrap(),
        ];
        let quiz = Quiz::new(
            QuizId::new("q1").unwrap(),
            FileId::new("f1").unwrap(),
            "Basics",
            None,
            questions.iter().map(|q| q.id().clone()).collect(),
        )
        .unwrap();
        let attempt = Attempt::start(AttemptId::new("a1").unwrap(), quiz.id().clone(), fixed_now());
        (quiz, attempt, questions)
    }

    #[test]
    fn report_counts_answered_and_correct() {
        let (quiz, attempt, questions) = fixture();
        let responses: Responses = [
            Response::new(qid("q1-1"), "4", 12, true),
            Response::new(qid("q1-2"), "False", 5, false),
        ]
        .into_iter()
        .collect();

        let report = AttemptReport::build(&quiz, &attempt, &questions, &responses);

        assert_eq!(report.total, 3);
        assert_eq!(report.answered, 2);
        assert_eq!(report.correct, 1);
        assert_eq!(report.unanswered(), 1);
        assert_eq!(report.total_time_secs, 17);
        assert_eq!(report.percent(), 33);
    }

    #[test]
    fn review_rows_follow_question_order() {
        let (quiz, attempt, questions) = fixture();
        let responses: Responses = [Response::new(qid("q1-3"), "YES", 3, true)]
            .into_iter()
            .collect();

        let report = AttemptReport::build(&quiz, &attempt, &questions, &responses);
        let positions: Vec<_> = report.reviews.iter().map(|r| r.position).collect();

        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(report.reviews[0].your_answer, None);
        assert_eq!(report.reviews[0].explanation.as_deref(), Some("Basic arithmetic"));
        assert!(report.reviews[2].is_correct);
    }
}
