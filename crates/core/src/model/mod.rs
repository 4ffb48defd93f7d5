mod attempt;
mod ids;
mod quiz;
mod report;
mod response;

pub use ids::{AttemptId, FileId, IdError, QuestionId, QuizId};

pub use attempt::{Attempt, AttemptError, AttemptScore, AttemptStatus};
pub use quiz::{AnswerFormat, Question, Quiz, QuizError};
pub use report::{AttemptReport, QuestionReview};
pub use response::{Response, Responses};
