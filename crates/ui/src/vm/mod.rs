mod attempt_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;

pub use attempt_vm::{AnswerInputVm, QuestionVm};
pub use quiz_vm::{QuizCardVm, map_quiz_cards};
pub use results_vm::{ResultsSummaryVm, ReviewRowVm, map_review_rows};
pub use time_fmt::{format_datetime, format_duration_secs};
