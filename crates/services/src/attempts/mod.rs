//! Quiz attempt state, its store, and the controller that drives it.

mod flow;
mod state;
mod store;

pub use flow::{AttemptFlowController, FlowPhase, ResultsPane, ResultsView};
pub use state::{AttemptProgress, AttemptState};
pub use store::{AttemptStore, QuizStore};
