mod attempt;
mod home;
mod quiz_list;
mod results;
mod state;

pub use attempt::AttemptView;
pub use home::HomeView;
pub use quiz_list::QuizListView;
pub use results::ResultsPage;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
