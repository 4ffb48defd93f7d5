use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use services::QuizRoute;

use crate::context::AppContext;
use crate::toasts::ToastRegion;
use crate::views::{AttemptView, HomeView, QuizListView, ResultsPage};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/dashboard/:file_id/quiz", QuizListView)] QuizList { file_id: String },
        #[route("/dashboard/:file_id/quiz/:quiz_id/attempt", AttemptView)]
        Attempt { file_id: String, quiz_id: String },
        #[route("/dashboard/:file_id/quiz/:quiz_id/attempt/:attempt_id/results", ResultsPage)]
        Results { file_id: String, quiz_id: String, attempt_id: String },
}

impl From<QuizRoute> for Route {
    fn from(route: QuizRoute) -> Self {
        match route {
            QuizRoute::QuizList { file_id } => Self::QuizList {
                file_id: file_id.to_string(),
            },
            QuizRoute::Attempt { file_id, quiz_id } => Self::Attempt {
                file_id: file_id.to_string(),
                quiz_id: quiz_id.to_string(),
            },
            QuizRoute::Results {
                file_id,
                quiz_id,
                attempt_id,
            } => Self::Results {
                file_id: file_id.to_string(),
                quiz_id: quiz_id.to_string(),
                attempt_id: attempt_id.to_string(),
            },
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            ToastRegion {}
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let file_id = ctx.current_file_id().to_string();

    rsx! {
        nav { class: "sidebar",
            h1 { "Learn Lab" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::QuizList { file_id }, "Quizzes" } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, FileId, QuizId};

    #[test]
    fn quiz_routes_map_onto_router_paths() {
        let file = FileId::new("f1").unwrap();
        let quiz = QuizId::new("q1").unwrap();
        let attempt = AttemptId::new("a1").unwrap();
        for route in [
            QuizRoute::quiz_list(&file),
            QuizRoute::attempt(&file, &quiz),
            QuizRoute::results(&file, &quiz, &attempt),
        ] {
            let path = route.path();
            assert_eq!(Route::from(route).to_string(), path);
        }
    }
}
