use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let file_id = ctx.current_file_id().to_string();

    rsx! {
        div { class: "page",
            h2 { "Home" }
            p { "Study file: {file_id}" }
            Link { class: "cta", to: Route::QuizList { file_id: file_id.clone() }, "Browse quizzes" }
        }
    }
}
