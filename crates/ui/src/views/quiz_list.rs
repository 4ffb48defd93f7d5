use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::FileId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, map_quiz_cards};

const QUIZ_LIST_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq)]
struct QuizListData {
    cards: Vec<QuizCardVm>,
}

#[component]
pub fn QuizListView(file_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let raw_file_id = file_id.clone();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let raw_file_id = raw_file_id.clone();
        async move {
            let file_id = FileId::new(&raw_file_id).map_err(|_| ViewError::InvalidRoute)?;
            let items = catalog
                .list_quizzes(&file_id, QUIZ_LIST_LIMIT)
                .await
                .map_err(|err| {
                    tracing::warn!(error = %err, "failed to list quizzes");
                    ViewError::Unknown
                })?;
            Ok(QuizListData {
                cards: map_quiz_cards(&items),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quizzes" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No quizzes for this file yet." }
                    } else {
                        ul { class: "quiz-list",
                            for card in data.cards {
                                QuizCard { file_id: file_id.clone(), card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn QuizCard(file_id: String, card: QuizCardVm) -> Element {
    rsx! {
        li { class: "quiz-card",
            h3 { "{card.title}" }
            if let Some(description) = card.description.as_ref() {
                p { class: "quiz-description", "{description}" }
            }
            p { class: "quiz-meta", "{card.question_count} questions" }
            if let Some(last) = card.last_result.as_ref() {
                p { class: "quiz-last", "{last}" }
            }
            Link {
                class: "cta",
                to: Route::Attempt { file_id, quiz_id: card.quiz_id.clone() },
                "Start quiz"
            }
        }
    }
}
