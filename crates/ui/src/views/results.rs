use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::AttemptId;
use services::ResultsView;

use super::attempt::{UiFlow, parse_route_ids};
use crate::context::AppContext;
use crate::navigation::RouterNavigator;
use crate::toasts::Toasts;
use crate::views::ViewError;
use crate::vm::{ResultsSummaryVm, ReviewRowVm, map_review_rows};

#[component]
pub fn ResultsPage(file_id: String, quiz_id: String, attempt_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let toasts = use_context::<Toasts>();
    let navigator = use_navigator();

    let flow = use_hook(|| {
        let (file_id, quiz_id) = parse_route_ids(&file_id, &quiz_id).ok()?;
        let attempt_id = AttemptId::new(&attempt_id).ok()?;
        Some(
            Rc::new(
                UiFlow::for_results(
                    file_id,
                    quiz_id,
                    attempt_id,
                    ctx.attempt_store(),
                    RouterNavigator::new(navigator),
                    toasts,
                )
                .with_clock(ctx.clock()),
            ),
        )
    });

    let mut tick = use_signal(|| 0_u64);
    let mut busy = use_signal(|| false);

    {
        let flow = flow.clone();
        use_effect(move || {
            if let Some(flow) = flow.as_ref() {
                flow.guard_results();
            }
        });
    }

    let _ = tick();

    let Some(flow) = flow else {
        let message = ViewError::InvalidRoute.message();
        return rsx! {
            div { class: "page",
                p { class: "error", "{message}" }
            }
        };
    };

    let view_flow = Rc::clone(&flow);
    let retry_flow = Rc::clone(&flow);
    let return_flow = Rc::clone(&flow);
    let back_flow = Rc::clone(&flow);

    match flow.results_view() {
        ResultsView::Redirect => rsx! {
            div { class: "page",
                p { "Returning to quizzes..." }
            }
        },
        ResultsView::Summary(report) => {
            let summary = ResultsSummaryVm::from(&report);
            rsx! {
                div { class: "page results",
                    h2 { "Results" }
                    p { class: "results-quiz", "{summary.quiz_title}" }
                    p { class: "results-attempt", "Attempt {attempt_id}" }
                    dl { class: "results-summary",
                        dt { "Score" }
                        dd { "{summary.score_label}" }
                        dt { "Percentage" }
                        dd { "{summary.percent}%" }
                        dt { "Answered" }
                        dd { "{summary.answered_label}" }
                        dt { "Time" }
                        dd { "{summary.time_label}" }
                    }
                    div { class: "results-actions",
                        button {
                            r#type: "button",
                            disabled: busy(),
                            onclick: move |_| {
                                view_flow.on_view_answers();
                                tick += 1;
                            },
                            "View answers"
                        }
                        button {
                            r#type: "button",
                            class: "primary",
                            disabled: busy(),
                            onclick: move |_| {
                                let flow = Rc::clone(&retry_flow);
                                spawn(async move {
                                    busy.set(true);
                                    flow.on_retry().await;
                                    busy.set(false);
                                    tick += 1;
                                });
                            },
                            "Retry"
                        }
                        button {
                            r#type: "button",
                            class: "secondary",
                            disabled: busy(),
                            onclick: move |_| return_flow.on_return(),
                            "Back to quizzes"
                        }
                    }
                }
            }
        }
        ResultsView::Detail(report) => {
            let rows = map_review_rows(&report);
            rsx! {
                div { class: "page results",
                    h2 { "Your answers" }
                    ol { class: "review-list",
                        for row in rows {
                            ReviewRow { key: "{row.position}", row }
                        }
                    }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            back_flow.on_back();
                            tick += 1;
                        },
                        "Back to summary"
                    }
                }
            }
        }
    }
}

#[component]
fn ReviewRow(row: ReviewRowVm) -> Element {
    let verdict = if row.is_correct { "correct" } else { "incorrect" };

    rsx! {
        li { class: "review review--{verdict}",
            p { class: "review-prompt", "{row.position}. {row.prompt}" }
            p { "Your answer: {row.your_answer}" }
            if !row.is_correct {
                p { "Correct answer: {row.correct_answer}" }
            }
            p { class: "review-time", "Time: {row.time_label}" }
            if let Some(explanation) = row.explanation.as_ref() {
                p { class: "review-explanation", "{explanation}" }
            }
        }
    }
}
