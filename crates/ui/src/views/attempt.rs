use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{FileId, QuizId};
use services::{AttemptFlowController, FlowPhase, QuizStore};

use crate::context::AppContext;
use crate::navigation::RouterNavigator;
use crate::toasts::Toasts;
use crate::views::ViewError;
use crate::vm::{AnswerInputVm, QuestionVm};

pub(crate) type UiFlow = AttemptFlowController<dyn QuizStore, RouterNavigator, Toasts>;

pub(crate) fn parse_route_ids(file_id: &str, quiz_id: &str) -> Result<(FileId, QuizId), ViewError> {
    let file_id = FileId::new(file_id).map_err(|_| ViewError::InvalidRoute)?;
    let quiz_id = QuizId::new(quiz_id).map_err(|_| ViewError::InvalidRoute)?;
    Ok((file_id, quiz_id))
}

/// Answer already recorded for the question under the cursor.
fn recorded_answer(flow: &UiFlow) -> String {
    let state = flow.state();
    state
        .current_question()
        .and_then(|q| state.responses.get(q.id()))
        .map(|r| r.answer.clone())
        .unwrap_or_default()
}

#[component]
pub fn AttemptView(file_id: String, quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let toasts = use_context::<Toasts>();
    let navigator = use_navigator();

    let flow = use_hook(|| {
        parse_route_ids(&file_id, &quiz_id).ok().map(|(file_id, quiz_id)| {
            Rc::new(
                UiFlow::new(
                    file_id,
                    quiz_id,
                    ctx.attempt_store(),
                    RouterNavigator::new(navigator),
                    toasts,
                )
                .with_clock(ctx.clock()),
            )
        })
    });

    let mut tick = use_signal(|| 0_u64);
    let mut draft = use_signal(String::new);
    let mut busy = use_signal(|| false);

    {
        let flow = flow.clone();
        use_future(move || {
            let flow = flow.clone();
            async move {
                if let Some(flow) = flow {
                    flow.initialize().await;
                    draft.set(recorded_answer(&flow));
                    tick += 1;
                }
            }
        });
    }

    // Controller state is not reactive; reading the tick re-renders after each action.
    let _ = tick();

    let Some(flow) = flow else {
        let message = ViewError::InvalidRoute.message();
        return rsx! {
            div { class: "page",
                p { class: "error", "{message}" }
            }
        };
    };

    let state = flow.state();
    let (Some(question), Some(progress)) = (state.current_question(), state.progress()) else {
        return rsx! {
            div { class: "page",
                p { "Loading quiz..." }
            }
        };
    };

    let vm = QuestionVm::new(question, progress);
    let quiz_title = state
        .current_quiz
        .as_ref()
        .map(|quiz| quiz.title().to_string())
        .unwrap_or_default();
    let answered = state.responses.contains(question.id());
    let locked = busy() || state.is_loading || flow.phase() != FlowPhase::InProgress;
    let can_submit = !locked && !draft.read().trim().is_empty();
    let can_go_back = !locked && progress.position > 1;

    let submit_flow = Rc::clone(&flow);
    let next_flow = Rc::clone(&flow);
    let previous_flow = Rc::clone(&flow);

    rsx! {
        div { class: "page attempt",
            header { class: "attempt-header",
                h2 { "{quiz_title}" }
                p { class: "attempt-position", "{vm.position_label}" }
                div { class: "progress",
                    div { class: "progress-fill", style: "width: {vm.progress_percent}%" }
                }
            }

            section { class: "question",
                p { class: "question-format", "{vm.format_label}" }
                h3 { class: "question-prompt", "{vm.prompt}" }

                match vm.input.clone() {
                    AnswerInputVm::Choices(choices) => rsx! {
                        div { class: "choices",
                            for choice in choices {
                                button {
                                    key: "{choice}",
                                    r#type: "button",
                                    class: if *draft.read() == choice { "choice selected" } else { "choice" },
                                    disabled: locked,
                                    onclick: {
                                        let choice = choice.clone();
                                        move |_| draft.set(choice.clone())
                                    },
                                    "{choice}"
                                }
                            }
                        }
                    },
                    AnswerInputVm::FreeText => rsx! {
                        input {
                            class: "answer-input",
                            r#type: "text",
                            placeholder: "Type your answer",
                            value: "{draft}",
                            disabled: locked,
                            oninput: move |evt: FormEvent| draft.set(evt.value()),
                        }
                    },
                }

                if answered {
                    p { class: "answer-saved", "Answer saved" }
                }
            }

            footer { class: "attempt-actions",
                button {
                    r#type: "button",
                    class: "secondary",
                    disabled: !can_go_back,
                    onclick: move |_| {
                        if previous_flow.on_previous() {
                            draft.set(recorded_answer(&previous_flow));
                            tick += 1;
                        }
                    },
                    "Previous"
                }
                button {
                    r#type: "button",
                    disabled: !can_submit,
                    onclick: move |_| {
                        let flow = Rc::clone(&submit_flow);
                        let answer = draft.read().clone();
                        spawn(async move {
                            busy.set(true);
                            flow.submit_answer(&answer).await;
                            busy.set(false);
                            tick += 1;
                        });
                    },
                    "Submit"
                }
                button {
                    r#type: "button",
                    class: "primary",
                    disabled: locked,
                    onclick: move |_| {
                        let flow = Rc::clone(&next_flow);
                        spawn(async move {
                            busy.set(true);
                            flow.on_next().await;
                            busy.set(false);
                            draft.set(recorded_answer(&flow));
                            tick += 1;
                        });
                    },
                    "{vm.next_label()}"
                }
            }
        }
    }
}
