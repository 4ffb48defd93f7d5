use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{AnswerFormat, FileId, Question, QuestionId, Quiz, QuizId};
use quiz_core::time::fixed_now;
use services::{AttemptStore, Clock, QuizCatalogService, QuizStore};
use storage::repository::{QuizRepository, Storage};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::toasts::{ToastRegion, Toasts};
use crate::views::{AttemptView, HomeView, QuizListView, ResultsPage};

pub const FILE_ID: &str = "f1";
pub const QUIZ_ID: &str = "q1";

#[derive(Clone)]
struct TestApp {
    file_id: FileId,
    attempt_store: Arc<dyn QuizStore>,
    catalog: Arc<QuizCatalogService>,
}

impl UiApp for TestApp {
    fn current_file_id(&self) -> FileId {
        self.file_id.clone()
    }

    fn clock(&self) -> Clock {
        Clock::fixed(fixed_now())
    }

    fn attempt_store(&self) -> Arc<dyn QuizStore> {
        Arc::clone(&self.attempt_store)
    }

    fn catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.catalog)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    QuizList,
    Attempt(&'static str),
    /// Results route for the given attempt id, or for the attempt the store
    /// currently holds when `None`.
    Results(Option<&'static str>),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(Toasts::new);
    rsx! {
        Router::<TestRoute> {}
        ToastRegion {}
    }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    #[route("/dashboard/:file_id/quiz")]
    QuizListStub { file_id: String },
    #[route("/dashboard/:file_id/quiz/:quiz_id/attempt")]
    AttemptStub { file_id: String, quiz_id: String },
    #[route("/dashboard/:file_id/quiz/:quiz_id/attempt/:attempt_id/results")]
    ResultsStub { file_id: String, quiz_id: String, attempt_id: String },
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let ctx = use_context::<AppContext>();
    let file_id = FILE_ID.to_string();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::QuizList => rsx! { QuizListView { file_id } },
        ViewKind::Attempt(quiz_id) => rsx! {
            AttemptView { file_id, quiz_id: quiz_id.to_string() }
        },
        ViewKind::Results(attempt_id) => {
            let attempt_id = attempt_id.map_or_else(
                || {
                    ctx.attempt_store()
                        .snapshot()
                        .current_attempt
                        .map_or_else(|| "a1".to_string(), |a| a.id().to_string())
                },
                str::to_string,
            );
            rsx! {
                ResultsPage {
                    file_id,
                    quiz_id: QUIZ_ID.to_string(),
                    attempt_id,
                }
            }
        }
    }
}

#[component]
fn QuizListStub(file_id: String) -> Element {
    rsx! { p { "quiz list stub for {file_id}" } }
}

#[component]
fn AttemptStub(file_id: String, quiz_id: String) -> Element {
    rsx! { p { "attempt stub for {file_id}/{quiz_id}" } }
}

#[component]
fn ResultsStub(file_id: String, quiz_id: String, attempt_id: String) -> Element {
    rsx! { p { "results stub for {file_id}/{quiz_id}/{attempt_id}" } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub store: Arc<dyn QuizStore>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Two-question quiz `q1` in file `f1`.
pub fn sample_quiz() -> (Quiz, Vec<Question>) {
    let questions = vec![
        Question::new(
            QuestionId::new("q1-1").unwrap(),
            "Which keyword declares an immutable binding?",
            AnswerFormat::MultipleChoice {
                options: vec!["let".into(), "mut".into(), "var".into()],
            },
            "let",
            None,
        )
        .unwrap(),
        Question::new(
            QuestionId::new("q1-2").unwrap(),
            "Name the tool that builds Rust crates",
            AnswerFormat::ShortAnswer,
            "cargo",
            Some("Cargo drives rustc for you.".into()),
        )
        .unwrap(),
    ];
    let quiz = Quiz::new(
        QuizId::new(QUIZ_ID).unwrap(),
        FileId::new(FILE_ID).unwrap(),
        "Rust basics",
        Some("Warm-up questions".into()),
        questions.iter().map(|q| q.id().clone()).collect(),
    )
    .unwrap();
    (quiz, questions)
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    let (quiz, questions) = sample_quiz();
    storage
        .quizzes
        .upsert_quiz(&quiz, &questions)
        .await
        .expect("seed quiz");
    let quizzes = Arc::clone(&storage.quizzes);
    setup_view_harness_with_quiz_repo(view, storage, quizzes)
}

pub fn setup_view_harness_with_quiz_repo(
    view: ViewKind,
    storage: Storage,
    quizzes: Arc<dyn QuizRepository>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let store: Arc<dyn QuizStore> = Arc::new(AttemptStore::new(
        clock,
        Arc::clone(&quizzes),
        Arc::clone(&storage.attempts),
        Arc::clone(&storage.responses),
    ));
    let catalog = Arc::new(QuizCatalogService::new(
        quizzes,
        Arc::clone(&storage.attempts),
    ));

    let app = Arc::new(TestApp {
        file_id: FileId::new(FILE_ID).unwrap(),
        attempt_store: Arc::clone(&store),
        catalog,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        store,
    }
}
