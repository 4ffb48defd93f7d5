use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::FileId;
use services::{AppServices, Clock, QuizCatalogService, QuizStore};
use ui::{App, UiApp, build_app_context};

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn current_file_id(&self) -> FileId {
        self.services.file_id().clone()
    }

    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn attempt_store(&self) -> Arc<dyn QuizStore> {
        self.services.attempt_store()
    }

    fn catalog(&self) -> Arc<QuizCatalogService> {
        self.services.catalog()
    }
}

/// Hand the services to the UI and block on the desktop event loop.
pub fn launch(services: AppServices) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learn Lab")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}
