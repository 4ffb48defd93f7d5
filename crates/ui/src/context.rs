use std::sync::Arc;

use quiz_core::model::FileId;
use services::{Clock, QuizCatalogService, QuizStore};

/// What the UI needs from the application composition root.
pub trait UiApp: Send + Sync {
    fn current_file_id(&self) -> FileId;
    fn clock(&self) -> Clock;

    fn attempt_store(&self) -> Arc<dyn QuizStore>;
    fn catalog(&self) -> Arc<QuizCatalogService>;
}

#[derive(Clone)]
pub struct AppContext {
    current_file_id: FileId,
    clock: Clock,

    attempt_store: Arc<dyn QuizStore>,
    catalog: Arc<QuizCatalogService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            current_file_id: app.current_file_id(),
            clock: app.clock(),
            attempt_store: app.attempt_store(),
            catalog: app.catalog(),
        }
    }

    #[must_use]
    pub fn current_file_id(&self) -> FileId {
        self.current_file_id.clone()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Shared by every page so an attempt survives the move to its results.
    #[must_use]
    pub fn attempt_store(&self) -> Arc<dyn QuizStore> {
        Arc::clone(&self.attempt_store)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.catalog)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
