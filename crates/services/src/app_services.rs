use std::sync::Arc;

use quiz_core::model::FileId;
use storage::repository::Storage;

use crate::Clock;
use crate::attempts::AttemptStore;
use crate::catalog_service::QuizCatalogService;
use crate::error::AppServicesError;

/// Assembles app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    file_id: FileId,
    clock: Clock,
    attempt_store: Arc<AttemptStore>,
    catalog: Arc<QuizCatalogService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        file_id: FileId,
        shuffle_questions: bool,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, file_id, shuffle_questions))
    }

    /// Build services over an already-open storage.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        file_id: FileId,
        shuffle_questions: bool,
    ) -> Self {
        let attempt_store = Arc::new(
            AttemptStore::new(
                clock,
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.attempts),
                Arc::clone(&storage.responses),
            )
            .with_shuffle_questions(shuffle_questions),
        );
        let catalog = Arc::new(QuizCatalogService::new(
            Arc::clone(&storage.quizzes),
            Arc::clone(&storage.attempts),
        ));

        Self {
            file_id,
            clock,
            attempt_store,
            catalog,
        }
    }

    /// The study file opened on launch.
    #[must_use]
    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn attempt_store(&self) -> Arc<AttemptStore> {
        Arc::clone(&self.attempt_store)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.catalog)
    }
}
