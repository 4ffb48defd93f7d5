#![forbid(unsafe_code)]

pub mod app_services;
pub mod attempts;
pub mod catalog_service;
pub mod error;
pub mod navigation;
pub mod notify;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use attempts::{
    AttemptFlowController, AttemptProgress, AttemptState, AttemptStore, FlowPhase, QuizStore,
    ResultsPane, ResultsView,
};
pub use catalog_service::{QuizCatalogService, QuizListItem};
pub use error::{AppServicesError, CatalogError, StoreError};
pub use navigation::{Navigator, QuizRoute, RouteParseError};
pub use notify::{Notification, Notifier, Severity};
