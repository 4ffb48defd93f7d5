pub mod app;
pub mod context;
pub mod navigation;
pub mod routes;
pub mod toasts;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
