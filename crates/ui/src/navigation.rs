use dioxus_router::Navigator;

use services::QuizRoute;

use crate::routes::Route;

/// Lets the attempt flow drive the Dioxus router.
#[derive(Clone, Copy)]
pub struct RouterNavigator(Navigator);

impl RouterNavigator {
    #[must_use]
    pub fn new(navigator: Navigator) -> Self {
        Self(navigator)
    }
}

impl services::Navigator for RouterNavigator {
    fn navigate(&self, route: QuizRoute) {
        tracing::debug!(path = %route, "navigating");
        let _ = self.0.push(Route::from(route));
    }
}
