//! Navigation for a terminal front-end.
//!
//! There are no views to switch to, so navigation becomes a hint on how to
//! recover. The last requested route is kept so commands can adjust their
//! error message.

use std::sync::{Mutex, PoisonError};

use issuer_session::{Navigator, Route};
use tracing::warn;

#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    last: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent route requested, if any.
    #[must_use]
    pub fn last_route(&self) -> Option<Route> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => warn!("session expired, run `issuer-console login`"),
            Route::Home => warn!("permission denied"),
        }
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}
