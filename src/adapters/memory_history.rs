use std::sync::Mutex;

use crate::domain::{Navigator, Route};

/// Browser-less history stack used by the CLI and by tests.
pub struct MemoryHistory {
    entries: Mutex<Vec<Route>>,
}

impl MemoryHistory {
    pub fn new(href: &str) -> Self {
        Self {
            entries: Mutex::new(vec![Route::parse(href)]),
        }
    }

    /// Every route visited, oldest first.
    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Pops the newest entry, like the browser's back button.
    pub fn go_back(&self) -> Option<Route> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if entries.len() > 1 {
            entries.pop()
        } else {
            None
        }
    }
}

impl Navigator for MemoryHistory {
    fn current(&self) -> Route {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .last()
            .cloned()
            .unwrap_or_else(|| Route::new("/", None))
    }

    fn push(&self, route: Route) {
        tracing::debug!(href = %route.to_href(), "route pushed");
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(route);
    }
}
