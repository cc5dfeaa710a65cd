//! The current step index and where it is stored.

use std::sync::Arc;

use crate::domain::{NavigationMode, Navigator, Route};

/// Current step, backed by the route or by local memory.
///
/// Moves never touch the navigator directly: a backing that lives in the
/// address bar returns the route to push and the caller pushes it once its
/// own state is settled.
pub trait StepCursor: Send + Sync {
    /// Raw position; the controller clamps it to the visible steps.
    fn position(&self) -> usize;

    /// Moves to `index` on the current path.
    fn select(&mut self, index: usize, here: &Route) -> Option<Route>;

    /// Adopts the step of a route the caller is about to push.
    fn follow(&mut self, route: &Route);
}

/// Wizard cursor: the step indicator of the route is the cursor.
pub struct RouteCursor {
    navigator: Arc<dyn Navigator>,
}

impl RouteCursor {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

impl StepCursor for RouteCursor {
    fn position(&self) -> usize {
        self.navigator.current().step.unwrap_or(0)
    }

    fn select(&mut self, index: usize, here: &Route) -> Option<Route> {
        Some(here.with_step(index))
    }

    fn follow(&mut self, _route: &Route) {}
}

/// Tab-view cursor held in memory, seeded from the route.
pub struct LocalCursor {
    index: usize,
}

impl LocalCursor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl StepCursor for LocalCursor {
    fn position(&self) -> usize {
        self.index
    }

    fn select(&mut self, index: usize, _here: &Route) -> Option<Route> {
        self.index = index;
        None
    }

    fn follow(&mut self, route: &Route) {
        self.index = route.step.unwrap_or(0);
    }
}

/// Picks the backing for `mode`, once, at construction.
pub fn cursor_for(mode: NavigationMode, navigator: Arc<dyn Navigator>) -> Box<dyn StepCursor> {
    match mode {
        NavigationMode::Wizard => Box::new(RouteCursor::new(navigator)),
        NavigationMode::TabView => {
            let initial = navigator.current().step.unwrap_or(0);
            Box::new(LocalCursor::new(initial))
        }
    }
}
