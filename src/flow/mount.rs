//! Lazy mount, never unmount.
//!
//! A step's content is created the first time the step becomes current and
//! stays in the render tree for the rest of the controller's life. The wizard
//! renders every opened step and hides the inactive ones; the tab view leaves
//! retention to the host tab container, which keeps every pane alive.

use std::collections::BTreeSet;

use crate::domain::{NavigationMode, StepKey};

/// How opened content is kept alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStrategy {
    /// Render opened panes, toggle visibility
    HideInactive,
    /// Host container retains its own panes
    HostRetained,
}

impl From<NavigationMode> for MountStrategy {
    fn from(mode: NavigationMode) -> Self {
        match mode {
            NavigationMode::Wizard => MountStrategy::HideInactive,
            NavigationMode::TabView => MountStrategy::HostRetained,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LazyMountCache {
    strategy: MountStrategy,
    opened: BTreeSet<usize>,
}

impl LazyMountCache {
    pub fn new(strategy: MountStrategy, initial: usize) -> Self {
        Self {
            strategy,
            opened: BTreeSet::from([initial]),
        }
    }

    pub fn strategy(&self) -> MountStrategy {
        self.strategy
    }

    pub fn should_mount(&self, index: usize) -> bool {
        match self.strategy {
            MountStrategy::HostRetained => true,
            MountStrategy::HideInactive => self.opened.contains(&index),
        }
    }

    /// Records `index` as opened. Returns `true` the first time.
    pub fn mark_opened(&mut self, index: usize) -> bool {
        let inserted = self.opened.insert(index);
        if inserted {
            tracing::debug!(index, "step opened");
        }
        inserted
    }

    pub fn is_opened(&self, index: usize) -> bool {
        self.opened.contains(&index)
    }

    pub fn opened(&self) -> Vec<usize> {
        self.opened.iter().copied().collect()
    }

    /// Whether a direct jump from `current` to `target` is allowed.
    ///
    /// Tabs are freely selectable. The wizard only jumps back, or forward
    /// to a step that was already reached through a commit.
    pub fn permits_jump(&self, current: usize, target: usize) -> bool {
        match self.strategy {
            MountStrategy::HostRetained => true,
            MountStrategy::HideInactive => target <= current || self.opened.contains(&target),
        }
    }
}

/// Render state of one visible step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneState {
    pub index: usize,
    pub key: StepKey,
    /// Content is present in the render tree
    pub mounted: bool,
    /// Content is the one on screen
    pub active: bool,
}
