//! Step/tab navigation controller for the access flow.
//!
//! [`FlowController`] unifies the creation wizard and the tab view of an
//! existing group behind one API:
//!
//! - the visible steps are derived from the resource context on every read
//! - the cursor is backed by the route (wizard) or by memory (tab view)
//! - content is mounted lazily and never unmounted
//! - forward progress in the wizard waits on the active step's commit
//!
//! All operations run on a single cooperative event loop. The only
//! suspension points are a step commit, the submit call and the enrichment
//! fetch; the busy flag keeps transitions from overlapping.

pub mod cursor;
pub mod mount;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::domain::{
    AccessBackend, CommitOutcome, FlowListener, NavigationMode, Navigator, Notice,
    ResourceContext, Route, RouteTable, Step, StepCommit, StepKey, StepRegistry,
};
use crate::error::{FlowError, FlowResult};

use cursor::{cursor_for, StepCursor};
use mount::{LazyMountCache, MountStrategy, PaneState};

pub const SUBMITTED_MESSAGE: &str = "Submitted successfully";

/// Result of a successful [`FlowController::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to step `to` by pushing `route`
    Advanced { to: usize, route: Route },
    /// The last step was submitted and the listing was pushed
    Submitted,
}

/// Footer controls of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub show_previous: bool,
    pub previous_disabled: bool,
    pub show_next: bool,
    pub next_loading: bool,
    pub show_submit: bool,
    pub submit_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enrichment {
    Pending,
    InFlight,
    Done,
}

struct FlowState {
    cursor: Box<dyn StepCursor>,
    mounts: LazyMountCache,
    context: ResourceContext,
    busy: bool,
    enrichment: Enrichment,
    detached: bool,
}

impl FlowState {
    fn visible_steps(&self) -> Vec<Step> {
        StepRegistry::visible_steps(self.context.readonly, self.context.is_create)
    }

    fn current(&self) -> usize {
        let len = self.visible_steps().len();
        self.cursor.position().min(len.saturating_sub(1))
    }
}

/// Everything the controller talks to outside itself
#[derive(Clone)]
pub struct FlowPorts {
    pub navigator: Arc<dyn Navigator>,
    pub backend: Arc<dyn AccessBackend>,
    pub listener: Arc<dyn FlowListener>,
}

pub struct FlowController {
    mode: NavigationMode,
    routes: RouteTable,
    ports: FlowPorts,
    state: Mutex<FlowState>,
    commits: Mutex<HashMap<StepKey, Arc<dyn StepCommit>>>,
}

/// Holds the busy flag for one transition and clears it when dropped.
struct BusyGuard<'a> {
    flow: &'a FlowController,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flow.state().busy = false;
        self.flow.ports.listener.changed();
    }
}

impl FlowController {
    /// Builds a controller for the route the navigator is showing.
    ///
    /// The navigation mode, the group id and the initial step are all read
    /// from that route, once.
    pub fn new(routes: RouteTable, ports: FlowPorts) -> Self {
        let here = ports.navigator.current();
        let mode = routes.mode_for(&here.path);
        let context = ResourceContext::new(routes.group_id(&here.path), mode.is_create());
        let cursor = cursor_for(mode, ports.navigator.clone());

        let len = StepRegistry::visible_steps(context.readonly, context.is_create).len();
        let initial = cursor.position().min(len.saturating_sub(1));
        let mounts = LazyMountCache::new(MountStrategy::from(mode), initial);

        debug!(?mode, initial, group_id = ?context.group_id, "flow created");

        Self {
            mode,
            routes,
            ports,
            state: Mutex::new(FlowState {
                cursor,
                mounts,
                context,
                busy: false,
                enrichment: Enrichment::Pending,
                detached: false,
            }),
            commits: Mutex::new(HashMap::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn context(&self) -> ResourceContext {
        self.state().context.clone()
    }

    pub fn visible_steps(&self) -> Vec<Step> {
        self.state().visible_steps()
    }

    /// Current step, always within the visible steps.
    pub fn current(&self) -> usize {
        self.state().current()
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    pub fn is_opened(&self, index: usize) -> bool {
        self.state().mounts.is_opened(index)
    }

    pub fn opened(&self) -> Vec<usize> {
        self.state().mounts.opened()
    }

    /// Render model: one entry per visible step.
    pub fn panes(&self) -> Vec<PaneState> {
        let state = self.state();
        let current = state.current();
        state
            .visible_steps()
            .into_iter()
            .enumerate()
            .map(|(index, step)| PaneState {
                index,
                key: step.key,
                mounted: state.mounts.should_mount(index),
                active: index == current,
            })
            .collect()
    }

    /// Footer controls, wizard only.
    pub fn footer(&self) -> Option<Footer> {
        if !self.mode.shows_footer() {
            return None;
        }
        let state = self.state();
        let current = state.current();
        let last = state.visible_steps().len().saturating_sub(1);
        Some(Footer {
            show_previous: current > 0,
            previous_disabled: state.busy,
            show_next: current != last,
            next_loading: state.busy,
            show_submit: current == last,
            submit_loading: state.busy,
        })
    }

    pub fn breadcrumb(&self) -> String {
        match self.mode {
            NavigationMode::Wizard => "New Access".to_string(),
            NavigationMode::TabView => format!(
                "Access Detail {}",
                self.state().context.group_id.clone().unwrap_or_default()
            ),
        }
    }

    /// Registers the commit capability of a step's content.
    pub fn register_commit(&self, key: StepKey, handle: Arc<dyn StepCommit>) {
        self.commits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, handle);
    }

    fn commit_handle(&self, key: StepKey) -> Option<Arc<dyn StepCommit>> {
        self.commits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
            .cloned()
    }

    /// Re-reads the cursor after an external route change and records it
    /// as opened.
    pub fn sync(&self) {
        let opened = {
            let mut state = self.state();
            let current = state.current();
            state.mounts.mark_opened(current)
        };
        if opened {
            self.ports.listener.changed();
        }
    }

    /// Stops the controller; outstanding operations resolve without effect.
    pub fn teardown(&self) {
        self.state().detached = true;
        debug!("flow torn down");
    }

    fn is_detached(&self) -> bool {
        self.state().detached
    }

    /// Takes the busy flag for a transition out of step `index`.
    fn acquire_at(&self, index: usize) -> FlowResult<BusyGuard<'_>> {
        {
            let mut state = self.state();
            if state.detached {
                return Err(FlowError::Detached);
            }
            if state.busy {
                return Err(FlowError::Busy);
            }
            let current = state.current();
            if index != current {
                return Err(FlowError::NotCurrentStep { index, current });
            }
            state.busy = true;
        }
        self.ports.listener.changed();
        Ok(BusyGuard { flow: self })
    }

    fn report(&self, err: FlowError) -> FlowError {
        warn!(error = %err, "flow operation failed");
        if let Some(message) = err.notice_message() {
            self.ports.listener.notice(Notice::Error(message));
        }
        err
    }

    /// Moves the cursor to `index` and records it; no commit is involved.
    fn move_to(&self, index: usize) {
        let pushed = {
            let mut state = self.state();
            let here = self.ports.navigator.current();
            let pushed = state.cursor.select(index, &here);
            state.mounts.mark_opened(index);
            pushed
        };
        if let Some(route) = pushed {
            self.ports.navigator.push(route);
        }
        debug!(index, "cursor moved");
        self.ports.listener.changed();
    }

    /// Direct selection through a tab header or the step indicator.
    ///
    /// Tabs are freely selectable. The wizard only accepts steps at or
    /// before the cursor, or steps already opened.
    pub fn select(&self, index: usize) -> FlowResult<()> {
        {
            let state = self.state();
            let len = state.visible_steps().len();
            if index >= len {
                return Err(FlowError::StepOutOfRange { index, len });
            }
            if state.busy {
                return Err(FlowError::Busy);
            }
            if !state.mounts.permits_jump(state.current(), index) {
                return Err(FlowError::StepNotOpened(index));
            }
        }
        self.move_to(index);
        Ok(())
    }

    /// Goes from step `index` to the previous one, without validation.
    ///
    /// `index` must be the current step.
    pub fn back(&self, index: usize) -> FlowResult<()> {
        if index == 0 {
            return Err(FlowError::NoPreviousStep);
        }
        {
            let state = self.state();
            let len = state.visible_steps().len();
            if index >= len {
                return Err(FlowError::StepOutOfRange { index, len });
            }
            if state.busy {
                return Err(FlowError::Busy);
            }
            let current = state.current();
            if index != current {
                return Err(FlowError::NotCurrentStep { index, current });
            }
        }
        self.move_to(index - 1);
        Ok(())
    }

    /// Commits step `index` and moves to the next one.
    ///
    /// `index` must be the current step. On the last visible step this
    /// submits the group instead. A rejected commit leaves cursor, opened
    /// steps and context untouched.
    pub async fn advance(&self, index: usize) -> FlowResult<Transition> {
        let len = self.visible_steps().len();
        if index >= len {
            return Err(FlowError::StepOutOfRange { index, len });
        }
        let _busy = self.acquire_at(index)?;
        if index + 1 == len {
            self.start_processing().await?;
            return Ok(Transition::Submitted);
        }

        let key = self.visible_steps()[index].key;

        let outcome = match self.commit_handle(key) {
            Some(handle) => handle.commit().await,
            None => Ok(CommitOutcome::default()),
        };
        if self.is_detached() {
            return Err(FlowError::Detached);
        }
        let outcome = outcome.map_err(|err| self.report(err.into()))?;

        let next = index + 1;
        let route = {
            let mut state = self.state();
            if index == 0 && state.context.is_create {
                state.context.capture(&outcome);
            }
            let route = self
                .routes
                .step_route(self.mode, state.context.group_id.as_deref(), next);
            state.cursor.follow(&route);
            state.mounts.mark_opened(next);
            route
        };

        self.ports.navigator.push(route.clone());
        info!(step = ?key, to = next, route = %route.to_href(), "step committed");
        self.ports.listener.changed();

        Ok(Transition::Advanced { to: next, route })
    }

    /// Submits the group from the last visible step.
    pub async fn submit(&self) -> FlowResult<()> {
        let last = {
            let state = self.state();
            let last = state.visible_steps().len().saturating_sub(1);
            if state.current() != last {
                return Err(FlowError::NotOnFinalStep);
            }
            last
        };
        let _busy = self.acquire_at(last)?;
        self.start_processing().await
    }

    /// Caller holds the busy flag.
    async fn start_processing(&self) -> FlowResult<()> {
        let group_id = self
            .context()
            .group_id
            .ok_or(FlowError::MissingGroupId)
            .map_err(|err| self.report(err))?;

        let result = self.ports.backend.start_process(&group_id).await;
        if self.is_detached() {
            return Err(FlowError::Detached);
        }
        result.map_err(|err| self.report(err.into()))?;

        info!(%group_id, "access group submitted");
        self.ports
            .listener
            .notice(Notice::Success(SUBMITTED_MESSAGE.to_string()));
        self.ports.navigator.push(self.routes.listing_route());
        Ok(())
    }

    /// Whether [`FlowController::enrich`] would fetch right now.
    pub fn needs_enrichment(&self) -> bool {
        let state = self.state();
        state.enrichment == Enrichment::Pending && state.context.needs_enrichment()
    }

    /// One-shot fetch of the group's sub-type and status.
    ///
    /// Runs only while the id is known and the sub-type is not; once it has
    /// succeeded it never runs again. Returns whether a fetch happened.
    pub async fn enrich(&self) -> FlowResult<bool> {
        let group_id = {
            let mut state = self.state();
            if state.detached
                || state.enrichment != Enrichment::Pending
                || !state.context.needs_enrichment()
            {
                return Ok(false);
            }
            state.enrichment = Enrichment::InFlight;
            state.context.group_id.clone()
        };
        let Some(group_id) = group_id else {
            return Ok(false);
        };

        let result = self.ports.backend.fetch_group(&group_id).await;

        let mut state = self.state();
        if state.detached {
            return Err(FlowError::Detached);
        }
        match result {
            Ok(group) => {
                state.context.enrich(&group);
                state.enrichment = Enrichment::Done;
                let readonly = state.context.readonly;
                drop(state);
                info!(%group_id, middleware_type = ?group.middleware_type, readonly, "group enriched");
                self.ports.listener.changed();
                Ok(true)
            }
            Err(err) => {
                state.enrichment = Enrichment::Pending;
                drop(state);
                Err(self.report(err.into()))
            }
        }
    }

    /// Leaves the flow for the listing page.
    pub fn leave(&self) {
        self.ports.navigator.push(self.routes.listing_route());
    }
}
