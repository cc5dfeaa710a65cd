//! Step content slots.
//!
//! The flow page does not know what a step edits. It hands every step a
//! [`StepSlot`] and asks the [`StepContents`] factory in context for the view.

use std::sync::Arc;

use access_flow::domain::{ResourceContext, StepCommit, StepKey};
use access_flow::flow::FlowController;
use leptos::prelude::*;

/// What a step's content gets from the page
#[derive(Clone)]
pub struct StepSlot {
    pub key: StepKey,
    /// Shared resource context; re-reads whenever the flow changes
    pub context: Signal<ResourceContext>,
    flow: Arc<FlowController>,
}

impl StepSlot {
    pub fn new(key: StepKey, context: Signal<ResourceContext>, flow: Arc<FlowController>) -> Self {
        Self { key, context, flow }
    }

    /// Gates the wizard's "Next" on `handle`.
    pub fn provide_commit(&self, handle: Arc<dyn StepCommit>) {
        self.flow.register_commit(self.key, handle);
    }
}

/// Builds the view of a step. Provide one with `provide_context` to replace
/// the read-only summaries.
#[derive(Clone)]
pub struct StepContents(Arc<dyn Fn(StepSlot) -> AnyView + Send + Sync>);

impl StepContents {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(StepSlot) -> AnyView + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    pub fn render(&self, slot: StepSlot) -> AnyView {
        (self.0)(slot)
    }
}

impl Default for StepContents {
    fn default() -> Self {
        Self::new(|slot| view! { <StepSummary step_slot=slot /> }.into_any())
    }
}

#[component]
fn StepSummary(step_slot: StepSlot) -> impl IntoView {
    let context = step_slot.context;

    view! {
        <div class="space-y-2">
            <h3 class="text-lg font-semibold text-gray-700">{step_slot.key.label()}</h3>
            <div class="grid grid-cols-2 gap-4 text-sm">
                <div>
                    <span class="text-gray-500">"Group: "</span>
                    <span class="font-mono">
                        {move || context.read().group_id.clone().unwrap_or_else(|| "-".to_string())}
                    </span>
                </div>
                <div>
                    <span class="text-gray-500">"Middleware: "</span>
                    <span class="font-mono">
                        {move || {
                            context
                                .read()
                                .middleware_type
                                .map(|m| format!("{:?}", m))
                                .unwrap_or_else(|| "-".to_string())
                        }}
                    </span>
                </div>
            </div>
            <Show when=move || context.read().readonly>
                <p class="text-xs text-gray-400">"This group can no longer be edited."</p>
            </Show>
        </div>
    }
}
