//! The access flow page: wizard for new groups, tabs for existing ones.

use std::sync::Arc;

use access_flow::domain::{FlowListener, NavigationMode, Notice, RouteTable, Step, StepKey};
use access_flow::flow::mount::PaneState;
use access_flow::flow::{FlowController, FlowPorts, Footer};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use super::notice::NoticeBoard;
use super::step_panel::{StepContents, StepSlot};
use crate::api::ManagerApi;
use crate::navigator::RouterNavigator;

const PRIMARY: &str = "bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded disabled:opacity-50";
const SECONDARY: &str = "bg-white border text-gray-700 px-4 py-2 rounded hover:bg-gray-50 disabled:opacity-50";

/// Bridges controller callbacks into the reactive graph.
struct PageListener {
    version: RwSignal<u64>,
    notices: NoticeBoard,
}

impl FlowListener for PageListener {
    fn notice(&self, notice: Notice) {
        log::info!("flow notice: {:?}", notice);
        self.notices.show(notice);
    }

    fn changed(&self) {
        let _ = self.version.try_update(|v| *v += 1);
    }
}

/// Everything the view reads from the controller in one pass
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    steps: Vec<Step>,
    current: usize,
    opened: Vec<usize>,
    panes: Vec<PaneState>,
    footer: Option<Footer>,
    breadcrumb: String,
}

impl Snapshot {
    fn of(flow: &FlowController) -> Self {
        Self {
            steps: flow.visible_steps(),
            current: flow.current(),
            opened: flow.opened(),
            panes: flow.panes(),
            footer: flow.footer(),
            breadcrumb: flow.breadcrumb(),
        }
    }
}

#[component]
pub fn AccessFlowPage() -> impl IntoView {
    let contents = use_context::<StepContents>().unwrap_or_default();
    let notices = use_context::<NoticeBoard>().unwrap_or_else(NoticeBoard::new);
    let version = RwSignal::new(0u64);

    let ports = FlowPorts {
        navigator: Arc::new(RouterNavigator::new()),
        backend: Arc::new(ManagerApi),
        listener: Arc::new(PageListener { version, notices }),
    };
    let flow = Arc::new(FlowController::new(RouteTable::default(), ports));
    let mode = flow.mode();
    let listing = flow.routes().listing.clone();

    // Follow the address bar and fetch the group once its id is known
    let location = use_location();
    Effect::new({
        let flow = flow.clone();
        move |_| {
            location.pathname.track();
            location.search.track();
            flow.sync();
            version.update(|v| *v += 1);

            if flow.needs_enrichment() {
                let flow = flow.clone();
                spawn_local(async move {
                    if let Err(err) = flow.enrich().await {
                        log::warn!("group enrichment failed: {}", err);
                    }
                });
            }
        }
    });

    on_cleanup({
        let flow = flow.clone();
        move || flow.teardown()
    });

    let snapshot = Memo::new({
        let flow = flow.clone();
        move |_| {
            version.track();
            Snapshot::of(&flow)
        }
    });

    let context = Signal::derive({
        let flow = flow.clone();
        move || {
            version.track();
            flow.context()
        }
    });

    let on_select = Callback::new({
        let flow = flow.clone();
        move |index: usize| {
            if let Err(err) = flow.select(index) {
                log::debug!("step {} not selectable: {}", index, err);
            }
        }
    });

    let on_back = Callback::new({
        let flow = flow.clone();
        move |_: ()| {
            if let Err(err) = flow.back(flow.current()) {
                log::debug!("previous refused: {}", err);
            }
        }
    });

    let on_advance = Callback::new({
        let flow = flow.clone();
        move |_: ()| {
            let flow = flow.clone();
            spawn_local(async move {
                let index = flow.current();
                if let Err(err) = flow.advance(index).await {
                    log::warn!("step {} did not advance: {}", index, err);
                }
            });
        }
    });

    let on_leave = Callback::new({
        let flow = flow.clone();
        move |_: ()| flow.leave()
    });

    let panes = StepKey::ALL
        .into_iter()
        .map(|key| {
            let slot = StepSlot::new(key, context, flow.clone());
            view! { <StepPane key=key snapshot=snapshot step_slot=slot contents=contents.clone() /> }
        })
        .collect_view();

    view! {
        <div class="p-6">
            <div class="text-sm text-gray-500 mb-4">
                <A href=listing attr:class="hover:underline">"Data Access"</A>
                " / "
                <span class="text-gray-800">{move || snapshot.read().breadcrumb.clone()}</span>
            </div>

            {match mode {
                NavigationMode::Wizard => view! { <StepIndicator snapshot=snapshot on_select=on_select /> }.into_any(),
                NavigationMode::TabView => view! { <TabHeaders snapshot=snapshot on_select=on_select /> }.into_any(),
            }}

            <div class="bg-white rounded-lg shadow p-6 mt-4">
                {panes}
            </div>

            <FlowFooter
                footer=Signal::derive(move || snapshot.read().footer)
                on_back=on_back
                on_advance=on_advance
                on_leave=on_leave
            />
        </div>
    }
}

/// Wrapper for one step's content. Mounted the first time the step is
/// opened and kept afterwards; only its visibility follows the cursor.
#[component]
fn StepPane(key: StepKey, snapshot: Memo<Snapshot>, step_slot: StepSlot, contents: StepContents) -> impl IntoView {
    let pane = move || snapshot.read().panes.iter().find(|p| p.key == key).copied();
    let mounted = Memo::new(move |prev: Option<&bool>| {
        prev.copied().unwrap_or(false) || pane().is_some_and(|p| p.mounted)
    });
    let active = move || pane().is_some_and(|p| p.active);

    view! {
        <div data-step=key.value() style:display=move || if active() { "block" } else { "none" }>
            <Show when=move || mounted.get()>
                {contents.render(step_slot.clone())}
            </Show>
        </div>
    }
}

#[component]
fn StepIndicator(snapshot: Memo<Snapshot>, on_select: Callback<usize>) -> impl IntoView {
    view! {
        <ol class="flex items-center gap-6">
            {move || {
                let snap = snapshot.get();
                snap.steps
                    .iter()
                    .enumerate()
                    .map(|(index, step)| {
                        let class = if index == snap.current {
                            "text-blue-600 font-bold"
                        } else if index < snap.current || snap.opened.contains(&index) {
                            "text-gray-700 hover:text-blue-600"
                        } else {
                            "text-gray-400 cursor-not-allowed"
                        };
                        view! {
                            <li>
                                <button class=class on:click=move |_| on_select.run(index)>
                                    {format!("{}. {}", index + 1, step.label)}
                                </button>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ol>
    }
}

#[component]
fn TabHeaders(snapshot: Memo<Snapshot>, on_select: Callback<usize>) -> impl IntoView {
    view! {
        <div class="flex border-b">
            {move || {
                let snap = snapshot.get();
                snap.steps
                    .iter()
                    .enumerate()
                    .map(|(index, step)| {
                        let class = if index == snap.current {
                            "px-4 py-2 -mb-px border-b-2 border-blue-500 text-blue-600"
                        } else {
                            "px-4 py-2 text-gray-600 hover:text-gray-900"
                        };
                        view! {
                            <button class=class on:click=move |_| on_select.run(index)>
                                {step.label}
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn FlowFooter(
    footer: Signal<Option<Footer>>,
    on_back: Callback<()>,
    on_advance: Callback<()>,
    on_leave: Callback<()>,
) -> impl IntoView {
    move || {
        footer.get().map(|f| {
            view! {
                <div class="flex justify-end gap-2 mt-6">
                    <button class=SECONDARY on:click=move |_| on_leave.run(())>"Cancel"</button>
                    {f.show_previous.then(|| view! {
                        <button class=SECONDARY disabled=f.previous_disabled on:click=move |_| on_back.run(())>
                            "Previous"
                        </button>
                    })}
                    {f.show_next.then(|| view! {
                        <button class=PRIMARY disabled=f.next_loading on:click=move |_| on_advance.run(())>
                            {if f.next_loading { "Saving..." } else { "Next" }}
                        </button>
                    })}
                    {f.show_submit.then(|| view! {
                        <button class=PRIMARY disabled=f.submit_loading on:click=move |_| on_advance.run(())>
                            {if f.submit_loading { "Submitting..." } else { "Submit" }}
                        </button>
                    })}
                </div>
            }
        })
    }
}
