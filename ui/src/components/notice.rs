use access_flow::domain::Notice;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const NOTICE_MILLIS: u32 = 3_000;

/// App-wide slot for the last flow notice, so a success message survives
/// the navigation that follows a submit.
#[derive(Clone, Copy)]
pub struct NoticeBoard {
    current: RwSignal<Option<(u64, Notice)>>,
    issued: RwSignal<u64>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            issued: RwSignal::new(0),
        }
    }

    pub fn show(&self, notice: Notice) {
        self.issued.update(|n| *n += 1);
        let ticket = self.issued.get_untracked();
        self.current.set(Some((ticket, notice)));

        let board = *self;
        spawn_local(async move {
            TimeoutFuture::new(NOTICE_MILLIS).await;
            // Only clear if nothing newer replaced it
            let _ = board.current.try_update(|current| {
                if matches!(current, Some((shown, _)) if *shown == ticket) {
                    *current = None;
                }
            });
        });
    }
}

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let board = use_context::<NoticeBoard>().unwrap_or_else(NoticeBoard::new);

    move || {
        board.current.get().map(|(_, notice)| {
            let (class, message) = match notice {
                Notice::Success(message) => ("bg-green-50 border-green-200 text-green-800", message),
                Notice::Error(message) => ("bg-red-50 border-red-200 text-red-800", message),
            };
            view! {
                <div class=format!("m-4 border rounded-lg p-3 {}", class)>{message}</div>
            }
        })
    }
}
