use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

mod api;
mod components;
mod navigator;

use components::access_detail::AccessFlowPage;
use components::access_list::AccessList;
use components::notice::{NoticeBanner, NoticeBoard};

#[component]
pub fn App() -> impl IntoView {
    provide_context(NoticeBoard::new());

    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"InLong"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/access" label="Data Access" />
                        <NavLink href="/access/create" label="New Access" />
                    </nav>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <NoticeBanner />
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=AccessList/>
                        <Route path=path!("/access") view=AccessList/>
                        <Route path=path!("/access/create/:id?") view=AccessFlowPage/>
                        <Route path=path!("/access/detail/:id") view=AccessFlowPage/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
