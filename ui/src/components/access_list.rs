use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn AccessList() -> impl IntoView {
    let (group_id, set_group_id) = signal(String::new());
    let navigate = use_navigate();

    let on_open = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = group_id.get();
        let id = id.trim();
        if !id.is_empty() {
            navigate(
                &format!("/access/detail/{}", urlencoding::encode(id)),
                Default::default(),
            );
        }
    };

    view! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">"Data Access"</h2>
                <a href="/access/create" class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded">
                    "+ New Access"
                </a>
            </div>

            <form class="bg-white rounded-lg shadow p-4 flex gap-2" on:submit=on_open>
                <input
                    type="text"
                    class="flex-1 border rounded px-3 py-2"
                    placeholder="Group id"
                    prop:value=group_id
                    on:input=move |ev| set_group_id.set(event_target_value(&ev))
                />
                <button type="submit" class="bg-gray-800 text-white px-4 py-2 rounded">
                    "Open"
                </button>
            </form>
        </div>
    }
}
