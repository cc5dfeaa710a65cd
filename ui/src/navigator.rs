//! Router-backed [`Navigator`] for the flow page.

use access_flow::domain::{Navigator, Route};
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

/// Reads the address bar through the router and pushes new history entries.
///
/// Must be created inside a component under `<Router>`.
pub struct RouterNavigator {
    pathname: Memo<String>,
    search: Memo<String>,
    navigate: StoredValue<Box<dyn Fn(&str)>, LocalStorage>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let location = use_location();
        let navigate = use_navigate();
        Self {
            pathname: location.pathname,
            search: location.search,
            navigate: StoredValue::new_local(Box::new(move |href: &str| {
                navigate(href, NavigateOptions::default())
            })),
        }
    }
}

impl Navigator for RouterNavigator {
    fn current(&self) -> Route {
        let pathname = self.pathname.try_get_untracked().unwrap_or_default();
        let search = self.search.try_get_untracked().unwrap_or_default();
        Route::from_parts(&pathname, &search)
    }

    fn push(&self, route: Route) {
        let href = route.to_href();
        log::debug!("navigate to {}", href);
        // The page may already be gone when a late transition lands
        let _ = self.navigate.try_with_value(|navigate| navigate(&href));
    }
}
