//! PageFrame: корневая обёртка каждой панели
//!
//! Sets `id="{entity}--{category}"` and `data-page-category` on the root element,
//! e.g. `a002_order--list`.

use leptos::prelude::*;

pub const PAGE_CAT_LIST: &str = "list";
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

#[component]
pub fn PageFrame(
    page_id: &'static str,
    /// PAGE_CAT_LIST или PAGE_CAT_DASHBOARD
    category: &'static str,
    children: Children,
) -> impl IntoView {
    let class = if category == PAGE_CAT_DASHBOARD {
        "page page--dashboard"
    } else {
        "page"
    };

    view! {
        <div id=page_id class=class data-page-category=category>
            {children()}
        </div>
    }
}
