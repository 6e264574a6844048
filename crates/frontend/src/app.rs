use crate::layout::global_context::{sync_active_panel_with_url, AppGlobalContext};
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    let ctx = AppGlobalContext::new();
    sync_active_panel_with_url(ctx);
    provide_context(ctx);

    view! {
        <Shell />
    }
}
