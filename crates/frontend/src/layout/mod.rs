pub mod center;
pub mod global_context;
pub mod left;

use global_context::AppGlobalContext;
use leptos::prelude::*;

/// Оболочка приложения
///
/// ```text
/// +------------------------------------------+
/// |                 Header                   |
/// +------------------------------------------+
/// |  Sidebar  |          Active panel        |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    view! {
        <div class="app-layout">
            <header class="app-header">
                <button class="app-header__toggle" on:click=move |_| ctx.toggle_left() title="Menu">
                    "☰"
                </button>
                <span class="app-header__title">"Tausi Admin"</span>
                <span class="app-header__panel">{move || ctx.active.get().title()}</span>
            </header>
            <div class="app-body">
                <left::Left />
                <div class="app-main">
                    <center::Center />
                </div>
            </div>
        </div>
    }
}
