use crate::layout::global_context::{switch_panel, AppGlobalContext, Panel};
use crate::shared::icons::icon;
use leptos::prelude::*;

/// Боковое меню панелей
#[component]
pub fn Left() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let is_open = move || ctx.left_open.get();

    view! {
        <div data-zone="left" class="left" class:hidden=move || !is_open()>
            <div class="app-sidebar__content">
                {Panel::all()
                    .iter()
                    .copied()
                    .map(|panel| {
                        view! {
                            <div
                                class="app-sidebar__item"
                                class:app-sidebar__item--active=move || ctx.active.get() == panel
                                on:click=move |_| switch_panel(ctx, panel)
                            >
                                <div class="app-sidebar__item-content">
                                    {icon(panel.icon())}
                                    <span>{panel.title()}</span>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
