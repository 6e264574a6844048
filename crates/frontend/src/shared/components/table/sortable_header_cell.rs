//! Компонент сортируемой ячейки заголовка таблицы
//!
//! ```ignore
//! <SortableHeaderCell
//!     label="Сумма"
//!     column_id="total"
//!     direction=Signal::derive(move || state.with(|s| s.sort_direction("total")))
//!     on_sort=Callback::new(move |id: String| state.update(|s| s.toggle_sort(&id)))
//!     align="right"
//! />
//! ```

use super::state::SortDirection;
use crate::shared::list_utils::{get_sort_class, get_sort_indicator};
use leptos::prelude::*;

#[component]
pub fn SortableHeaderCell(
    /// Текст заголовка
    #[prop(into)]
    label: String,

    /// Колонка, которую сортирует клик
    #[prop(into)]
    column_id: String,

    /// Текущее направление сортировки этой колонки (None - не сортируется)
    #[prop(into)]
    direction: Signal<Option<SortDirection>>,

    on_sort: Callback<String>,

    /// Выравнивание заголовка (left/right)
    #[prop(optional, default = "left")]
    align: &'static str,
) -> impl IntoView {
    let header_style = if align == "right" {
        "cursor: pointer; justify-content: flex-end;"
    } else {
        "cursor: pointer;"
    };

    view! {
        <th
            class="table__header-cell"
            aria-sort=move || match direction.get() {
                Some(SortDirection::Asc) => "ascending",
                Some(SortDirection::Desc) => "descending",
                None => "none",
            }
        >
            <div
                class="table__sortable-header"
                style=header_style
                on:click=move |_| on_sort.run(column_id.clone())
            >
                {label}
                <span class=move || get_sort_class(direction.get())>
                    {move || get_sort_indicator(direction.get())}
                </span>
            </div>
        </th>
    }
}
