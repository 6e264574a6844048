//! Универсальная таблица: сортировка, фильтры, пагинация, выделение строк
//!
//! ```ignore
//! <DataTable
//!     data=orders
//!     columns=vec![
//!         TableColumn::new(ColumnDef::new("order_no", "Order")),
//!         TableColumn::new(ColumnDef::new("total", "Total")).align_right(),
//!     ]
//!     dataset_key="orders"
//!     selectable=true
//!     on_row_selection=Callback::new(move |rows: Vec<Order>| set_selected.set(rows))
//! />
//! ```
//!
//! Columns are fixed for the lifetime of the component; rebuild the table to change
//! them. The rows signal is read-only from the table's point of view.

use super::sortable_header_cell::SortableHeaderCell;
use super::state::{TableState, TableView};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table_checkbox::{TableCheckbox, TableHeaderCheckbox};
use crate::shared::list_utils::SearchInput;
use contracts::shared::column::ColumnDef;
use contracts::shared::row::{display_or, Row, EMPTY_CELL};
use leptos::prelude::*;

/// Пользовательский рендер ячейки
pub type CellRenderer<R> = fn(&R) -> AnyView;

/// Колонка таблицы: описание + необязательный рендер
pub struct TableColumn<R> {
    pub def: ColumnDef,
    pub render: Option<CellRenderer<R>>,
    pub align: &'static str,
}

impl<R> Clone for TableColumn<R> {
    fn clone(&self) -> Self {
        Self {
            def: self.def.clone(),
            render: self.render,
            align: self.align,
        }
    }
}

impl<R> TableColumn<R> {
    pub fn new(def: ColumnDef) -> Self {
        Self {
            def,
            render: None,
            align: "left",
        }
    }

    pub fn render(mut self, render: CellRenderer<R>) -> Self {
        self.render = Some(render);
        self
    }

    pub fn align_right(mut self) -> Self {
        self.align = "right";
        self
    }
}

#[component]
pub fn DataTable<R>(
    /// Строки (не изменяются таблицей)
    #[prop(into)]
    data: Signal<Vec<R>>,

    columns: Vec<TableColumn<R>>,

    /// Смена ключа сбрасывает сортировку, фильтры, страницу и выделение
    #[prop(optional, into)]
    dataset_key: MaybeProp<String>,

    #[prop(optional)]
    selectable: bool,

    /// Вызывается с выбранными строками при каждом изменении выделения
    #[prop(optional)]
    on_row_selection: Option<Callback<Vec<R>>>,

    #[prop(optional, default = true)]
    show_global_filter: bool,

    #[prop(optional)]
    show_column_filters: bool,

    #[prop(optional, into)]
    empty_text: Option<String>,
) -> impl IntoView
where
    R: Row + Clone + Send + Sync + 'static,
{
    let state = RwSignal::new(TableState::default());
    let defs = StoredValue::new(columns.iter().map(|c| c.def.clone()).collect::<Vec<_>>());
    let columns = StoredValue::new(columns);
    let empty_text = empty_text.unwrap_or_else(|| "No records".to_string());

    let emit_selection = move || {
        if let Some(callback) = on_row_selection {
            let rows: Vec<R> = data.with_untracked(|rows| {
                state.with_untracked(|s| s.selected_rows(rows).into_iter().cloned().collect())
            });
            callback.run(rows);
        }
    };

    Effect::new(move |_| {
        if let Some(key) = dataset_key.get() {
            let had_selection = state.with_untracked(|s| !s.selected.is_empty());
            let reset = state
                .try_update(|s| s.observe_dataset(&key))
                .unwrap_or(false);
            if reset {
                log::debug!("DataTable: dataset changed to '{}', state reset", key);
                if had_selection {
                    emit_selection();
                }
            }
        }
    });

    let table_view: Memo<TableView> = Memo::new(move |_| {
        data.with(|rows| state.with(|s| defs.with_value(|d| s.view(rows, d))))
    });

    let page_keys = Memo::new(move |_| {
        let view = table_view.get();
        data.with(|rows| {
            view.row_indices
                .iter()
                .filter_map(|&i| rows.get(i).and_then(|row| row.row_key()))
                .collect::<Vec<String>>()
        })
    });
    let page_selected = move || {
        page_keys.with(|keys| state.with(|s| keys.iter().filter(|k| s.is_selected(k)).count()))
    };

    let on_sort = Callback::new(move |column_id: String| {
        state.update(|s| s.toggle_sort(&column_id));
    });

    let on_select_page = Callback::new(move |checked: bool| {
        let keys = page_keys.get_untracked();
        state.update(|s| {
            for key in &keys {
                s.set_selected(key, checked);
            }
        });
        emit_selection();
    });

    let header_cells = move || {
        columns.with_value(|cols| {
            cols.iter()
                .map(|column| {
                    let def = column.def.clone();
                    if def.sortable {
                        let id = def.id.clone();
                        view! {
                            <SortableHeaderCell
                                label=def.header
                                column_id=def.id
                                direction=Signal::derive(move || state.with(|s| s.sort_direction(&id)))
                                on_sort=on_sort
                                align=column.align
                            />
                        }
                        .into_any()
                    } else {
                        view! { <th class="table__header-cell">{def.header}</th> }.into_any()
                    }
                })
                .collect::<Vec<_>>()
        })
    };

    let filter_cells = move || {
        columns.with_value(|cols| {
            cols.iter()
                .map(|column| {
                    if !column.def.filterable {
                        return view! { <th class="table__header-cell"></th> }.into_any();
                    }
                    let id = column.def.id.clone();
                    let id_value = id.clone();
                    view! {
                        <th class="table__header-cell">
                            <input
                                type="text"
                                class="table__column-filter"
                                placeholder="Filter"
                                prop:value=move || state.with(|s| s.column_filter(&id_value).to_string())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| s.set_column_filter(&id, &value));
                                }
                            />
                        </th>
                    }
                    .into_any()
                })
                .collect::<Vec<_>>()
        })
    };

    let render_row = move |row: R| {
        let key = row.row_key();
        let checkbox = selectable.then(|| match key.clone() {
            Some(key) => {
                let key_checked = key.clone();
                view! {
                    <TableCheckbox
                        checked=Signal::derive(move || state.with(|s| s.is_selected(&key_checked)))
                        on_change=Callback::new(move |checked: bool| {
                            state.update(|s| s.set_selected(&key, checked));
                            emit_selection();
                        })
                    />
                }
                .into_any()
            }
            None => view! {
                <TableCheckbox checked=Signal::stored(false) on_change=Callback::new(|_: bool| {}) disabled=true />
            }
            .into_any(),
        });

        let cells = columns.with_value(|cols| {
            cols.iter()
                .map(|column| {
                    let content = match column.render {
                        Some(render) => render(&row),
                        None => {
                            let text = display_or(&row, &column.def.accessor, EMPTY_CELL);
                            view! { <span>{text}</span> }.into_any()
                        }
                    };
                    view! {
                        <td class="table__cell" class:table__cell--right=column.align == "right">
                            {content}
                        </td>
                    }
                    .into_any()
                })
                .collect::<Vec<_>>()
        });

        let selected = move || {
            key.as_deref()
                .map(|k| state.with(|s| s.is_selected(k)))
                .unwrap_or(false)
        };

        view! {
            <tr class="table__row" class:table__row--selected=selected>
                {checkbox}
                {cells}
            </tr>
        }
    };

    let visible_rows = move || {
        let view = table_view.get();
        data.with(|rows| {
            view.row_indices
                .iter()
                .filter_map(|&i| rows.get(i).cloned())
                .collect::<Vec<R>>()
        })
    };

    view! {
        <div class="data-table">
            <div class="data-table__toolbar">
                {show_global_filter.then(|| view! {
                    <SearchInput
                        value=Signal::derive(move || state.with(|s| s.global_filter.clone()))
                        on_change=Callback::new(move |query: String| {
                            state.update(|s| s.set_global_filter(&query));
                        })
                        placeholder="Filter rows..."
                    />
                })}
                {selectable.then(|| view! {
                    <span class="data-table__selection">
                        {move || format!("{} selected", state.with(|s| s.selected.len()))}
                    </span>
                })}
            </div>
            <table class="table">
                <thead>
                    <tr>
                        {selectable.then(|| view! {
                            <TableHeaderCheckbox
                                checked=Signal::derive(move || {
                                    let total = page_keys.with(Vec::len);
                                    total > 0 && page_selected() == total
                                })
                                indeterminate=Signal::derive(move || {
                                    let count = page_selected();
                                    count > 0 && count < page_keys.with(Vec::len)
                                })
                                on_change=on_select_page
                            />
                        })}
                        {header_cells()}
                    </tr>
                    {show_column_filters.then(|| view! {
                        <tr class="table__filter-row">
                            {selectable.then(|| view! { <th class="table__header-cell"></th> })}
                            {filter_cells()}
                        </tr>
                    })}
                </thead>
                <tbody>
                    {move || visible_rows().into_iter().map(render_row).collect_view()}
                </tbody>
            </table>
            <Show when=move || table_view.with(|v| v.filtered_count == 0)>
                <div class="table__empty">{empty_text.clone()}</div>
            </Show>
            <PaginationControls
                current_page=Signal::derive(move || table_view.with(|v| v.page))
                total_pages=Signal::derive(move || table_view.with(|v| v.page_count))
                total_count=Signal::derive(move || table_view.with(|v| v.filtered_count))
                page_size=Signal::derive(move || state.with(|s| s.page_size))
                on_page_change=Callback::new(move |page: usize| {
                    let total = table_view.with_untracked(|v| v.filtered_count);
                    let requested = i64::try_from(page).unwrap_or(i64::MAX);
                    state.update(|s| {
                        s.set_page(requested, total);
                    });
                })
                on_page_size_change=Callback::new(move |size: usize| {
                    state.update(|s| {
                        s.set_page_size(size);
                    });
                })
            />
        </div>
    }
}
