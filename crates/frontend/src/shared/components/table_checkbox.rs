use leptos::prelude::*;

/// Чекбокс строки таблицы с единым BEM-стилем
///
/// Рендерит `<td>` с чекбоксом внутри; клик не всплывает до строки.
///
/// # BEM классы
/// - `.table__cell--checkbox` - td обёртка
/// - `.table__checkbox` - input элемент
#[component]
pub fn TableCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
    /// Строки без ключа выбрать нельзя
    #[prop(optional)]
    disabled: bool,
) -> impl IntoView {
    view! {
        <td
            class="table__cell table__cell--checkbox"
            on:click=|e| e.stop_propagation()
        >
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:disabled=disabled
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </td>
    }
}

/// Чекбокс заголовка: выбрать/снять все строки текущей страницы
#[component]
pub fn TableHeaderCheckbox(
    /// Все строки страницы выбраны
    checked: Signal<bool>,
    /// Выбрана часть строк страницы
    indeterminate: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    view! {
        <th class="table__header-cell table__cell--checkbox">
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:indeterminate=indeterminate
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </th>
    }
}
