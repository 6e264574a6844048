/// Утилиты списков: поле поиска с debounce, индикаторы сортировки
use crate::shared::components::table::state::SortDirection;
use crate::shared::debounce::{Debouncer, SEARCH_DEBOUNCE_MS};
use leptos::prelude::*;

/// Поле поиска с debounce и кнопкой очистки
///
/// `on_change` fires once the user stops typing for [`SEARCH_DEBOUNCE_MS`].
/// Clearing is immediate and cancels a pending call.
#[component]
pub fn SearchInput(
    /// Применённое значение (подсветка активного фильтра)
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    // Локальное значение input (до debounce)
    let (input_value, set_input_value) = signal(value.get_untracked());
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE_MS);
    let echo = StoredValue::new(AppliedEcho::new(value.get_untracked()));

    let emit = move |new_value: String| {
        echo.update_value(|e| e.emitted(&new_value));
        on_change.run(new_value);
    };

    // Значение сброшено снаружи (например, смена набора данных): обновить поле
    Effect::new(move |_| {
        let applied = value.get();
        if let Some(text) = echo.try_update_value(|e| e.observe(applied)).flatten() {
            debouncer.cancel();
            set_input_value.set(text);
        }
    });

    let handle_input = move |new_value: String| {
        set_input_value.set(new_value.clone());
        debouncer.call(move || emit(new_value));
    };

    let clear = move |_| {
        debouncer.cancel();
        set_input_value.set(String::new());
        emit(String::new());
    };

    let is_active = move || !value.get().trim().is_empty();

    view! {
        <div class="search-input" class:search-input--active=is_active>
            <input
                type="text"
                class="search-input__field"
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear title="Clear">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Tells our own applied values apart from values changed by someone else
#[derive(Debug, Clone, Default)]
pub struct AppliedEcho {
    last: String,
}

impl AppliedEcho {
    pub fn new(initial: String) -> Self {
        Self { last: initial }
    }

    /// Records a value sent through `on_change`
    pub fn emitted(&mut self, value: &str) {
        self.last = value.to_string();
    }

    /// Returns the text to show when `applied` did not come from this input
    pub fn observe(&mut self, applied: String) -> Option<String> {
        if applied == self.last {
            return None;
        }
        self.last = applied.clone();
        Some(applied)
    }
}

/// Индикатор сортировки для заголовка
pub fn get_sort_indicator(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => " ⇅",
    }
}

/// CSS класс индикатора сортировки
pub fn get_sort_class(direction: Option<SortDirection>) -> &'static str {
    if direction.is_some() {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator(Some(SortDirection::Asc)), " ▲");
        assert_eq!(get_sort_indicator(Some(SortDirection::Desc)), " ▼");
        assert_eq!(get_sort_indicator(None), " ⇅");
        assert_eq!(get_sort_class(None), "table__sort-indicator");
    }

    #[test]
    fn test_applied_echo_ignores_own_values() {
        let mut echo = AppliedEcho::new(String::new());
        echo.emitted("ab");
        // our own value coming back while the user keeps typing
        assert_eq!(echo.observe("ab".to_string()), None);
        // external reset of the applied filter
        assert_eq!(echo.observe(String::new()), Some(String::new()));
        assert_eq!(echo.observe(String::new()), None);
        assert_eq!(echo.observe("vip".to_string()), Some("vip".to_string()));
    }
}
