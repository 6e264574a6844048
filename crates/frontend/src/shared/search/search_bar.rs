//! Панель поиска: поле, значение, период
//!
//! Typing is debounced; changing the field or the period searches immediately.
//! An empty value with no period clears the search. With `merge` the bar only
//! replaces its own criteria, so other filters of the page stay applied.

use super::orchestrator::SearchOrchestrator;
use crate::shared::debounce::{Debouncer, SEARCH_DEBOUNCE_MS};
use crate::shared::icons::icon;
use contracts::shared::row::{CellValue, Row};
use chrono::Utc;
use contracts::shared::search::{SearchCriterion, SearchOperator, SearchRequest, SearchValue};
use contracts::shared::time_window::TimeWindow;
use leptos::prelude::*;
use thaw::*;

/// Поле, доступное для поиска
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchField {
    pub field: &'static str,
    pub label: &'static str,
    pub operator: SearchOperator,
}

impl SearchField {
    pub const fn new(field: &'static str, label: &'static str, operator: SearchOperator) -> Self {
        Self {
            field,
            label,
            operator,
        }
    }

    /// Converts raw input: `in` takes a comma separated list, everything else a scalar
    pub fn value_from_input(&self, input: &str) -> SearchValue {
        let input = input.trim();
        match self.operator {
            SearchOperator::In => SearchValue::List(
                input
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(CellValue::from)
                    .collect(),
            ),
            _ => SearchValue::from(input),
        }
    }
}

fn input_text(value: &SearchValue) -> String {
    match value {
        SearchValue::Scalar(v) => v.to_string(),
        SearchValue::List(items) => items
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[component]
pub fn SearchBar<R>(
    orchestrator: SearchOrchestrator<R>,
    fields: Vec<SearchField>,
    /// Показать выбор периода
    #[prop(optional)]
    with_time_range: bool,
    /// Keep criteria set by other filters of the page (only this bar's fields change)
    #[prop(optional)]
    merge: bool,
) -> impl IntoView
where
    R: Row + Clone + Send + Sync + 'static,
{
    let fields = StoredValue::new(fields);
    let selected_field = RwSignal::new(0usize);
    let query = RwSignal::new(String::new());
    let window = RwSignal::new(None::<TimeWindow>);
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE_MS);

    let run_search = move || {
        let Some(field) = fields.with_value(|f| f.get(selected_field.get_untracked()).copied())
        else {
            return;
        };
        let value = field.value_from_input(&query.get_untracked());
        if merge {
            let time_field = orchestrator.time_field();
            let mut owned: Vec<String> =
                fields.with_value(|f| f.iter().map(|sf| sf.field.to_string()).collect());
            let mut request =
                SearchRequest::new(vec![SearchCriterion::new(field.field, field.operator, value)]);
            if with_time_range {
                owned.push(time_field.clone());
                if let Some(period) = window.get_untracked() {
                    request = request.with_time_range(&time_field, period, Utc::now());
                }
            }
            orchestrator.refine(&owned, request.search_criteria, true);
            return;
        }
        match (value.is_empty(), window.get_untracked()) {
            (true, Some(period)) => orchestrator.search_window(period, true),
            (_, period) => orchestrator.trigger_search(field.field, value, field.operator, period, true),
        }
    };

    // Prefill from a search restored from the URL
    Effect::new(move |_| {
        let criteria = orchestrator.criteria().get();
        if !query.get_untracked().is_empty() {
            return;
        }
        for criterion in &criteria {
            let position = fields.with_value(|f| f.iter().position(|sf| sf.field == criterion.field));
            if let Some(index) = position {
                selected_field.set(index);
                query.set(input_text(&criterion.value));
                break;
            }
        }
    });

    let clear = move |_| {
        debouncer.cancel();
        query.set(String::new());
        window.set(None);
        orchestrator.clear_search();
    };

    view! {
        <Flex align=FlexAlign::Center gap=FlexGap::Small class="search-bar">
            <select
                class="search-bar__field"
                on:change=move |ev| {
                    if let Ok(index) = event_target_value(&ev).parse::<usize>() {
                        selected_field.set(index);
                        if !query.get_untracked().trim().is_empty() {
                            run_search();
                        }
                    }
                }
                prop:value=move || selected_field.get().to_string()
            >
                {fields
                    .get_value()
                    .into_iter()
                    .enumerate()
                    .map(|(index, field)| {
                        view! { <option value=index.to_string()>{field.label}</option> }
                    })
                    .collect_view()}
            </select>
            <input
                type="text"
                class="search-bar__value"
                placeholder=move || {
                    fields.with_value(|f| {
                        f.get(selected_field.get())
                            .map(|field| format!("{} {}", field.label, field.operator.symbol()))
                            .unwrap_or_default()
                    })
                }
                prop:value=move || query.get()
                on:input=move |ev| {
                    query.set(event_target_value(&ev));
                    debouncer.call(run_search);
                }
            />
            {with_time_range.then(|| view! {
                <select
                    class="search-bar__window"
                    on:change=move |ev| {
                        window.set(event_target_value(&ev).parse::<TimeWindow>().ok());
                        run_search();
                    }
                    prop:value=move || window.get().map(|w| w.as_str().to_string()).unwrap_or_default()
                >
                    <option value="">"All time"</option>
                    {TimeWindow::all()
                        .iter()
                        .map(|w| view! { <option value=w.as_str()>{w.display_name()}</option> })
                        .collect_view()}
                </select>
            })}
            <Button appearance=ButtonAppearance::Subtle on_click=clear>
                {icon("x")}
                " Clear"
            </Button>
            <Show when=move || orchestrator.is_loading().get()>
                <Spinner size=SpinnerSize::Small />
            </Show>
            {move || {
                orchestrator
                    .criteria()
                    .get()
                    .into_iter()
                    .map(|criterion| view! {
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                            {criterion.display_text()}
                        </Badge>
                    })
                    .collect_view()
            }}
        </Flex>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_input() {
        let status = SearchField::new("status", "Status", SearchOperator::In);
        assert_eq!(
            status.value_from_input(" pending, completed ,"),
            SearchValue::List(vec!["pending".into(), "completed".into()])
        );
        assert!(status.value_from_input(" , ").is_empty());

        let name = SearchField::new("client.name", "Client", SearchOperator::Ilike);
        assert_eq!(name.value_from_input(" amina "), SearchValue::from("amina"));
        assert!(name.value_from_input("   ").is_empty());
    }

    #[test]
    fn test_input_text() {
        assert_eq!(input_text(&SearchValue::from("amina")), "amina");
        assert_eq!(
            input_text(&SearchValue::List(vec!["a".into(), "b".into()])),
            "a, b"
        );
    }
}
