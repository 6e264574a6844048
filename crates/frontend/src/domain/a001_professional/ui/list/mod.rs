use crate::shared::api_utils::{api_url, fetch_json_with_retry};
use crate::shared::components::table::{DataTable, TableColumn};
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::search::{SearchBar, SearchField, SearchOptions, SearchOrchestrator};
use contracts::domain::a001_professional::{Professional, VerificationStatus};
use contracts::shared::column::ColumnDef;
use contracts::shared::retry::RetryPolicy;
use contracts::shared::search::{SearchCriterion, SearchOperator, SearchValue};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const SEARCH_FIELDS: [SearchField; 3] = [
    SearchField::new("full_name", "Name", SearchOperator::Ilike),
    SearchField::new("specialty", "Specialty", SearchOperator::Ilike),
    SearchField::new("phone", "Phone", SearchOperator::Ilike),
];

fn verification_badge(professional: &Professional) -> AnyView {
    let color = match professional.verification_status {
        VerificationStatus::Pending => BadgeColor::Warning,
        VerificationStatus::Verified => BadgeColor::Success,
        VerificationStatus::Rejected => BadgeColor::Danger,
    };
    let label = professional.verification_status.display_name();
    view! {
        <Badge appearance=BadgeAppearance::Tint color=color>
            {label}
        </Badge>
    }
    .into_any()
}

fn rating_cell(professional: &Professional) -> AnyView {
    let text = professional
        .rating
        .map(|r| format!("{:.1} ★", r))
        .unwrap_or_else(|| "-".to_string());
    view! { <span>{text}</span> }.into_any()
}

fn joined_cell(professional: &Professional) -> AnyView {
    view! { <span>{format_date(&professional.created_at)}</span> }.into_any()
}

fn columns() -> Vec<TableColumn<Professional>> {
    vec![
        TableColumn::new(ColumnDef::new("full_name", "Name")),
        TableColumn::new(ColumnDef::new("specialty", "Specialty")),
        TableColumn::new(ColumnDef::new("phone", "Phone")),
        TableColumn::new(ColumnDef::new("email", "Email")),
        TableColumn::new(ColumnDef::new("verification_status", "Verification"))
            .render(verification_badge),
        TableColumn::new(ColumnDef::new("rating", "Rating"))
            .align_right()
            .render(rating_cell),
        TableColumn::new(ColumnDef::new("created_at", "Joined")).render(joined_cell),
    ]
}

/// Специалисты: список загружается целиком, поиск локальный
#[component]
pub fn ProfessionalList() -> impl IntoView {
    let (professionals, set_professionals) = signal(Vec::<Professional>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let status_filter = RwSignal::new(String::new());

    let load = move || {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match fetch_json_with_retry::<Vec<Professional>>(
                &api_url("/api/professionals"),
                RetryPolicy::default(),
            )
            .await
            {
                Ok(rows) => {
                    log!("Loaded {} professionals", rows.len());
                    set_professionals.set(rows);
                }
                Err(e) => {
                    log!("Failed to load professionals: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    let search = SearchOrchestrator::new(
        SearchOptions::new(professionals)
            .on_search_error(Callback::new(move |e: String| set_error.set(Some(e))))
            .on_clear_search(Callback::new(move |_: ()| status_filter.set(String::new())))
            .sync_url(),
    );

    load();

    // Локальный поиск идёт по загруженным строкам: восстанавливаем из URL после загрузки
    Effect::new(move |restored: Option<bool>| {
        let ready = professionals.with(|rows| !rows.is_empty());
        let already = restored.unwrap_or(false);
        if ready && !already {
            search.restore_from_url();
            return true;
        }
        already
    });

    // Select follows the applied criteria (restored from URL or cleared)
    Effect::new(move |_| {
        let status = search.criteria().with(|criteria| {
            criteria
                .iter()
                .find(|c| c.field == "verification_status")
                .map(|c| c.value.clone())
        });
        let text = match status {
            Some(SearchValue::Scalar(value)) => value.to_string(),
            _ => String::new(),
        };
        if status_filter.get_untracked() != text {
            status_filter.set(text);
        }
    });

    let on_status_change = move |value: String| {
        status_filter.set(value.clone());
        // Критерий статуса объединяется с поиском по тексту
        search.refine(
            &[],
            vec![SearchCriterion::new("verification_status", SearchOperator::Eq, value)],
            true,
        );
    };

    view! {
        <PageFrame page_id="a001_professional--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2 class="page__title">"Professionals"</h2>
                </div>
                <div class="page__header-right">
                    <Space>
                        {view! {
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| load()
                                disabled=loading
                            >
                                {icon("refresh")}
                                " Refresh"
                            </Button>
                        }
                        .into_any()}
                    </Space>
                </div>
            </div>

            <div class="page__content">
                <Flex align=FlexAlign::Center gap=FlexGap::Medium>
                    <SearchBar orchestrator=search fields=SEARCH_FIELDS.to_vec() merge=true />
                    <select
                        class="page__filter"
                        prop:value=move || status_filter.get()
                        on:change=move |ev| on_status_change(event_target_value(&ev))
                    >
                        <option value="">"All statuses"</option>
                        {VerificationStatus::all()
                            .into_iter()
                            .map(|status| view! {
                                <option value=status.as_str()>{status.display_name()}</option>
                            })
                            .collect_view()}
                    </select>
                </Flex>

                {move || error.get().map(|err| view! {
                    <div class="page__error">
                        <span class="page__error-icon">"⚠"</span>
                        <span>{err}</span>
                    </div>
                })}

                <Show when=move || loading.get()>
                    <Flex justify=FlexJustify::Center align=FlexAlign::Center gap=FlexGap::Small>
                        <Spinner />
                        "Loading..."
                    </Flex>
                </Show>

                <DataTable
                    data=search.data()
                    columns=columns()
                    dataset_key="professionals"
                    show_column_filters=true
                    empty_text="No professionals found"
                />
            </div>
        </PageFrame>
    }
}
