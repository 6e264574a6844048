use crate::shared::api_utils::{api_url, fetch_json_with_retry};
use crate::shared::components::table::{DataTable, TableColumn};
use crate::shared::date_utils::{format_date, format_money};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use contracts::domain::a003_booth::{BoothOccupancy, Occupancy};
use contracts::shared::column::ColumnDef;
use contracts::shared::retry::RetryPolicy;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn occupancy_badge(row: &BoothOccupancy) -> AnyView {
    let (color, label) = match &row.occupancy {
        Occupancy::Vacant => (BadgeColor::Success, "Vacant"),
        Occupancy::Occupied { .. } => (BadgeColor::Danger, "Occupied"),
        Occupancy::Reserved { .. } => (BadgeColor::Warning, "Reserved"),
    };
    view! { <Badge appearance=BadgeAppearance::Tint color=color>{label}</Badge> }.into_any()
}

fn period_cell(row: &BoothOccupancy) -> AnyView {
    let text = match &row.occupancy {
        Occupancy::Vacant => "-".to_string(),
        Occupancy::Occupied { until: None, .. } => "open-ended".to_string(),
        Occupancy::Occupied {
            until: Some(until), ..
        } => format!("until {}", format_date(until)),
        Occupancy::Reserved { from, .. } => format!("from {}", format_date(from)),
    };
    view! { <span>{text}</span> }.into_any()
}

fn rate_cell(row: &BoothOccupancy) -> AnyView {
    view! { <span>{format_money(row.booth.daily_rate)}</span> }.into_any()
}

fn columns() -> Vec<TableColumn<BoothOccupancy>> {
    vec![
        TableColumn::new(ColumnDef::new("name", "Booth").accessor("booth.name")),
        TableColumn::new(ColumnDef::new("location", "Location").accessor("booth.location")),
        TableColumn::new(ColumnDef::new("occupancy", "Status")).render(occupancy_badge),
        TableColumn::new(ColumnDef::new("professional_name", "Professional")),
        TableColumn::new(ColumnDef::new("period", "Period").not_sortable().not_filterable())
            .render(period_cell),
        TableColumn::new(ColumnDef::new("daily_rate", "Daily rate").accessor("booth.daily_rate"))
            .align_right()
            .render(rate_cell),
    ]
}

/// Кабинки и их текущая занятость
#[component]
pub fn BoothList() -> impl IntoView {
    let (booths, set_booths) = signal(Vec::<BoothOccupancy>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load = move || {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match fetch_json_with_retry::<Vec<BoothOccupancy>>(
                &api_url("/api/booth-occupancy"),
                RetryPolicy::default(),
            )
            .await
            {
                Ok(rows) => {
                    log!("Loaded occupancy for {} booths", rows.len());
                    set_booths.set(rows);
                }
                Err(e) => {
                    log!("Failed to load booths: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    load();

    let count = move |state: &'static str| {
        booths.with(|rows| rows.iter().filter(|r| r.occupancy.as_str() == state).count())
    };

    view! {
        <PageFrame page_id="a003_booth--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2 class="page__title">"Booths"</h2>
                    <Space>
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>
                            {move || format!("{} vacant", count("vacant"))}
                        </Badge>
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Danger>
                            {move || format!("{} occupied", count("occupied"))}
                        </Badge>
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>
                            {move || format!("{} reserved", count("reserved"))}
                        </Badge>
                    </Space>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=loading
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|err| view! {
                    <div class="page__error">
                        <span class="page__error-icon">"⚠"</span>
                        <span>{err}</span>
                    </div>
                })}

                <DataTable
                    data=booths
                    columns=columns()
                    dataset_key="booths"
                    empty_text="No booths configured"
                />
            </div>
        </PageFrame>
    }
}
