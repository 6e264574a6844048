use crate::shared::api_utils::{api_url, fetch_json_with_retry, post_json};
use crate::shared::components::table::{DataTable, TableColumn};
use crate::shared::date_utils::{format_datetime, format_money};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::search::{
    RemoteSearchFn, RemoteSearchFuture, SearchBar, SearchField, SearchOptions, SearchOrchestrator,
};
use contracts::domain::a002_order::{Order, OrderStatus};
use contracts::shared::column::ColumnDef;
use contracts::shared::retry::RetryPolicy;
use contracts::shared::search::{SearchOperator, SearchRequest, SearchResponse};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;
use thaw::*;

const SEARCH_FIELDS: [SearchField; 4] = [
    SearchField::new("client.name", "Client", SearchOperator::Ilike),
    SearchField::new("order_no", "Order no", SearchOperator::Ilike),
    SearchField::new("service", "Service", SearchOperator::Ilike),
    SearchField::new("status", "Status", SearchOperator::In),
];

fn status_badge(order: &Order) -> AnyView {
    let color = match order.status {
        OrderStatus::Pending => BadgeColor::Warning,
        OrderStatus::Confirmed => BadgeColor::Brand,
        OrderStatus::Completed => BadgeColor::Success,
        OrderStatus::Cancelled => BadgeColor::Danger,
    };
    let label = order.status.display_name();
    view! {
        <Badge appearance=BadgeAppearance::Tint color=color>
            {label}
        </Badge>
    }
    .into_any()
}

fn total_cell(order: &Order) -> AnyView {
    view! { <span>{format_money(order.total)}</span> }.into_any()
}

fn created_cell(order: &Order) -> AnyView {
    view! { <span>{format_datetime(&order.created_at)}</span> }.into_any()
}

fn columns() -> Vec<TableColumn<Order>> {
    vec![
        TableColumn::new(ColumnDef::new("order_no", "Order")),
        TableColumn::new(ColumnDef::new("client", "Client").accessor("client.name")),
        TableColumn::new(ColumnDef::new("professional", "Professional").accessor("professional.name")),
        TableColumn::new(ColumnDef::new("service", "Service")),
        TableColumn::new(ColumnDef::new("status", "Status")).render(status_badge),
        TableColumn::new(ColumnDef::new("total_appointments", "Appointments")).align_right(),
        TableColumn::new(ColumnDef::new("total", "Total"))
            .align_right()
            .render(total_cell),
        TableColumn::new(ColumnDef::new("created_at", "Created")).render(created_cell),
    ]
}

/// Заказы: поиск выполняется на сервере
#[component]
pub fn OrderList() -> impl IntoView {
    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (selected, set_selected) = signal(Vec::<Order>::new());

    let load_orders = move || {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match fetch_json_with_retry::<Vec<Order>>(&api_url("/api/orders"), RetryPolicy::default())
                .await
            {
                Ok(rows) => {
                    log!("Loaded {} orders", rows.len());
                    set_orders.set(rows);
                }
                Err(e) => {
                    log!("Failed to load orders: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    let remote: RemoteSearchFn<Order> =
        Arc::new(|request: SearchRequest| -> RemoteSearchFuture<Order> {
            Box::pin(async move {
                post_json::<_, SearchResponse<Order>>(&api_url("/api/orders/search"), &request).await
            })
        });

    let search = SearchOrchestrator::new(
        SearchOptions::new(orders)
            .remote(remote)
            .time_field("created_at")
            .on_search_error(Callback::new(move |e: String| {
                set_error.set(Some(format!("Search failed: {}", e)));
            }))
            .on_clear_search(Callback::new(move |_: ()| load_orders()))
            .sync_url(),
    );

    load_orders();
    search.restore_from_url();

    let selection_summary = move || {
        selected.with(|rows| {
            (!rows.is_empty()).then(|| {
                let total: f64 = rows.iter().map(|o| o.total).sum();
                format!("{} selected · {}", rows.len(), format_money(total))
            })
        })
    };

    view! {
        <PageFrame page_id="a002_order--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2 class="page__title">"Orders"</h2>
                    <Show when=move || search.is_search_active().get()>
                        <Badge appearance=BadgeAppearance::Filled color=BadgeColor::Brand>
                            "Filtered"
                        </Badge>
                    </Show>
                </div>
                <div class="page__header-right">
                    <Space>
                        {view! {
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| search.clear_search()
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
                <SearchBar orchestrator=search fields=SEARCH_FIELDS.to_vec() with_time_range=true />

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
                    dataset_key="orders"
                    selectable=true
                    on_row_selection=Callback::new(move |rows: Vec<Order>| set_selected.set(rows))
                    empty_text="No orders found"
                />

                {move || selection_summary().map(|text| view! {
                    <div class="page__summary">{text}</div>
                })}
            </div>
        </PageFrame>
    }
}
