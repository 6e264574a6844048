//! Дашборд записей и выручки по периодам
//!
//! Orders of the selected window are folded into time buckets per order status.
//! The bars and the table below show the same buckets.

use super::api;
use crate::shared::components::table::{DataTable, TableColumn};
use crate::shared::date_utils::format_money;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DASHBOARD};
use chrono::Utc;
use contracts::domain::a002_order::{Order, OrderStatus};
use contracts::shared::buckets::{bucket, series_keys, Bucket, BucketSpec};
use contracts::shared::column::ColumnDef;
use contracts::shared::time_window::TimeWindow;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Что суммируется в корзинах
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Appointments,
    Revenue,
    Orders,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Appointments => "appointments",
            Metric::Revenue => "revenue",
            Metric::Orders => "orders",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Appointments => "Appointments",
            Metric::Revenue => "Revenue",
            Metric::Orders => "Orders",
        }
    }

    pub fn all() -> [Metric; 3] {
        [Metric::Appointments, Metric::Revenue, Metric::Orders]
    }

    pub fn spec(&self) -> BucketSpec {
        match self {
            Metric::Appointments => BucketSpec::sum("created_at", "status", "total_appointments"),
            Metric::Revenue => BucketSpec::sum("created_at", "status", "revenue"),
            Metric::Orders => BucketSpec::count("created_at", "status"),
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            Metric::Revenue => format_money(value),
            Metric::Appointments | Metric::Orders => format!("{}", value.round() as i64),
        }
    }

    fn from_key(key: &str) -> Option<Metric> {
        Metric::all().into_iter().find(|m| m.as_str() == key)
    }
}

fn status_label(key: &str) -> String {
    OrderStatus::all()
        .into_iter()
        .find(|s| s.as_str() == key)
        .map(|s| s.display_name().to_string())
        .unwrap_or_else(|| key.to_string())
}

fn bucket_columns(keys: &[String]) -> Vec<TableColumn<Bucket>> {
    let mut columns = vec![TableColumn::new(ColumnDef::new("label", "Period").not_sortable())];
    columns.extend(
        keys.iter()
            .map(|key| TableColumn::new(ColumnDef::new(key.as_str(), status_label(key))).align_right()),
    );
    columns.push(TableColumn::new(ColumnDef::new("total", "Total")).align_right());
    columns
}

#[component]
pub fn AppointmentsDashboard() -> impl IntoView {
    let window = RwSignal::new(TimeWindow::Last90Days);
    let metric = RwSignal::new(Metric::Appointments);
    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load = move |period: TimeWindow| {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match api::get_orders(period).await {
                Ok(rows) => {
                    log!("Dashboard: {} orders in {}", rows.len(), period);
                    set_orders.set(rows);
                }
                Err(e) => {
                    log!("Dashboard: failed to load orders: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load(window.get()));

    let buckets = Memo::new(move |_| {
        let spec = metric.get().spec();
        orders.with(|rows| bucket(rows, window.get(), &spec, Utc::now()))
    });
    let keys = Memo::new(move |_| buckets.with(|b| series_keys(b)));
    let max_total = Memo::new(move |_| {
        buckets.with(|b| b.iter().map(Bucket::total).fold(0.0_f64, f64::max))
    });

    view! {
        <PageFrame page_id="d400_appointments--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h2 class="page__title">"Appointments"</h2>
                </div>
                <div class="page__header-right">
                    <Space>
                        <select
                            class="page__filter"
                            prop:value=move || window.get().as_str().to_string()
                            on:change=move |ev| {
                                if let Ok(period) = event_target_value(&ev).parse::<TimeWindow>() {
                                    window.set(period);
                                }
                            }
                        >
                            {TimeWindow::all()
                                .iter()
                                .map(|w| view! { <option value=w.as_str()>{w.display_name()}</option> })
                                .collect_view()}
                        </select>
                        <select
                            class="page__filter"
                            prop:value=move || metric.get().as_str().to_string()
                            on:change=move |ev| {
                                if let Some(m) = Metric::from_key(&event_target_value(&ev)) {
                                    metric.set(m);
                                }
                            }
                        >
                            {Metric::all()
                                .into_iter()
                                .map(|m| view! { <option value=m.as_str()>{m.label()}</option> })
                                .collect_view()}
                        </select>
                        <Show when=move || loading.get()>
                            <Spinner size=SpinnerSize::Small />
                        </Show>
                    </Space>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|err| view! {
                    <div class="page__error">
                        <span class="page__error-icon">"⚠"</span>
                        <span>{err}</span>
                    </div>
                })}

                <div class="bucket-chart">
                    {move || {
                        let max = max_total.get();
                        let current = metric.get();
                        buckets
                            .get()
                            .into_iter()
                            .map(|b| {
                                let segments = keys
                                    .get()
                                    .into_iter()
                                    .filter(|key| b.value(key) > 0.0)
                                    .map(|key| {
                                        let width = if max > 0.0 { b.value(&key) / max * 100.0 } else { 0.0 };
                                        view! {
                                            <div
                                                class=format!("bucket-chart__segment bucket-chart__segment--{}", key)
                                                style=format!("width: {:.2}%;", width)
                                                title=format!("{}: {}", status_label(&key), current.format(b.value(&key)))
                                            ></div>
                                        }
                                    })
                                    .collect_view();
                                view! {
                                    <div class="bucket-chart__row">
                                        <span class="bucket-chart__label">{b.label.clone()}</span>
                                        <div class="bucket-chart__bar">{segments}</div>
                                        <span class="bucket-chart__total">{current.format(b.total())}</span>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>

                {move || {
                    let columns = bucket_columns(&keys.get());
                    view! {
                        <DataTable
                            data=Signal::derive(move || buckets.get())
                            columns=columns
                            show_global_filter=false
                            empty_text="No orders in this period"
                        />
                    }
                }}
            </div>
        </PageFrame>
    }
}
