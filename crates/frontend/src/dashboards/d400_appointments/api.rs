use crate::shared::api_utils::{api_url, fetch_json_with_retry};
use contracts::domain::a002_order::Order;
use contracts::shared::retry::RetryPolicy;
use contracts::shared::time_window::TimeWindow;

/// Заказы за период (фильтр по `created_at` на сервере)
pub async fn get_orders(window: TimeWindow) -> Result<Vec<Order>, String> {
    let url = api_url(&format!("/api/orders?window={}&date_field=created_at", window.as_str()));
    fetch_json_with_retry(&url, RetryPolicy::default()).await
}
