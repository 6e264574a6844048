use crate::dashboards::d400_appointments::ui::AppointmentsDashboard;
use crate::domain::a001_professional::ui::list::ProfessionalList;
use crate::domain::a002_order::ui::list::OrderList;
use crate::domain::a003_booth::ui::list::BoothList;
use crate::layout::global_context::{AppGlobalContext, Panel};
use leptos::prelude::*;

/// Активная панель; смена панели пересоздаёт её целиком
#[component]
pub fn Center() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    view! {
        <div data-zone="center" class="app-content" style="flex: 1; overflow: auto;">
            {move || match ctx.active.get() {
                Panel::Orders => view! { <OrderList /> }.into_any(),
                Panel::Professionals => view! { <ProfessionalList /> }.into_any(),
                Panel::Booths => view! { <BoothList /> }.into_any(),
                Panel::Dashboard => view! { <AppointmentsDashboard /> }.into_any(),
            }}
        </div>
    }
}
