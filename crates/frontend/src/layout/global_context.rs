use crate::shared::search::url_params::UrlParamsSync;
use leptos::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Query parameter holding the active panel
pub const ACTIVE_PARAM: &str = "active";

/// Панели админки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Orders,
    Professionals,
    Booths,
    Dashboard,
}

impl Panel {
    pub fn key(&self) -> &'static str {
        match self {
            Panel::Orders => "orders",
            Panel::Professionals => "professionals",
            Panel::Booths => "booths",
            Panel::Dashboard => "dashboard",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Orders => "Orders",
            Panel::Professionals => "Professionals",
            Panel::Booths => "Booths",
            Panel::Dashboard => "Appointments",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Panel::Orders => "orders",
            Panel::Professionals => "users",
            Panel::Booths => "store",
            Panel::Dashboard => "bar-chart",
        }
    }

    pub fn all() -> &'static [Panel] {
        &[
            Panel::Orders,
            Panel::Professionals,
            Panel::Booths,
            Panel::Dashboard,
        ]
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::all()
            .iter()
            .copied()
            .find(|p| p.key() == s)
            .ok_or_else(|| format!("Unknown panel: {}", s))
    }
}

/// Состояние оболочки приложения: активная панель и боковое меню.
///
/// Plain state; the URL mirror lives in [`sync_active_panel_with_url`].
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<Panel>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(Panel::default()),
            left_open: RwSignal::new(true),
        }
    }

    pub fn activate(&self, panel: Panel) {
        if self.active.get_untracked() != panel {
            leptos::logging::log!("activate panel: {}", panel);
            self.active.set(panel);
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the panel from `?active=` and writes it back for a bare URL.
/// Search parameters of the restored panel are kept for deep links.
pub fn sync_active_panel_with_url(ctx: AppGlobalContext) {
    let sync = UrlParamsSync;
    if let Some(panel) = sync
        .current_params()
        .get(ACTIVE_PARAM)
        .and_then(|key| key.parse::<Panel>().ok())
    {
        ctx.active.set(panel);
    }
    let panel = ctx.active.get_untracked();
    sync.update(|params| {
        params.insert(ACTIVE_PARAM.to_string(), panel.key().to_string());
    });
}

/// Switches panel from the navigation.
///
/// The URL is rewritten before the new panel mounts, so it never picks up the
/// search parameters of the previous one.
pub fn switch_panel(ctx: AppGlobalContext, panel: Panel) {
    if ctx.active.get_untracked() == panel {
        return;
    }
    UrlParamsSync.update(|params| {
        params.clear();
        params.insert(ACTIVE_PARAM.to_string(), panel.key().to_string());
    });
    ctx.activate(panel);
}
