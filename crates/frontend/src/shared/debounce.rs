//! Debounce без привязки к реактивной системе
//!
//! Each call replaces the pending timer: dropping a `gloo_timers` [`Timeout`] cancels
//! it, so only the last call within `delay_ms` fires.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Задержка поиска при вводе
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

#[derive(Clone, Copy)]
pub struct Debouncer {
    delay_ms: u32,
    pending: StoredValue<Option<Timeout>, LocalStorage>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: StoredValue::new_local(None),
        }
    }

    /// Schedules `f`, cancelling whatever was scheduled before
    pub fn call(&self, f: impl FnOnce() + 'static) {
        let timeout = Timeout::new(self.delay_ms, f);
        self.pending.set_value(Some(timeout));
    }

    /// Drops the pending call, if any
    pub fn cancel(&self) {
        self.pending.set_value(None);
    }
}
