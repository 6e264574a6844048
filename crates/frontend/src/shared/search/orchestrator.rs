//! Оркестратор поиска для списков
//!
//! Reactive shell around [`SearchSession`]. A search runs either remotely (caller
//! supplied async function, typically `POST /api/{entity}/search`) or locally over the
//! caller's source rows. Only the latest trigger may publish rows; results of older
//! searches are dropped when they arrive.
//!
//! While a search is active `data` shows its rows; otherwise it shows the source
//! signal, so clearing always reveals whatever the page currently holds (the page
//! typically re-fetches in `on_clear_search`).

use super::url_params::UrlParamsSync;
use chrono::Utc;
use contracts::shared::search::{
    filter_rows_cloned, SearchCriterion, SearchOperator, SearchOutcome, SearchRequest,
    SearchResponse, SearchSession, SearchTicket, SearchValue,
};
use contracts::shared::row::Row;
use contracts::shared::time_window::TimeWindow;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type RemoteSearchFuture<R> = Pin<Box<dyn Future<Output = Result<SearchResponse<R>, String>>>>;

/// Удалённый поиск: запрос -> строки или текст ошибки
pub type RemoteSearchFn<R> = Arc<dyn Fn(SearchRequest) -> RemoteSearchFuture<R> + Send + Sync>;

pub struct SearchOptions<R: Send + Sync + 'static> {
    /// Rows shown while no search is active; also the local search input
    pub source: Signal<Vec<R>>,
    pub remote: Option<RemoteSearchFn<R>>,
    /// Field the optional time range criterion applies to
    pub time_field: String,
    pub on_search_error: Option<Callback<String>>,
    pub on_clear_search: Option<Callback<()>>,
    /// Reflect criteria in the query string
    pub url_sync: Option<UrlParamsSync>,
}

impl<R: Send + Sync + 'static> SearchOptions<R> {
    pub fn new(source: impl Into<Signal<Vec<R>>>) -> Self {
        Self {
            source: source.into(),
            remote: None,
            time_field: "created_at".to_string(),
            on_search_error: None,
            on_clear_search: None,
            url_sync: None,
        }
    }

    pub fn remote(mut self, remote: RemoteSearchFn<R>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    pub fn on_search_error(mut self, callback: Callback<String>) -> Self {
        self.on_search_error = Some(callback);
        self
    }

    pub fn on_clear_search(mut self, callback: Callback<()>) -> Self {
        self.on_clear_search = Some(callback);
        self
    }

    pub fn sync_url(mut self) -> Self {
        self.url_sync = Some(UrlParamsSync);
        self
    }
}

struct Hooks<R> {
    remote: Option<RemoteSearchFn<R>>,
    time_field: String,
    on_search_error: Option<Callback<String>>,
    on_clear_search: Option<Callback<()>>,
    url_sync: Option<UrlParamsSync>,
}

pub struct SearchOrchestrator<R: Send + Sync + 'static> {
    session: StoredValue<SearchSession<R>>,
    hooks: StoredValue<Hooks<R>>,
    source: Signal<Vec<R>>,
    results: RwSignal<Vec<R>>,
    is_search_active: RwSignal<bool>,
    is_loading: RwSignal<bool>,
    criteria: RwSignal<Vec<SearchCriterion>>,
}

impl<R: Send + Sync + 'static> Clone for SearchOrchestrator<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Send + Sync + 'static> Copy for SearchOrchestrator<R> {}

impl<R> SearchOrchestrator<R>
where
    R: Row + Clone + Send + Sync + 'static,
{
    pub fn new(options: SearchOptions<R>) -> Self {
        Self {
            session: StoredValue::new(SearchSession::new()),
            hooks: StoredValue::new(Hooks {
                remote: options.remote,
                time_field: options.time_field,
                on_search_error: options.on_search_error,
                on_clear_search: options.on_clear_search,
                url_sync: options.url_sync,
            }),
            source: options.source,
            results: RwSignal::new(Vec::new()),
            is_search_active: RwSignal::new(false),
            is_loading: RwSignal::new(false),
            criteria: RwSignal::new(Vec::new()),
        }
    }

    /// Rows to display: search results while active, the source otherwise
    pub fn data(&self) -> Signal<Vec<R>> {
        let results = self.results;
        let active = self.is_search_active;
        let source = self.source;
        Signal::derive(move || {
            if active.get() {
                results.get()
            } else {
                source.get()
            }
        })
    }

    pub fn is_search_active(&self) -> Signal<bool> {
        self.is_search_active.into()
    }

    pub fn is_loading(&self) -> Signal<bool> {
        self.is_loading.into()
    }

    /// Criteria of the applied search
    pub fn criteria(&self) -> Signal<Vec<SearchCriterion>> {
        self.criteria.into()
    }

    /// Запуск поиска по одному полю.
    ///
    /// An empty value is the same as [`Self::clear_search`]. `time_range` adds a
    /// `between` criterion on the configured time field.
    pub fn trigger_search(
        &self,
        field: &str,
        value: impl Into<SearchValue>,
        operator: SearchOperator,
        time_range: Option<TimeWindow>,
        update_url_params: bool,
    ) {
        let value = value.into();
        if value.is_empty() {
            self.clear_search();
            return;
        }

        let mut request = SearchRequest::new(vec![SearchCriterion::new(field, operator, value)]);
        if let Some(window) = time_range {
            let time_field = self.hooks.with_value(|h| h.time_field.clone());
            request = request.with_time_range(&time_field, window, Utc::now());
        }
        self.run(request, update_url_params);
    }

    /// Field the time range criterion applies to
    pub fn time_field(&self) -> String {
        self.hooks.with_value(|h| h.time_field.clone())
    }

    /// Replaces the applied criteria on `owned_fields` with `additions`, keeping the
    /// criteria of other filters on the page. Empty additions are dropped; when
    /// nothing remains the search is cleared.
    pub fn refine(
        &self,
        owned_fields: &[String],
        additions: Vec<SearchCriterion>,
        update_url_params: bool,
    ) {
        let merged = merge_criteria(self.criteria.get_untracked(), owned_fields, additions);
        if merged.is_empty() {
            self.clear_search();
        } else {
            self.run(SearchRequest::new(merged), update_url_params);
        }
    }

    /// Search by the time range alone
    pub fn search_window(&self, window: TimeWindow, update_url_params: bool) {
        let time_field = self.hooks.with_value(|h| h.time_field.clone());
        let request = SearchRequest::default().with_time_range(&time_field, window, Utc::now());
        self.run(request, update_url_params);
    }

    /// Runs a prepared request (several criteria, deep links)
    pub fn run(&self, request: SearchRequest, update_url_params: bool) {
        if let Err(e) = request.validate() {
            self.report_error(e.to_string());
            return;
        }

        if update_url_params {
            if let Some(sync) = self.hooks.with_value(|h| h.url_sync) {
                sync.write_criteria(&request.search_criteria);
            }
        }

        let Some(ticket) = self
            .session
            .try_update_value(|s| s.begin(request.search_criteria.clone()))
        else {
            return;
        };
        self.is_loading.set(true);
        log::debug!(
            "search #{}: {} criteria",
            ticket.seq(),
            request.search_criteria.len()
        );

        match self.hooks.with_value(|h| h.remote.clone()) {
            Some(remote) => {
                let this = *self;
                let pending = remote(request);
                spawn_local(async move {
                    let result = pending.await.map(|response| response.data);
                    this.finish(ticket, result);
                });
            }
            None => {
                let rows = self
                    .source
                    .with_untracked(|rows| filter_rows_cloned(rows, &request.search_criteria));
                self.finish(ticket, Ok(rows));
            }
        }
    }

    fn finish(&self, ticket: SearchTicket, result: Result<Vec<R>, String>) {
        let seq = ticket.seq();
        // None: the owning component is gone, nothing to update
        let Some((outcome, published, loading)) = self.session.try_update_value(|s| {
            let outcome = s.complete(ticket, result);
            let published = matches!(outcome, SearchOutcome::Applied)
                .then(|| (s.data().to_vec(), s.criteria().to_vec()));
            (outcome, published, s.is_loading())
        }) else {
            return;
        };

        match outcome {
            SearchOutcome::Applied => {
                if let Some((rows, criteria)) = published {
                    log::debug!("search #{}: {} rows", seq, rows.len());
                    self.results.try_set(rows);
                    self.criteria.try_set(criteria);
                    self.is_search_active.try_set(true);
                }
            }
            SearchOutcome::Failed(e) => self.report_error(e),
            SearchOutcome::Stale => log::debug!("search #{}: superseded, result dropped", seq),
        }
        self.is_loading.try_set(loading);
    }

    fn report_error(&self, message: String) {
        log::error!("search failed: {}", message);
        if let Some(callback) = self.hooks.try_with_value(|h| h.on_search_error).flatten() {
            callback.run(message);
        }
    }

    /// Сброс поиска. Каждый вызов вызывает `on_clear_search`; состояние идемпотентно.
    pub fn clear_search(&self) {
        self.session.update_value(|s| s.clear());
        self.results.set(Vec::new());
        self.criteria.set(Vec::new());
        self.is_search_active.set(false);
        self.is_loading.set(false);

        let (sync, on_clear) = self.hooks.with_value(|h| (h.url_sync, h.on_clear_search));
        if let Some(sync) = sync {
            sync.clear_criteria();
        }
        if let Some(callback) = on_clear {
            callback.run(());
        }
    }

    /// Re-runs the search encoded in the current URL, if any
    pub fn restore_from_url(&self) -> bool {
        let Some(sync) = self.hooks.with_value(|h| h.url_sync) else {
            return false;
        };
        let criteria = sync.read_criteria();
        if criteria.is_empty() {
            return false;
        }
        self.run(SearchRequest::new(criteria), false);
        true
    }
}

fn merge_criteria(
    base: Vec<SearchCriterion>,
    owned_fields: &[String],
    additions: Vec<SearchCriterion>,
) -> Vec<SearchCriterion> {
    let kept: Vec<SearchCriterion> = base
        .into_iter()
        .filter(|c| !owned_fields.contains(&c.field))
        .filter(|c| !additions.iter().any(|a| a.field == c.field))
        .collect();
    kept.into_iter()
        .chain(additions.into_iter().filter(|a| !a.value.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn people() -> Vec<Value> {
        vec![
            json!({"id": "1", "name": "Amina", "status": "verified"}),
            json!({"id": "2", "name": "Baraka", "status": "pending"}),
            json!({"id": "3", "name": "Aisha", "status": "pending"}),
        ]
    }

    fn ids(rows: &[Value]) -> Vec<&str> {
        rows.iter().filter_map(|r| r["id"].as_str()).collect()
    }

    fn begin(search: &SearchOrchestrator<Value>) -> SearchTicket {
        search
            .session
            .try_update_value(|s| s.begin(Vec::new()))
            .unwrap()
    }

    struct Fixture {
        source: RwSignal<Vec<Value>>,
        search: SearchOrchestrator<Value>,
        cleared: Arc<AtomicUsize>,
        errors: Arc<Mutex<Vec<String>>>,
    }

    fn fixture() -> Fixture {
        let source = RwSignal::new(people());
        let cleared = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let on_clear = {
            let cleared = cleared.clone();
            // re-fetch: the source gets fresh rows on every clear
            Callback::new(move |_: ()| {
                cleared.fetch_add(1, Ordering::SeqCst);
                source.update(|rows| {
                    rows.push(json!({"id": "4", "name": "Neema", "status": "verified"}))
                });
            })
        };
        let on_error = {
            let errors = errors.clone();
            Callback::new(move |e: String| errors.lock().unwrap().push(e))
        };
        let search = SearchOrchestrator::new(
            SearchOptions::new(source)
                .on_clear_search(on_clear)
                .on_search_error(on_error),
        );
        Fixture {
            source,
            search,
            cleared,
            errors,
        }
    }

    #[test]
    fn test_local_search_filters_source() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        assert_eq!(ids(&f.search.data().get()), vec!["1", "2", "3"]);
        f.search.trigger_search("name", "ai", SearchOperator::Ilike, None, true);
        assert!(f.search.is_search_active().get());
        assert!(!f.search.is_loading().get());
        assert_eq!(ids(&f.search.data().get()), vec!["3"]);
        assert_eq!(f.search.criteria().get().len(), 1);

        // a new search replaces the previous result, never merges
        f.search.trigger_search("status", "pending", SearchOperator::Eq, None, true);
        assert_eq!(ids(&f.search.data().get()), vec!["2", "3"]);
    }

    #[test]
    fn test_empty_value_clears_and_clear_is_not_deduplicated() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        f.search.trigger_search("name", "amina", SearchOperator::Ilike, None, false);
        assert!(f.search.is_search_active().get());

        f.search.trigger_search("name", "  ", SearchOperator::Ilike, None, false);
        assert!(!f.search.is_search_active().get());
        assert_eq!(f.cleared.load(Ordering::SeqCst), 1);

        f.search.clear_search();
        f.search.clear_search();
        assert_eq!(f.cleared.load(Ordering::SeqCst), 3);
        assert!(!f.search.is_search_active().get());
        assert!(f.search.criteria().get().is_empty());
    }

    #[test]
    fn test_clear_shows_refetched_source() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        f.search.trigger_search("status", "verified", SearchOperator::Eq, None, false);
        assert_eq!(ids(&f.search.data().get()), vec!["1"]);

        f.search.clear_search();
        assert_eq!(ids(&f.search.data().get()), vec!["1", "2", "3", "4"]);
        assert_eq!(f.search.data().get(), f.source.get());
    }

    #[test]
    fn test_failure_keeps_previous_state() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        f.search.trigger_search("status", "pending", SearchOperator::Eq, None, false);
        let before = f.search.data().get();

        // completion of a failed remote call
        let ticket = begin(&f.search);
        f.search.finish(ticket, Err("503 Service Unavailable".to_string()));

        assert_eq!(
            f.errors.lock().unwrap().clone(),
            vec!["503 Service Unavailable".to_string()]
        );
        assert!(f.search.is_search_active().get());
        assert!(!f.search.is_loading().get());
        assert_eq!(f.search.data().get(), before);
    }

    #[test]
    fn test_invalid_request_reports_error() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        f.search.trigger_search("created_at", "2024-01-01", SearchOperator::Between, None, false);
        assert_eq!(f.errors.lock().unwrap().len(), 1);
        assert!(!f.search.is_search_active().get());
        assert_eq!(ids(&f.search.data().get()), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();

        let older = begin(&f.search);
        let newer = begin(&f.search);
        f.search.finish(newer, Ok(vec![json!({"id": "new"})]));
        f.search.finish(older, Ok(vec![json!({"id": "old"})]));

        assert_eq!(ids(&f.search.data().get()), vec!["new"]);
        assert!(f.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_refine_keeps_other_filters() {
        let owner = Owner::new();
        owner.set();
        let f = fixture();
        let bar = vec!["name".to_string()];

        f.search.refine(&[], vec![SearchCriterion::new("status", SearchOperator::Eq, "pending")], false);
        f.search.refine(&bar, vec![SearchCriterion::new("name", SearchOperator::Ilike, "ai")], false);
        assert_eq!(ids(&f.search.data().get()), vec!["3"]);

        // status back to "all": the name criterion stays
        f.search.refine(&[], vec![SearchCriterion::new("status", SearchOperator::Eq, "")], false);
        assert_eq!(ids(&f.search.data().get()), vec!["3"]);
        assert_eq!(f.search.criteria().get().len(), 1);
        assert_eq!(f.cleared.load(Ordering::SeqCst), 0);

        f.search.refine(&bar, Vec::new(), false);
        assert!(!f.search.is_search_active().get());
        assert_eq!(f.cleared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merge_criteria() {
        let base = vec![
            SearchCriterion::new("status", SearchOperator::Eq, "pending"),
            SearchCriterion::new("full_name", SearchOperator::Ilike, "ai"),
        ];
        let merged = merge_criteria(
            base,
            &["full_name".to_string(), "phone".to_string()],
            vec![SearchCriterion::new("phone", SearchOperator::Ilike, "0722")],
        );
        let fields: Vec<&str> = merged.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["status", "phone"]);
    }
}
