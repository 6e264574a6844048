//! Состояние поиска: последний запуск побеждает
//!
//! `SearchSession` is the target-independent core of the search orchestrator. Every
//! `begin` hands out a ticket carrying a monotonically increasing sequence number;
//! only the ticket of the most recent `begin` may publish results. A slow search that
//! resolves after a newer one (or after `clear`) is reported as stale and dropped.

use super::criterion::SearchCriterion;

/// Handle for one in-flight search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    seq: u64,
    criteria: Vec<SearchCriterion>,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn criteria(&self) -> &[SearchCriterion] {
        &self.criteria
    }
}

/// What `complete` did with a result
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<E> {
    /// Result replaced the displayed rows
    Applied,
    /// Latest search failed; state left as it was before the search
    Failed(E),
    /// A newer search (or a clear) superseded this one
    Stale,
}

#[derive(Debug, Clone)]
pub struct SearchSession<R> {
    seq: u64,
    in_flight: Option<u64>,
    active: bool,
    criteria: Vec<SearchCriterion>,
    data: Vec<R>,
}

impl<R> Default for SearchSession<R> {
    fn default() -> Self {
        Self {
            seq: 0,
            in_flight: None,
            active: false,
            criteria: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<R> SearchSession<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new search; any older in-flight search becomes stale
    pub fn begin(&mut self, criteria: Vec<SearchCriterion>) -> SearchTicket {
        self.seq += 1;
        self.in_flight = Some(self.seq);
        SearchTicket {
            seq: self.seq,
            criteria,
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.in_flight == Some(ticket.seq)
    }

    /// Publishes the result of `ticket` if it is still the latest search
    pub fn complete<E>(&mut self, ticket: SearchTicket, result: Result<Vec<R>, E>) -> SearchOutcome<E> {
        if !self.is_current(&ticket) {
            return SearchOutcome::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(rows) => {
                self.data = rows;
                self.criteria = ticket.criteria;
                self.active = true;
                SearchOutcome::Applied
            }
            Err(e) => SearchOutcome::Failed(e),
        }
    }

    /// Deactivates the search and invalidates in-flight tickets.
    ///
    /// Search rows are dropped; the caller shows its own source rows again.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.in_flight = None;
        self.active = false;
        self.criteria.clear();
        self.data.clear();
    }

    pub fn is_search_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Criteria of the applied search (empty when inactive)
    pub fn criteria(&self) -> &[SearchCriterion] {
        &self.criteria
    }

    /// Rows of the applied search
    pub fn data(&self) -> &[R] {
        &self.data
    }
}
