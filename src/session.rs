//! Planning session: form state, submission lifecycle, history wiring.
//!
//! The session is the single foreground owner of all mutable client state.
//! Network calls are split into a `begin_*` step that hands out a
//! generation ticket and a `complete_*`/`apply_*` step that only applies
//! the response carrying the latest ticket, so an overlapping request that
//! resolves late can never overwrite newer state.

use crate::engine::{AlgorithmParams, EngineError, OptimizeRequest, OptimizeResponse, PlannerBackend};
use crate::history::{epoch_millis, HistoryStore};
use crate::map::{self, MapView, DEFAULT_CENTER};
use crate::model::{HistoryEntry, ItineraryResult, Location, Pace, TripQuery};
use crate::storage::{HistoryStorage, StorageError};
use crate::timeline::{arrival_labels, ClockPolicy};

const MAX_HOUR: u32 = 23;

/// Editable trip constraints, freely mutable while no request is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct TripForm {
    pub city: String,
    pub budget: f64,
    pub start_time: u32,
    pub end_time: u32,
    pub pace: Pace,
    pub start_point_id: Option<u32>,
    pub must_visit_ids: Vec<u32>,
    pub algorithm_params: Option<AlgorithmParams>,
}

impl Default for TripForm {
    fn default() -> Self {
        Self {
            city: "Hanoi".to_string(),
            budget: 500_000.0,
            start_time: 8,
            end_time: 18,
            pace: Pace::Normal,
            start_point_id: None,
            must_visit_ids: Vec::new(),
            algorithm_params: None,
        }
    }
}

/// The selectable-location catalog and the city it belongs to, replaced
/// as one value so catalog and city can never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityCatalog {
    pub city: String,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
}

/// Handle for one outstanding optimize request; only the newest one is
/// honored at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// Handle for one outstanding catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogTicket(u64);

/// Terminal transition of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result displayed and recorded in history.
    Accepted,
    /// The engine answered but declined; message surfaced to the user.
    Rejected(String),
    /// The engine was unreachable or answered garbage.
    TransportFailed(String),
    /// Superseded by a newer submission; nothing was applied.
    Stale,
}

/// The itinerary currently on display, with its originating query.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrip {
    pub query: TripQuery,
    pub result: ItineraryResult,
    /// History key, when the display is backed by a cache entry.
    pub history_key: Option<u64>,
}

pub struct PlannerSession<S> {
    form: TripForm,
    catalog: CityCatalog,
    phase: SessionPhase,
    active: Option<ActiveTrip>,
    arrival_labels: Vec<String>,
    map_view: Option<MapView>,
    last_error: Option<String>,
    history: HistoryStore<S>,
    clock_policy: ClockPolicy,
    submit_generation: u64,
    catalog_generation: u64,
}

impl<S: HistoryStorage> PlannerSession<S> {
    pub fn new(storage: S) -> Self {
        let form = TripForm::default();
        let catalog = CityCatalog {
            city: form.city.clone(),
            locations: Vec::new(),
        };
        Self {
            form,
            catalog,
            phase: SessionPhase::Idle,
            active: None,
            arrival_labels: Vec::new(),
            map_view: None,
            last_error: None,
            history: HistoryStore::open(storage),
            clock_policy: ClockPolicy::default(),
            submit_generation: 0,
            catalog_generation: 0,
        }
    }

    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    // ------------------------------------------------------------------
    // Form editing
    // ------------------------------------------------------------------

    pub fn set_budget(&mut self, budget: f64) {
        self.form.budget = budget;
    }

    pub fn set_start_time(&mut self, hour: u32) {
        self.form.start_time = hour.min(MAX_HOUR);
    }

    pub fn set_end_time(&mut self, hour: u32) {
        self.form.end_time = hour.min(MAX_HOUR);
    }

    pub fn set_pace(&mut self, pace: Pace) {
        self.form.pace = pace;
    }

    pub fn set_start_point(&mut self, id: Option<u32>) {
        self.form.start_point_id = id;
    }

    /// Add or remove a must-visit id (set semantics).
    pub fn toggle_must_visit(&mut self, id: u32) {
        if let Some(index) = self.form.must_visit_ids.iter().position(|&m| m == id) {
            self.form.must_visit_ids.remove(index);
        } else {
            self.form.must_visit_ids.push(id);
        }
    }

    pub fn set_algorithm_params(&mut self, params: Option<AlgorithmParams>) {
        self.form.algorithm_params = params;
    }

    /// Switch city. Start-point and must-visit selections are cleared
    /// immediately: their ids only meant something in the old catalog.
    /// The returned ticket gates the eventual catalog response.
    pub fn set_city(&mut self, city: impl Into<String>) -> CatalogTicket {
        self.form.city = city.into();
        self.form.start_point_id = None;
        self.form.must_visit_ids.clear();
        self.catalog_generation += 1;
        CatalogTicket(self.catalog_generation)
    }

    /// Install a fetched catalog. A response for anything but the latest
    /// city switch is dropped.
    pub fn apply_catalog(&mut self, ticket: CatalogTicket, locations: Vec<Location>) -> bool {
        if ticket.0 != self.catalog_generation {
            tracing::debug!("dropping stale catalog response for generation {}", ticket.0);
            return false;
        }
        self.catalog = CityCatalog {
            city: self.form.city.clone(),
            locations,
        };
        true
    }

    // ------------------------------------------------------------------
    // Submission lifecycle
    // ------------------------------------------------------------------

    /// Snapshot the form into a request and enter `Submitting`.
    ///
    /// A second call while a request is outstanding is allowed; it simply
    /// supersedes the first ticket.
    pub fn begin_submit(&mut self) -> (SubmitTicket, OptimizeRequest) {
        self.submit_generation += 1;
        self.phase = SessionPhase::Submitting;
        let request = OptimizeRequest {
            city: self.form.city.clone(),
            budget: self.form.budget,
            start_time: self.form.start_time,
            end_time: self.form.end_time,
            interests: Vec::new(),
            pace: self.form.pace,
            start_point_id: self.form.start_point_id,
            must_visit_ids: self.form.must_visit_ids.clone(),
            algorithm_params: self.form.algorithm_params.clone(),
        };
        (SubmitTicket(self.submit_generation), request)
    }

    /// Apply a submission outcome. Only the latest ticket is honored; a
    /// failure leaves the previously displayed result intact.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<OptimizeResponse, EngineError>,
        now_ms: u64,
    ) -> SubmitOutcome {
        if ticket.0 != self.submit_generation {
            tracing::debug!("dropping superseded optimize response for generation {}", ticket.0);
            return SubmitOutcome::Stale;
        }
        self.phase = SessionPhase::Idle;

        let response = match outcome {
            Ok(response) => response,
            Err(err @ EngineError::Transport(_)) => {
                let message = err.to_string();
                self.last_error = Some(message.clone());
                return SubmitOutcome::TransportFailed(message);
            }
            Err(EngineError::Rejected(message)) => {
                self.last_error = Some(message.clone());
                return SubmitOutcome::Rejected(message);
            }
        };

        match response.into_result() {
            Ok(result) => {
                self.accept_result(result, now_ms);
                SubmitOutcome::Accepted
            }
            Err(err) => {
                let message = err.to_string();
                self.last_error = Some(message.clone());
                SubmitOutcome::Rejected(message)
            }
        }
    }

    /// Blocking convenience: begin, call the backend, complete.
    pub fn submit(&mut self, backend: &impl PlannerBackend) -> SubmitOutcome {
        let (ticket, request) = self.begin_submit();
        let outcome = backend.optimize(&request);
        self.complete_submit(ticket, outcome, epoch_millis())
    }

    /// Blocking convenience: switch city and refresh the catalog. On a
    /// fetch failure the previous catalog stays in place and the error is
    /// surfaced; the selections are already reset either way.
    pub fn change_city(
        &mut self,
        backend: &impl PlannerBackend,
        city: impl Into<String>,
    ) -> Result<bool, EngineError> {
        let ticket = self.set_city(city);
        let locations = backend.locations(&self.form.city)?;
        Ok(self.apply_catalog(ticket, locations))
    }

    fn accept_result(&mut self, result: ItineraryResult, now_ms: u64) {
        if !result.count_consistent() {
            tracing::warn!(
                "engine reported location_count {} for {} itinerary stops",
                result.location_count,
                result.itinerary.len()
            );
        }

        let query = self.snapshot_query();
        let entry = HistoryEntry {
            query: query.clone(),
            result: result.clone(),
            timestamp: now_ms,
        };
        // The in-memory store is updated even when persistence fails;
        // recover the stored key from the front of the list in that case.
        let history_key = match self.history.append(entry) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!("history not persisted: {}", err);
                self.history.entries().first().map(|e| e.timestamp)
            }
        };

        self.last_error = None;
        self.active = Some(ActiveTrip {
            query,
            result,
            history_key,
        });
        self.refresh_derived();
    }

    fn snapshot_query(&self) -> TripQuery {
        TripQuery {
            city: self.form.city.clone(),
            budget: self.form.budget,
            start_time: self.form.start_time,
            end_time: self.form.end_time,
            pace: self.form.pace,
            start_point_id: self.form.start_point_id,
            must_visit_ids: self.form.must_visit_ids.clone(),
        }
    }

    /// Recompute everything derived from the active itinerary. Full
    /// recompute is correct and cheap at this scale.
    fn refresh_derived(&mut self) {
        match &self.active {
            Some(active) => {
                self.arrival_labels = arrival_labels(
                    active.query.start_time,
                    &active.result.itinerary,
                    self.clock_policy,
                );
                let center = map::city_center(&active.query.city).unwrap_or(DEFAULT_CENTER);
                self.map_view = Some(MapView::sync(&active.result.itinerary, center));
            }
            None => {
                self.arrival_labels.clear();
                self.map_view = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // History interplay
    // ------------------------------------------------------------------

    /// Display a cached entry: timeline and map are re-fed from the cache
    /// without a network call. Returns false for an unknown key.
    pub fn select_history(&mut self, timestamp: u64) -> bool {
        let Some(entry) = self.history.select(timestamp) else {
            return false;
        };
        let query = entry.query.clone();
        let result = entry.result.clone();
        self.active = Some(ActiveTrip {
            query,
            result,
            history_key: Some(timestamp),
        });
        self.refresh_derived();
        true
    }

    /// Delete a cache entry. If it was the one on detail display, the
    /// display is cleared with it.
    pub fn remove_history(&mut self, timestamp: u64) -> Result<(), StorageError> {
        let was_displayed = self.history.selected_key() == Some(timestamp);
        let persisted = self.history.remove(timestamp);
        if was_displayed {
            self.active = None;
            self.refresh_derived();
        }
        persisted
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        let had_selection = self.history.selected_key().is_some();
        let persisted = self.history.clear();
        if had_selection {
            self.active = None;
            self.refresh_derived();
        }
        persisted
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn form(&self) -> &TripForm {
        &self.form
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn active(&self) -> Option<&ActiveTrip> {
        self.active.as_ref()
    }

    pub fn active_result(&self) -> Option<&ItineraryResult> {
        self.active.as_ref().map(|active| &active.result)
    }

    /// Arrival clock label per stop of the displayed itinerary.
    pub fn arrival_labels(&self) -> &[String] {
        &self.arrival_labels
    }

    pub fn map_view(&self) -> Option<&MapView> {
        self.map_view.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn selected_history(&self) -> Option<&HistoryEntry> {
        self.history.selected()
    }
}
