//! One interactive search session: filter fields, cached roster, visible
//! results and the open detail record.
//!
//! Network work runs in spawned tasks that report back over a channel; state
//! only changes when the owner applies those reports (`next_event`,
//! `apply_ready`). Every roster load, search and detail fetch is tagged with
//! a sequence number and anything but the latest is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::debouncer::Debouncer;
use super::query::SearchQuery;
use crate::api::{DirectoryApi, SearchTarget};
use crate::app_error::AppError;
use crate::models::faculty::{FacultyDetail, FacultyId, FacultyListItem};
use crate::models::update::{AdminCredentials, UpdateMessage};

#[derive(Debug)]
enum SessionEvent {
    RosterLoaded {
        seq: u64,
        outcome: Result<Vec<FacultyListItem>, AppError>,
    },
    SearchStarted {
        seq: u64,
        target: SearchTarget,
    },
    SearchFinished {
        seq: u64,
        outcome: Result<Vec<FacultyListItem>, AppError>,
    },
    DetailFinished {
        seq: u64,
        id: FacultyId,
        outcome: Result<FacultyDetail, AppError>,
    },
}

/// What applying one completion changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionChange {
    Roster,
    RosterUnavailable,
    Loading,
    Results,
    Selection,
    /// A superseded roster, search or detail response, dropped.
    Stale,
}

pub struct SearchSession {
    api: Arc<dyn DirectoryApi>,
    query: SearchQuery,
    roster: Option<Vec<FacultyListItem>>,
    roster_seq: u64,
    results: Vec<FacultyListItem>,
    selected: Option<FacultyDetail>,
    loading: bool,
    debouncer: Debouncer,
    search_seq: u64,
    detail_task: Option<JoinHandle<()>>,
    detail_seq: u64,
    detail_pending: Option<FacultyId>,
    bootstrap_task: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl SearchSession {
    pub fn new(api: Arc<dyn DirectoryApi>, debounce: Duration) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            api,
            query: SearchQuery::default(),
            roster: None,
            roster_seq: 0,
            results: Vec::new(),
            selected: None,
            loading: false,
            debouncer: Debouncer::new(debounce),
            search_seq: 0,
            detail_task: None,
            detail_seq: 0,
            detail_pending: None,
            bootstrap_task: None,
            events_tx,
            events_rx,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn roster(&self) -> Option<&[FacultyListItem]> {
        self.roster.as_deref()
    }

    pub fn results(&self) -> &[FacultyListItem] {
        &self.results
    }

    pub fn selected(&self) -> Option<&FacultyDetail> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail_pending.is_some()
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Fetches the full roster in the background. No automatic retry on
    /// failure; calling this again is the retry.
    pub fn bootstrap(&mut self) {
        if let Some(task) = self.bootstrap_task.take() {
            task.abort();
        }

        self.roster_seq += 1;
        let seq = self.roster_seq;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        self.bootstrap_task = Some(tokio::spawn(async move {
            let outcome = api.list_all().await;
            let _ = tx.send(SessionEvent::RosterLoaded { seq, outcome });
        }));
    }

    pub fn set_name(&mut self, text: impl Into<String>) {
        self.query.name = text.into();
        self.resolve();
    }

    pub fn set_interest(&mut self, text: impl Into<String>) {
        self.query.interest = text.into();
        self.resolve();
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.results.clear();
        self.resolve();
    }

    /// Explicit pick. Always refetches, even when the record is already open.
    pub fn select(&mut self, id: FacultyId) -> Result<(), AppError> {
        if !self.results.iter().any(|item| item.id == id) {
            return Err(AppError::NotFound(format!("Faculty {}", id)));
        }
        self.open_detail(id);
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.abort_detail();
        self.selected = None;
    }

    /// Runs the administrative refresh. Returns `None` without any request
    /// when either credential is blank.
    pub async fn admin_update(&mut self, credentials: &AdminCredentials) -> Option<UpdateMessage> {
        if !credentials.is_complete() {
            return None;
        }

        let message = match self.api.run_update(credentials).await {
            Ok(receipt) => {
                tracing::info!("directory refreshed: {} records", receipt.record_count);
                if let Some(task) = self.bootstrap_task.take() {
                    task.abort();
                }
                // A bootstrap roster already queued is older than the re-list.
                self.roster_seq += 1;

                self.roster = None;
                self.resolve();

                match self.api.list_after_update().await {
                    Ok(roster) => {
                        self.roster = Some(roster);
                        self.resolve();
                    }
                    Err(e) => e.report("re-list after refresh failed"),
                }

                UpdateMessage::Success {
                    record_count: receipt.record_count,
                }
            }
            Err(e) => {
                e.report("administrative refresh failed");
                UpdateMessage::from_error(&e)
            }
        };

        Some(message)
    }

    /// Waits for the next completion from a background task and applies it.
    pub async fn next_event(&mut self) -> Option<SessionChange> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Applies every completion already queued, without waiting.
    pub fn apply_ready(&mut self) -> Vec<SessionChange> {
        let mut changes = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            changes.push(self.apply(event));
        }
        changes
    }

    fn apply(&mut self, event: SessionEvent) -> SessionChange {
        match event {
            SessionEvent::RosterLoaded { seq, .. } if seq != self.roster_seq => {
                tracing::debug!(
                    "discarding stale roster #{} (latest #{})",
                    seq,
                    self.roster_seq
                );
                SessionChange::Stale
            }
            SessionEvent::RosterLoaded { outcome, .. } => {
                self.bootstrap_task = None;
                match outcome {
                    Ok(roster) => {
                        tracing::debug!("roster loaded: {} entries", roster.len());
                        self.roster = Some(roster);
                        self.resolve();
                        SessionChange::Roster
                    }
                    Err(e) => {
                        e.report("roster bootstrap failed");
                        SessionChange::RosterUnavailable
                    }
                }
            }
            SessionEvent::SearchStarted { seq, target } => {
                if seq != self.search_seq {
                    return SessionChange::Stale;
                }
                tracing::debug!("search #{} in flight: {}", seq, target);
                self.loading = true;
                SessionChange::Loading
            }
            SessionEvent::SearchFinished { seq, outcome } => {
                if seq != self.search_seq {
                    tracing::debug!(
                        "discarding stale search #{} (latest #{})",
                        seq,
                        self.search_seq
                    );
                    return SessionChange::Stale;
                }
                self.loading = false;
                let results = outcome.unwrap_or_else(|e| {
                    e.report("search failed");
                    Vec::new()
                });
                self.set_results(results);
                SessionChange::Results
            }
            SessionEvent::DetailFinished { seq, id, outcome } => {
                if seq != self.detail_seq {
                    tracing::debug!("discarding stale detail for faculty {}", id);
                    return SessionChange::Stale;
                }
                self.detail_task = None;
                self.detail_pending = None;
                self.selected = match outcome {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        e.report(&format!("detail fetch for faculty {} failed", id));
                        None
                    }
                };
                SessionChange::Selection
            }
        }
    }

    fn resolve(&mut self) {
        // Any search in flight or waiting is superseded from here on.
        self.search_seq += 1;
        self.loading = false;

        let target = match self.query.dispatch_target() {
            Some(target) => target,
            None => {
                if self.debouncer.cancel() {
                    tracing::debug!("filters cleared, pending search canceled");
                }
                let results = self.roster.clone().unwrap_or_default();
                self.set_results(results);
                return;
            }
        };

        let seq = self.search_seq;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        self.debouncer.schedule(move || async move {
            let _ = tx.send(SessionEvent::SearchStarted {
                seq,
                target: target.clone(),
            });
            let outcome = api.search(&target).await;
            let _ = tx.send(SessionEvent::SearchFinished { seq, outcome });
        });
    }

    fn set_results(&mut self, results: Vec<FacultyListItem>) {
        self.results = results;
        self.auto_open();
    }

    // A single remaining match opens by itself. Never closes anything.
    fn auto_open(&mut self) {
        let id = match self.results.as_slice() {
            [only] => only.id,
            _ => return,
        };
        if self.selected.as_ref().is_some_and(|detail| detail.id == id)
            || self.detail_pending == Some(id)
        {
            return;
        }
        self.open_detail(id);
    }

    fn open_detail(&mut self, id: FacultyId) {
        self.abort_detail();
        self.detail_pending = Some(id);

        let seq = self.detail_seq;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        self.detail_task = Some(tokio::spawn(async move {
            let outcome = api.faculty_detail(id).await;
            let _ = tx.send(SessionEvent::DetailFinished { seq, id, outcome });
        }));
    }

    fn abort_detail(&mut self) {
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }
        self.detail_seq += 1;
        self.detail_pending = None;
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }
        if let Some(task) = self.bootstrap_task.take() {
            task.abort();
        }
    }
}
