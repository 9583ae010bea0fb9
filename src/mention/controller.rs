//! Mention query lifecycle
//!
//! Turns query-text changes into lookups on the worker and applies their
//! outcomes to the suggestion list. Every lookup is tagged with a generation;
//! only the outcome of the generation currently in flight ever reaches the view.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use super::lookup::{LookupClient, LookupRequest};
use super::selection::to_mention_reference;
use super::session::SessionContext;
use super::suggestion::{SuggestionItem, map_candidates};
use super::view::{MentionSink, SuggestionListView};
use super::worker::{LookupCommand, LookupResponse, RetryPolicy, spawn_worker};
use crate::error::MentionError;

/// Default number of candidates requested per lookup
pub const DEFAULT_LIMIT: u32 = 20;

/// Where the latest generation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// No query, or the last query was cleared
    Idle,
    Requesting { generation: u64 },
    Succeeded { generation: u64 },
    Failed { generation: u64 },
}

/// Drives mention lookups for one composer
pub struct QueryController {
    session: SessionContext,
    limit: u32,
    view: Box<dyn SuggestionListView>,
    sink: Box<dyn MentionSink>,
    /// Channel to send commands to the worker thread
    command_tx: Option<UnboundedSender<LookupCommand>>,
    /// Channel to receive outcomes from the worker thread
    response_rx: Option<Receiver<LookupResponse>>,
    /// Incremented for each lookup issued
    generation: u64,
    /// Generation whose outcome is still awaited
    in_flight: Option<u64>,
    /// Query of the generation in flight or on screen, used to skip repeats
    current_query: Option<String>,
    /// Items currently rendered
    items: Vec<SuggestionItem>,
    phase: QueryPhase,
}

impl QueryController {
    /// Create a controller without a worker
    ///
    /// Call [`set_channels`](Self::set_channels) before issuing queries; until
    /// then every lookup fails immediately.
    pub fn new(
        session: SessionContext,
        view: Box<dyn SuggestionListView>,
        sink: Box<dyn MentionSink>,
    ) -> Self {
        Self {
            session,
            limit: DEFAULT_LIMIT,
            view,
            sink,
            command_tx: None,
            response_rx: None,
            generation: 0,
            in_flight: None,
            current_query: None,
            items: Vec::new(),
            phase: QueryPhase::Idle,
        }
    }

    /// Create a controller backed by a freshly spawned lookup worker
    ///
    /// The worker thread exits when the controller is dropped.
    pub fn with_worker(
        session: SessionContext,
        client: Arc<dyn LookupClient>,
        policy: RetryPolicy,
        view: Box<dyn SuggestionListView>,
        sink: Box<dyn MentionSink>,
    ) -> Result<Self, MentionError> {
        let (command_tx, command_rx) = unbounded_channel();
        let (response_tx, response_rx) = mpsc::channel();

        spawn_worker(client, policy, command_rx, response_tx)?;

        let mut controller = Self::new(session, view, sink);
        controller.set_channels(command_tx, response_rx);
        Ok(controller)
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        command_tx: UnboundedSender<LookupCommand>,
        response_rx: Receiver<LookupResponse>,
    ) {
        self.command_tx = Some(command_tx);
        self.response_rx = Some(response_rx);
    }

    /// Maximum number of candidates asked for per lookup
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
    }

    /// Handle a change of the text typed after the trigger
    ///
    /// Empty text clears the list synchronously and abandons any in-flight
    /// lookup. Non-empty text starts a new generation unless it repeats the
    /// query already in flight or on screen. Never blocks.
    pub fn on_query_changed(&mut self, text: &str) {
        if text.is_empty() {
            self.clear_query();
            return;
        }

        if self.current_query.as_deref() == Some(text) {
            log::debug!("Query {:?} unchanged, keeping generation {}", text, self.generation);
            return;
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let request = LookupRequest::new(&self.session, text, self.limit);

        self.in_flight = Some(generation);
        self.current_query = Some(text.to_string());
        self.phase = QueryPhase::Requesting { generation };

        let sent = self
            .command_tx
            .as_ref()
            .is_some_and(|tx| tx.send(LookupCommand::Query { request, generation }).is_ok());

        if !sent {
            log::warn!(
                "Lookup worker unavailable, dropping generation {}",
                generation
            );
            self.fail_generation(generation);
        }
    }

    /// Apply every outcome the worker has delivered so far
    ///
    /// Returns true if the suggestion list changed.
    pub fn poll_responses(&mut self) -> bool {
        let responses: Vec<LookupResponse> = match &self.response_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return false,
        };

        let mut changed = false;
        for response in responses {
            changed |= self.handle_response(response);
        }
        changed
    }

    /// Apply one worker outcome if it belongs to the generation in flight
    ///
    /// Returns false for stale outcomes, which are discarded.
    pub fn handle_response(&mut self, response: LookupResponse) -> bool {
        let generation = response.generation();
        if self.in_flight != Some(generation) {
            log::debug!(
                "Discarding stale response for generation {} (in flight: {:?})",
                generation,
                self.in_flight
            );
            return false;
        }
        self.in_flight = None;

        match response {
            LookupResponse::Completed { candidates, .. } => {
                let items = map_candidates(&candidates, &self.session.account);
                self.phase = QueryPhase::Succeeded { generation };
                self.replace_items(items);
            }
            LookupResponse::Failed {
                error, attempts, ..
            } => {
                log::warn!(
                    "Mention lookup failed after {} attempt(s), clearing suggestions: {}",
                    attempts,
                    error
                );
                self.fail_generation(generation);
            }
            LookupResponse::Cancelled { .. } => {
                log::debug!("Generation {} cancelled by worker", generation);
                self.fail_generation(generation);
            }
        }
        true
    }

    /// Handle a click on the rendered row at `index`
    ///
    /// Emits the mention to the sink and returns true. Clicks on rows that no
    /// longer exist are ignored.
    pub fn on_suggestion_clicked(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            log::debug!(
                "Ignoring click on row {} ({} rendered)",
                index,
                self.items.len()
            );
            return false;
        };

        self.sink.emit_mention(to_mention_reference(item));
        true
    }

    /// Items currently rendered
    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    /// Generation of the most recently issued lookup
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    pub fn has_in_flight_request(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn clear_query(&mut self) {
        if let Some(generation) = self.in_flight.take()
            && let Some(tx) = &self.command_tx
            && tx.send(LookupCommand::Cancel { generation }).is_ok()
        {
            log::debug!("Sent cancel for generation {}", generation);
        }

        self.current_query = None;
        self.phase = QueryPhase::Idle;
        self.items.clear();
        self.view.clear();
    }

    fn replace_items(&mut self, items: Vec<SuggestionItem>) {
        if items.is_empty() {
            self.items.clear();
            self.view.clear();
        } else {
            self.items = items;
            self.view.render(&self.items);
        }
    }

    fn fail_generation(&mut self, generation: u64) {
        self.in_flight = None;
        self.current_query = None;
        self.phase = QueryPhase::Failed { generation };
        self.items.clear();
        self.view.clear();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
