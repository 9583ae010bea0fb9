//! Lookup Worker Thread
//!
//! Runs mention lookups on a background thread so the event loop never blocks.
//! Receives commands over an unbounded channel, runs each generation's lookup as
//! its own task with retries, and sends the outcome back to the controller.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use super::lookup::{LookupClient, LookupError, LookupRequest};
use super::suggestion::RawCandidate;
use crate::error::MentionError;

/// Commands sent from the controller to the worker
#[derive(Debug)]
pub enum LookupCommand {
    /// Run a lookup for a new generation, superseding any older one
    Query {
        request: LookupRequest,
        generation: u64,
    },
    /// The controller lost interest in this generation
    Cancel { generation: u64 },
}

/// Outcomes sent from the worker back to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    /// Lookup succeeded (possibly with zero candidates)
    Completed {
        generation: u64,
        candidates: Vec<RawCandidate>,
    },
    /// Every attempt failed
    Failed {
        generation: u64,
        error: LookupError,
        attempts: u32,
    },
    /// Superseded or cancelled before it finished
    Cancelled { generation: u64 },
}

impl LookupResponse {
    pub fn generation(&self) -> u64 {
        match self {
            LookupResponse::Completed { generation, .. }
            | LookupResponse::Failed { generation, .. }
            | LookupResponse::Cancelled { generation } => *generation,
        }
    }
}

/// How hard the worker tries before giving up on a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per generation, including the first
    pub max_attempts: u32,
    /// Deadline for a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(5000),
        }
    }
}

/// Spawn the lookup worker thread
///
/// The thread owns a current-thread tokio runtime and exits once every command
/// sender has been dropped.
pub fn spawn_worker(
    client: Arc<dyn LookupClient>,
    policy: RetryPolicy,
    command_rx: UnboundedReceiver<LookupCommand>,
    response_tx: Sender<LookupResponse>,
) -> Result<JoinHandle<()>, MentionError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let handle = std::thread::Builder::new()
        .name("mention-lookup".to_string())
        .spawn(move || {
            runtime.block_on(worker_loop(client, policy, command_rx, response_tx));
        })?;

    Ok(handle)
}

/// Main worker loop - processes commands until the channel is closed
async fn worker_loop(
    client: Arc<dyn LookupClient>,
    policy: RetryPolicy,
    mut command_rx: UnboundedReceiver<LookupCommand>,
    response_tx: Sender<LookupResponse>,
) {
    let mut active: Option<(u64, CancellationToken)> = None;

    while let Some(command) = command_rx.recv().await {
        match command {
            LookupCommand::Query {
                request,
                generation,
            } => {
                if let Some((previous, token)) = active.take() {
                    token.cancel();
                    log::debug!("Generation {} superseded by {}", previous, generation);
                }

                let token = CancellationToken::new();
                active = Some((generation, token.clone()));

                let client = Arc::clone(&client);
                let response_tx = response_tx.clone();
                tokio::spawn(async move {
                    let response =
                        run_lookup(client.as_ref(), &request, generation, policy, &token).await;
                    // Controller dropped; nothing left to deliver to
                    let _ = response_tx.send(response);
                });
            }
            LookupCommand::Cancel { generation } => {
                if active.as_ref().is_some_and(|(g, _)| *g == generation) {
                    if let Some((_, token)) = active.take() {
                        token.cancel();
                    }
                    log::debug!("Cancelled generation {}", generation);
                } else {
                    log::debug!("Ignoring cancel for inactive generation {}", generation);
                }
            }
        }
    }

    log::debug!("Lookup worker shutting down");
}

/// Run one generation's lookup with retries
///
/// Stops early when `cancel_token` fires. A timed-out attempt counts as a failed
/// attempt.
pub async fn run_lookup(
    client: &dyn LookupClient,
    request: &LookupRequest,
    generation: u64,
    policy: RetryPolicy,
    cancel_token: &CancellationToken,
) -> LookupResponse {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log::debug!("Generation {} cancelled before attempt {}", generation, attempt);
                return LookupResponse::Cancelled { generation };
            }
            result = attempt_lookup(client, request, policy.attempt_timeout) => result,
        };

        match outcome {
            Ok(candidates) => {
                return LookupResponse::Completed {
                    generation,
                    candidates,
                };
            }
            Err(error) if attempt >= max_attempts => {
                log::warn!(
                    "Lookup for generation {} failed after {} attempt(s): {}",
                    generation,
                    attempt,
                    error
                );
                return LookupResponse::Failed {
                    generation,
                    error,
                    attempts: attempt,
                };
            }
            Err(error) => {
                log::debug!(
                    "Lookup attempt {}/{} for generation {} failed: {}",
                    attempt,
                    max_attempts,
                    generation,
                    error
                );
            }
        }
    }
}

async fn attempt_lookup(
    client: &dyn LookupClient,
    request: &LookupRequest,
    timeout: Duration,
) -> Result<Vec<RawCandidate>, LookupError> {
    match tokio::time::timeout(timeout, client.lookup(request)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout(timeout.as_millis() as u64)),
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
