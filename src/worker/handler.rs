//! Worker thread implementation for source updates and reconciliation passes.
//!
//! The worker owns all writes to the record store that come from the external
//! collaborators. It runs a pass after each message and posts the outcome to
//! the UI thread over a channel, the only synchronization point the renderer
//! sees.

use crate::domain::error::{CatalogError, Result};
use crate::reconcile::ReconciliationEngine;
use crate::storage::RemoteCatalog;
use crate::worker::{WorkerMessage, WorkerResponse};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Background worker applying source updates to a shared engine.
pub struct CatalogWorker {
    engine: Arc<ReconciliationEngine>,
    catalog: Arc<dyn RemoteCatalog>,
}

impl CatalogWorker {
    #[must_use]
    pub fn new(engine: Arc<ReconciliationEngine>, catalog: Arc<dyn RemoteCatalog>) -> Self {
        Self { engine, catalog }
    }

    /// Helper for handling fallible operations with consistent logging.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn run_pass(&self) -> WorkerResponse {
        self.engine
            .build()
            .map_or(WorkerResponse::PassSkipped, |list| WorkerResponse::ListBuilt { list })
    }

    fn handle_local_scan(&self, modules: Vec<crate::domain::LocalInfo>) -> WorkerResponse {
        let count = modules.len();
        let pruned = self.engine.replace_local(modules);
        tracing::debug!(module_count = count, pruned = pruned.len(), "local snapshot replaced");
        self.run_pass()
    }

    fn handle_catalog_updated(&self) -> WorkerResponse {
        Self::handle_result(
            "merge remote catalog",
            self.engine.merge_remote(self.catalog.as_ref()),
            |count| {
                tracing::debug!(module_count = count, "remote snapshot replaced");
                self.run_pass()
            },
        )
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes one message and returns the response for the UI thread.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::LocalScanCompleted { modules, .. } => self.handle_local_scan(modules),
            WorkerMessage::CatalogUpdated { .. } => self.handle_catalog_updated(),
            WorkerMessage::RaiseNotification { kind, special, .. } => {
                self.engine.add_notification(kind, special);
                self.run_pass()
            }
            WorkerMessage::Rebuild { .. } => self.run_pass(),
        }
    }

    /// Moves the worker onto its own thread.
    ///
    /// The thread runs until `requests` is closed or the UI side drops
    /// `responses`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Worker`] if the thread cannot be spawned.
    pub fn spawn(
        self,
        requests: Receiver<WorkerMessage>,
        responses: Sender<WorkerResponse>,
    ) -> Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("modcatalog-worker".to_string())
            .spawn(move || {
                for message in requests {
                    let response = self.handle_message(message);
                    if responses.send(response).is_err() {
                        tracing::debug!("response channel closed, stopping worker");
                        break;
                    }
                }
                tracing::debug!("worker stopped");
            })
            .map_err(|e| CatalogError::Worker(format!("failed to spawn worker thread: {e}")))
    }
}
