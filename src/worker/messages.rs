//! Worker thread message types for cross-thread communication.
//!
//! This module defines the protocol between the UI thread and the background
//! worker thread that owns source updates and reconciliation passes. It also
//! carries tracing context across the thread boundary so worker spans link to
//! the UI span that caused them.

use crate::domain::{LocalInfo, NotificationKind};
use crate::reconcile::BuiltList;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is always
    /// the case when no OpenTelemetry layer is installed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use modcatalog::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("Trace ID: {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    local_scan_completed(LocalScanCompleted { modules: Vec<LocalInfo> }),
    catalog_updated(CatalogUpdated {}),
    raise_notification(RaiseNotification { kind: NotificationKind, special: bool }),
    rebuild(Rebuild {}),
}

/// Messages sent to the worker thread.
///
/// Every message that changes the sources is followed by a pass, so each one
/// produces exactly one [`WorkerResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// The local scanner finished; `modules` replaces the local side wholesale.
    LocalScanCompleted {
        modules: Vec<LocalInfo>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// The fetcher published a new catalog; pull it and replace the remote side.
    CatalogUpdated {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// A host condition raised a banner.
    RaiseNotification {
        kind: NotificationKind,
        special: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Run a pass without changing the sources.
    Rebuild {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// The trace context captured when the message was created.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LocalScanCompleted { trace_context, .. }
            | Self::CatalogUpdated { trace_context }
            | Self::RaiseNotification { trace_context, .. }
            | Self::Rebuild { trace_context } => trace_context.as_ref(),
        }
    }

    /// Short name used as a span field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LocalScanCompleted { .. } => "local_scan_completed",
            Self::CatalogUpdated { .. } => "catalog_updated",
            Self::RaiseNotification { .. } => "raise_notification",
            Self::Rebuild { .. } => "rebuild",
        }
    }
}

/// Responses sent from the worker thread back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// A pass completed.
    ListBuilt {
        list: BuiltList,
    },

    /// A pass was requested while another was running and got dropped.
    PassSkipped,

    /// The operation failed; the rendered list must stay as it is.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
