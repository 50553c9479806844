//! Background worker thread for source updates and reconciliation passes.
//!
//! The local scanner and the remote fetcher report through the worker, which
//! applies their snapshots to the engine, runs a pass and posts the result to
//! the UI thread over a `crossbeam-channel`. Trace context travels with every
//! message.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
