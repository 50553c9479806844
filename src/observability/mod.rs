//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Spans land in `modcatalog-spans.json` inside the data directory, one OTLP
//! JSON document per line. The file rotates at 10 MiB and keeps three backups.
//!
//! Level resolution: `RUST_LOG`, then `trace_level` from [`Config`](crate::Config),
//! then `"info"`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - `tracer`: tracer provider with file export
//! - `span_formatter`: OTLP JSON serialization
//! - `file_writer`: rotating file writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
