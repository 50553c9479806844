//! Demo command line driver.
//!
//! Loads a local-scan snapshot and a remote catalog snapshot from JSON, runs
//! them through the worker thread exactly as a host application would and
//! prints the resulting list.
//!
//! # Usage
//!
//! ```text
//! modcatalog local=installed.json remote=catalog.json [query=busy] [sort=name]
//!            [settings_file=settings.json] [config=modcatalog.toml]
//!            [trace_level=debug] [footer_height_px=48]
//! ```
//!
//! Arguments are `key=value` pairs. Without `config=` the remaining keys are
//! read as configuration (see [`Config::from_map`]).
//!
//! # Flow
//!
//! ```text
//! main ──WorkerMessage──▶ worker thread ──WorkerResponse──▶ handle_event ──▶ TextSurface
//!   ▲                                                            │
//!   └─────────────────────── Action::PostToWorker ◀──────────────┘
//! ```

#![allow(clippy::multiple_crate_versions)]

use crossbeam_channel::{Receiver, Sender};
use modcatalog::domain::NeverSuppress;
use modcatalog::storage::{load_local_snapshot, load_remote_snapshot, StaticCatalog};
use modcatalog::ui::{render, RenderSurface, TextSurface};
use modcatalog::{handle_event, initialize, Action, AppState, CatalogError, Config, Event, Result};
use modcatalog::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// Host-side plumbing around the library state.
struct Host {
    app: AppState,
    surface: TextSurface,
    requests: Sender<WorkerMessage>,
    responses: Receiver<WorkerResponse>,
    /// Messages posted and not yet answered.
    outstanding: usize,
}

impl Host {
    fn post(&mut self, message: WorkerMessage) -> Result<()> {
        self.requests
            .send(message)
            .map_err(|e| CatalogError::Worker(format!("worker is gone: {e}")))?;
        self.outstanding += 1;
        Ok(())
    }

    fn dispatch(&mut self, event: &Event) -> Result<()> {
        let (_, actions) = handle_event(&mut self.app, event)?;
        for action in actions {
            match action {
                Action::PostToWorker(message) => self.post(message)?,
                Action::ApplyUpdate(update) => self.surface.apply(&update),
                Action::OpenInstaller { module_id, target } => {
                    println!("install {module_id} from {} ({})", target.zip_url, target.source);
                }
            }
        }
        Ok(())
    }

    /// Feeds worker responses to the handler until every request is answered.
    fn settle(&mut self) -> Result<()> {
        while self.outstanding > 0 {
            let response = self
                .responses
                .recv()
                .map_err(|e| CatalogError::Worker(format!("worker stopped early: {e}")))?;
            self.outstanding -= 1;
            self.dispatch(&Event::WorkerResponse(response))?;
        }
        Ok(())
    }
}

fn parse_args() -> BTreeMap<String, String> {
    std::env::args()
        .skip(1)
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        })
        .collect()
}

fn run(args: &BTreeMap<String, String>) -> Result<()> {
    let config = match args.get("config") {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_map(args),
    };

    let local = match args.get("local") {
        Some(path) => load_local_snapshot(Path::new(path))?,
        None => Vec::new(),
    };
    let remote = match args.get("remote") {
        Some(path) => load_remote_snapshot(Path::new(path))?,
        None => Vec::new(),
    };

    let catalog = Arc::new(StaticCatalog::new(remote));
    let (app, worker) = initialize(&config, catalog, Arc::new(NeverSuppress))?;

    let (request_tx, request_rx) = crossbeam_channel::unbounded();
    let (response_tx, response_rx) = crossbeam_channel::unbounded();
    let handle = worker.spawn(request_rx, response_tx)?;

    let mut host = Host {
        app,
        surface: TextSurface::new(),
        requests: request_tx,
        responses: response_rx,
        outstanding: 0,
    };

    if let Some(query) = args.get("query") {
        host.dispatch(&Event::QueryChanged(query.clone()))?;
    }
    if args.get("sort").is_some_and(|s| s == "name") {
        host.dispatch(&Event::CycleSortMode)?;
    }
    host.post(WorkerMessage::local_scan_completed(local))?;
    host.post(WorkerMessage::catalog_updated())?;
    host.settle()?;

    let now = chrono::Utc::now().timestamp();
    render(&host.app.compute_viewmodel(now));

    let Host { requests, .. } = host;
    drop(requests);
    handle
        .join()
        .map_err(|_| CatalogError::Worker("worker thread panicked".to_string()))
}

fn main() -> ExitCode {
    let args = parse_args();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "modcatalog failed");
            eprintln!("modcatalog: {e}");
            ExitCode::FAILURE
        }
    }
}
