//! User interface layer.
//!
//! Transforms the rendered record list into display rows and applies diffed
//! updates to a rendering surface.
//!
//! # Architecture
//!
//! ```text
//! RenderUpdate → RenderSurface::apply → rows
//! AppState → compute_viewmodel → CatalogViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Rendering surface and text output
//! - [`helpers`]: Fuzzy match highlighting

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_to_string, RenderSurface, TextSurface};
pub use viewmodel::{CatalogViewModel, DisplayRow, EmptyState, HeaderInfo, RowContext, RowKind};
