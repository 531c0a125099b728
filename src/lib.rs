//! tripartite-rs: axis and layout engine for tripartite charts.
//!
//! A tripartite chart plots pseudo-velocity against frequency (or period) on
//! log-log axes and overlays two families of diagonal lines of constant
//! displacement and constant acceleration. This crate computes separators,
//! labels, diagonals and margins, and drives a retained-mode
//! `render::GeometryBackend` with them; actual drawing stays with the host.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, TripartiteChart};
pub use error::{ChartError, ChartResult};
