//! # bitskip-viz
//!
//! Terminal dashboard for the results of "BitSkip: An Empirical Analysis of
//! Quantization and Early Exit Composition" (Bhuvaneswaran & Liu, 2025).
//!
//! All data is embedded at compile time. The crate has no network or file
//! inputs; it renders the published tables and figures as three tabbed
//! views:
//!
//! - **Overview & Architecture**: the four variants as cards, research
//!   questions, and the winning configuration
//! - **Phase 1: Intrinsic Analysis**: perplexity by exit depth (log scale)
//!   and per-layer activation variance
//! - **Phase 2: Early Exit Results**: quality vs. speed at layer 18, the
//!   quality degradation ranking, and the tradeoff summary table
//!
//! ## Modules
//!
//! - [`dataset`]: embedded tables, the [`dataset::Variant`] join key, JSON export
//! - [`derive`]: variance curves, log-axis projection, number formatting
//! - [`charts`]: encode data into chart encodings and render them
//! - [`cards`]: architecture cards and metric tiles
//! - [`app`]: tab state, key handling, page composition
//! - [`tui`]: interactive terminal loop and headless rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitskip_viz::app::{App, Tab};
//! use bitskip_viz::tui;
//!
//! let frame = tui::render_to_string(&App::new(Tab::EarlyExit), 120, 48)?;
//! assert!(frame.contains("Early Exit & Co-Design Results"));
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod cards;
pub mod charts;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod palette;
pub mod tui;

pub use error::{DashboardError, Result};
