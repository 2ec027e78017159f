//! `yc-plot` library crate.
//!
//! The binary (`ycp`) is a thin wrapper around this library so that:
//!
//! - loading and chart building are testable without spawning processes
//! - rendering surfaces (PNG, terminal) share one chart description

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
