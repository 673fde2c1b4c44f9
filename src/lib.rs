//! Panelink links a host process to a sandboxed UI panel through typed
//! message envelopes.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`protocol`] defines the envelope vocabulary in both directions and its
//!   JSON wire form.
//! - [`core`] owns the per-panel message bus, the mirrored host state, the
//!   built-in model list, configuration, and the mounted session.
//! - [`ui`] implements the generic selector state machine, its outside-click
//!   listener, and the model and system prompt selectors built on it.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into
//! [`cli::session`] for the stdio-driven panel.

pub mod cli;
pub mod core;
pub mod protocol;
pub mod ui;
pub mod utils;
