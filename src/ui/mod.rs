//! Selector widgets for the UI panel.
//!
//! - [`selector`]: the generic Closed/Open state machine, its rows, and the
//!   seams ([`selector::OptionSource`], [`selector::SelectionEffect`]) the
//!   concrete selectors plug into.
//! - [`pointer`]: outside-click listeners scoped to an open selector.
//! - [`model_selector`] and [`prompt_selector`]: the two instantiations.
//!
//! Ownership boundary: widgets read host state through
//! [`crate::core::state::StateHandle`] and talk to the host only by sending
//! envelopes; they never mutate the store.

pub mod model_selector;
pub mod pointer;
pub mod prompt_selector;
pub mod selector;
