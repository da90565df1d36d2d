//! Terminal front end for paging through San Francisco food truck listings.
//!
//! The paging session itself lives in `truck_session`; this crate holds the
//! pieces that touch the terminal and the process environment.
//!
//! # Public API Overview
//! - Read environment configuration with [`EnvConfig::from_env`] and install
//!   logging with [`init_logging`].
//! - Decode navigation keys with [`parse_key`] and [`NavKey`].
//! - Switch stdin to key-at-a-time input with [`KeyModeGuard`] and read keys
//!   with [`KeyReader`].
//! - Lay out result pages with [`render_table`].

pub mod config;
pub mod input;
pub mod logging;
pub mod render;
pub mod terminal;

/// Environment configuration.
pub use crate::config::EnvConfig;
/// Key decoding and navigation bindings.
pub use crate::input::{parse_key, split_sequences, NavKey};
/// Logging bootstrap.
pub use crate::logging::{init_logging, LogTarget};
/// Page rendering helpers and user-facing texts.
pub use crate::render::{
    fit_to_width, invalid_prompt_line, render_table, visible_width, HELP_TEXT, INVALID_PROMPT,
    NAVIGATION_HINT, NO_RESULTS,
};
/// Terminal mode handling.
pub use crate::terminal::{restore_on_signal, stdout_columns, terminal_columns, KeyModeGuard, KeyReader};
