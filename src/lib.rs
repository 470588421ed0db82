//! Keyboard-driven command palette for Buildkite: fuzzy and weighted search,
//! command matching with aliases, sectioned keyboard navigation.

pub mod actions;
pub mod aliases;
pub mod app;
pub mod backend;
pub mod builds;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod logging;
pub mod nav;
pub mod prefs;
pub mod search;
pub mod state;
pub mod store;
pub mod ui;
