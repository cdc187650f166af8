//! Tabstash: save the browser's windows, tabs and tab groups as named
//! snapshots and lay them out again later, possibly on different displays.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod host;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
