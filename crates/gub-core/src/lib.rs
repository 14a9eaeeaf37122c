//! Core domain + application logic for the GitHub unfollowers bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the GitHub
//! API live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod diff;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod lookup;
pub mod messaging;
pub mod relations;
pub mod report;
pub mod security;

pub use errors::{Error, Result};
