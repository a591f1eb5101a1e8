//! CanIEat CLI library.
//!
//! Exposes the command handlers for integration testing.
//! In production, `canieat` is used as a binary (main.rs).

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
