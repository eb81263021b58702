//! Command implementations for the Aero CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod airports;
pub mod build;
pub mod flights;
pub mod query;
pub mod status;
