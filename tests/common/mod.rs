#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - `fixtures`: well-known addresses and names
//! - `helpers`: widget construction and task scheduling helpers

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::{let_lookups_park, scripted_input, scripted_input_with_book};
