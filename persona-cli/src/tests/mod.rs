//! Shared test harness modules for the Persona CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod submit_steps;
mod submit_unit;
