//! Shared test harness modules for the waymark CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod acquire_unit;
mod helpers;
