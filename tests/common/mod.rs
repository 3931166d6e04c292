//! Common test utilities for the save manager.
//!
//! - `cli`: CLI runner with a sandboxed data folder and fluent assertions
//! - `env`: Environment variable guards
//! - `fixtures`: Save folder trees on disk
//! - `assertions`: JSON and text assertion helpers
#![allow(dead_code)]

pub mod cli;
pub mod env;
pub mod fixtures;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
