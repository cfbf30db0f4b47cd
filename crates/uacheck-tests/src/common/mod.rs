// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared test support: an in-memory address space (`mocks`), a node
//! builder that fills in each class's mandatory attributes (`builders`),
//! the plant model and config documents (`fixtures`) and report checks
//! (`assertions`).

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Routes tracing output to the test harness once per process.
///
/// `RUST_LOG` overrides the default of `warn,uacheck=debug`.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,uacheck=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Scratch directory removed when dropped.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("cannot create scratch directory")
}
