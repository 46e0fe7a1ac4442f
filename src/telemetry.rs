// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Logging setup. `RUST_LOG` takes precedence over the built-in filter.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, DEFAULT_LOG_FILTER};

/// Build the level filter from `RUST_LOG`, falling back to `default`.
pub fn env_filter(rust_log: Option<&str>, default: &str) -> EnvFilter {
    rust_log
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(format: LogFormat) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = env_filter(rust_log.as_deref(), DEFAULT_LOG_FILTER);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
            .ok(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
            .ok(),
    };
}
