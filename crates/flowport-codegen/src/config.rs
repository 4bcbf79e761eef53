// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Converter configuration.

use std::env;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;
/// Default endpoint host when a listener connection omits it.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listener port when a listener connection omits it.
pub const DEFAULT_PORT: u16 = 8081;
/// Default connection idle timeout in milliseconds.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;

/// Options that shape the generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Spaces per indentation level (default: 4)
    pub indent_width: usize,
    /// Endpoint host substituted when absent on the source node (default: "0.0.0.0")
    pub default_host: String,
    /// Listener port substituted when absent on the source node (default: 8081)
    pub default_port: u16,
    /// Idle timeout substituted when absent on the source node (default: 30_000)
    pub default_idle_timeout_ms: u64,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            default_host: DEFAULT_HOST.to_string(),
            default_port: DEFAULT_PORT,
            default_idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }
}

impl CodegenConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `FLOWPORT_INDENT_WIDTH` - Spaces per indentation level (default: 4)
    /// - `FLOWPORT_DEFAULT_HOST` - Endpoint host default (default: "0.0.0.0")
    /// - `FLOWPORT_DEFAULT_PORT` - Listener port default (default: 8081)
    /// - `FLOWPORT_DEFAULT_IDLE_TIMEOUT_MS` - Idle timeout default (default: 30000)
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let indent_width = lookup("FLOWPORT_INDENT_WIDTH")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INDENT_WIDTH);

        let default_host =
            lookup("FLOWPORT_DEFAULT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let default_port = lookup("FLOWPORT_DEFAULT_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let default_idle_timeout_ms = lookup("FLOWPORT_DEFAULT_IDLE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_IDLE_TIMEOUT_MS);

        Self {
            indent_width,
            default_host,
            default_port,
            default_idle_timeout_ms,
        }
    }
}
