// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model Type Definitions
//!
//! This crate defines the intermediate model of a Mule configuration that the
//! flowport converter consumes:
//! - Deserialization of the model from JSON produced by the upstream parser
//! - Type-safe access to flows, processors and global configurations
//! - JSON Schema export via schemars

mod model;

pub use model::*;

// Schema generation for model consumers
pub mod schema;

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a root model from a JSON Value
pub fn parse_root(json: &serde_json::Value) -> Result<Root, String> {
    serde_json::from_value(json.clone()).map_err(|e| format!("Failed to parse model: {}", e))
}

/// Parse a root model from JSON text
pub fn parse_root_str(json: &str) -> Result<Root, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse model: {}", e))
}
