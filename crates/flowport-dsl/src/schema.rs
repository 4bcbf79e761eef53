// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model Schema Generation
//!
//! Generates JSON Schema for the intermediate model from the Rust type
//! definitions using schemars.

use schemars::schema_for;
use serde_json::Value;

use crate::{MODEL_VERSION, Root};

/// Generate the JSON Schema of the root model document.
pub fn generate_model_schema() -> Value {
    let schema = schema_for!(Root);
    let mut schema_json = serde_json::to_value(&schema).unwrap_or(Value::Null);

    if let Value::Object(ref mut map) = schema_json {
        map.insert(
            "x-model-version".to_string(),
            Value::String(MODEL_VERSION.to_string()),
        );
    }

    schema_json
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_version_and_processor_definitions() {
        let schema = generate_model_schema();
        assert_eq!(schema["x-model-version"], MODEL_VERSION);

        let definitions = schema["definitions"].as_object().unwrap();
        assert!(definitions.contains_key("Processor"));
        assert!(definitions.contains_key("GlobalConfiguration"));
    }
}
