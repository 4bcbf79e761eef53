// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion error types.
//!
//! Every variant is a defect to fail loudly on: a run either produces complete
//! source text or nothing.

use thiserror::Error;

/// Errors that can occur while converting a model to source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The input model violates a structural precondition.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// A global declaration name is already taken.
    #[error("duplicate global declaration '{name}'")]
    DuplicateName {
        /// The colliding name
        name: String,
    },

    /// A service with the same name was already registered.
    #[error("duplicate service '{name}'")]
    DuplicateService {
        /// The colliding service name
        name: String,
    },

    /// An operation referenced a service that was never registered.
    #[error("unknown service '{name}'")]
    UnknownService {
        /// The requested service name
        name: String,
    },

    /// The compilation unit builder was used after `build()`.
    #[error("compilation unit '{unit}' was already built")]
    AlreadyBuilt {
        /// Name of the compilation unit
        unit: String,
    },

    /// The code generator met a node it has no rendering rule for.
    #[error("unsupported node: {0}")]
    UnsupportedNode(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConversionError::MalformedModel("bad port".into()).to_string(),
            "malformed model: bad port"
        );
        assert_eq!(
            ConversionError::DuplicateService {
                name: "svc".into()
            }
            .to_string(),
            "duplicate service 'svc'"
        );
        assert_eq!(
            ConversionError::AlreadyBuilt {
                unit: "hello".into()
            }
            .to_string(),
            "compilation unit 'hello' was already built"
        );
    }
}
