// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flowport Codegen - Mule Models to Ballerina Source
//!
//! This crate converts an already-parsed Mule configuration (see
//! `flowport-dsl`) into a single Ballerina compilation unit and renders it as
//! source text.
//!
//! # Architecture
//!
//! ```text
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │    Mule     │      │  Ballerina  │      │  Ballerina  │
//!     │    Model    │─────▶│     AST     │─────▶│   Source    │
//!     │   (JSON)    │      │  (builder)  │      │ (generator) │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! # Pipeline
//!
//! 1. **Transform**: walk the model depth-first ([`transform`]), synthesizing
//!    listeners, services and resource functions through the
//!    [`builder::CompilationUnitBuilder`]
//! 2. **Build**: freeze the unit; imports, then global variables, then services
//! 3. **Generate**: pretty-print the unit ([`generator::CodeGenerator`])
//!
//! A run either produces the complete text or fails with a
//! [`ConversionError`]; partial output is never returned.
//!
//! # Usage
//!
//! ```ignore
//! use flowport_codegen::{convert, CodegenConfig};
//!
//! let root = flowport_dsl::parse_root_str(&json)?;
//! let result = convert(&root, &CodegenConfig::from_env())?;
//! println!("{}", result.source);
//! ```

pub mod ast;
pub mod builder;
pub mod config;
pub mod convert;
pub mod error;
pub mod generator;
pub mod naming;
pub mod transform;

pub use config::CodegenConfig;
pub use convert::{ConversionResult, convert, translate};
pub use error::{ConversionError, Result};
