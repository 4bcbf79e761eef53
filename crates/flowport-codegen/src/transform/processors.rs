// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Processor emitters.
//!
//! Each processor kind maps to a fixed statement template appended to the
//! active resource function. Kinds without a mapping emit nothing.

use tracing::debug;

use super::templates;
use crate::builder::{CompilationUnitBuilder, FunctionHandle, util};
use crate::error::Result;
use flowport_dsl::{Logger, Processor, SetPayload};

/// Trait for emitting the statements of one processor.
pub trait ProcessorEmitter {
    /// Append this processor's statements to `function`.
    fn emit(&self, builder: &mut CompilationUnitBuilder, function: &FunctionHandle) -> Result<()>;
}

impl ProcessorEmitter for Processor {
    fn emit(&self, builder: &mut CompilationUnitBuilder, function: &FunctionHandle) -> Result<()> {
        match self {
            Processor::SetPayload(p) => emit_set_payload(p, builder, function),
            Processor::Logger(p) => emit_logger(p, builder, function),
            // The trigger is consumed when the resource function is created
            Processor::HttpListener(_) => Ok(()),
            Processor::SetHeader(_)
            | Processor::RemoveHeader(_)
            | Processor::SetVariable(_)
            | Processor::RemoveVariable(_)
            | Processor::FlowReference(_)
            | Processor::AsyncTask(_)
            | Processor::HttpRequest(_)
            | Processor::Comment(_) => {
                debug!(
                    processor = self.kind(),
                    service = function.service().name(),
                    "Skipping unmapped processor"
                );
                Ok(())
            }
        }
    }
}

fn emit_set_payload(
    payload: &SetPayload,
    builder: &mut CompilationUnitBuilder,
    function: &FunctionHandle,
) -> Result<()> {
    builder.add_statement(function, templates::set_payload_stmt(&payload.value))
}

fn emit_logger(
    logger: &Logger,
    builder: &mut CompilationUnitBuilder,
    function: &FunctionHandle,
) -> Result<()> {
    let Some(message) = logger.message.as_deref() else {
        debug!(
            service = function.service().name(),
            "Skipping logger without message"
        );
        return Ok(());
    };
    builder.add_import(util::ORG_BALLERINA, util::PKG_LOG, None, None)?;
    builder.add_statement(function, templates::log_stmt(logger.level, message))
}
