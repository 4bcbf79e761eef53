// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fixed statement templates appended to resource function bodies.

use crate::ast::Statement;
use crate::builder::util;
use flowport_dsl::LogLevel;

/// Organization of the runtime support modules.
pub const EI_ORG_NAME: &str = "ei";
pub const MULE_MODULE: &str = "Mule";
pub const CONTEXT_MODULE: &str = "Context";

const MESSAGE_CONTEXT: &str = "MessageContext";
const FN_SET_PAYLOAD: &str = "setPayload";
const FN_RESPOND: &str = "respond";
const ANN_UNTAINTED: &str = "untainted";

pub const VAR_CONTEXT: &str = "context";
pub const VAR_RESULT: &str = "result";

/// `Context:MessageContext context = new(<@untainted> request);`
pub fn context_stmt() -> Statement {
    let request = util::type_conversion(
        util::annotation(None, ANN_UNTAINTED, None),
        util::variable_ref(None, util::VAR_REQUEST),
    );
    util::typed_variable_def(
        util::user_defined_type(Some(CONTEXT_MODULE), MESSAGE_CONTEXT),
        VAR_CONTEXT,
        util::type_init(vec![request]),
    )
}

/// `Mule:setPayload(context, "<value>");`
pub fn set_payload_stmt(value: &str) -> Statement {
    util::expression_stmt(util::function_invocation(
        Some(MULE_MODULE),
        FN_SET_PAYLOAD,
        vec![
            util::variable_ref(None, VAR_CONTEXT),
            util::string_literal(value),
        ],
    ))
}

/// `var result = Mule:respond(context, caller);`
pub fn respond_stmt() -> Statement {
    util::variable_def(
        VAR_RESULT,
        util::function_invocation(
            Some(MULE_MODULE),
            FN_RESPOND,
            vec![
                util::variable_ref(None, VAR_CONTEXT),
                util::variable_ref(None, util::VAR_CALLER),
            ],
        ),
    )
}

fn log_function(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "printDebug",
        LogLevel::Info => "printInfo",
        LogLevel::Warn => "printWarn",
        LogLevel::Error => "printError",
    }
}

/// `log:printInfo("<message>");` and friends.
pub fn log_stmt(level: LogLevel, message: &str) -> Statement {
    util::expression_stmt(util::function_invocation(
        Some(util::PKG_LOG),
        log_function(level),
        vec![util::string_literal(message)],
    ))
}
