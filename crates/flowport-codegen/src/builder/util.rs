// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node factories.
//!
//! Small constructors that hide the shape of AST nodes. Literal factories
//! produce the final quoted/escaped source form; the generator never escapes.

use crate::ast::{
    AnnotationAttachment, Block, Expression, Flag, FlagSet, Function, GlobalVariable, Identifier,
    ImportPackage, Invocation, Literal, LiteralKind, NamedArgument, Parameter, RecordField,
    RecordLiteral, Service, ServiceTypeDefinition, Statement, TypeConversion, TypeInit, TypeNode,
    UserDefinedType, VariableDef, VariableReference,
};

pub const ORG_BALLERINA: &str = "ballerina";
pub const PKG_HTTP: &str = "http";
pub const PKG_HTTP_CALLER: &str = "Caller";
pub const PKG_HTTP_REQUEST: &str = "Request";
pub const PKG_LOG: &str = "log";

pub const HTTP_SERVICE_ENDPOINT_CONFIGURATION: &str = "ServiceEndpointConfiguration";
pub const HTTP_LISTENER: &str = "Listener";
pub const ANN_NAME_HTTP_SERVICE_CONFIG: &str = "ServiceConfig";
pub const ANN_CONFIG_ATTR_BASE_PATH: &str = "basePath";
pub const ANN_NAME_RESOURCE_CONFIG: &str = "ResourceConfig";
pub const ANN_RESOURCE_ATTR_PATH: &str = "path";

pub const VAR_CALLER: &str = "caller";
pub const VAR_REQUEST: &str = "request";

// ============================================================================
// Types and References
// ============================================================================

pub fn user_defined_type(package_alias: Option<&str>, name: &str) -> TypeNode {
    TypeNode::UserDefined(UserDefinedType {
        package_alias: package_alias.into(),
        name: name.into(),
    })
}

pub fn variable_ref(package_alias: Option<&str>, name: &str) -> Expression {
    Expression::VariableReference(VariableReference {
        package_alias: package_alias.into(),
        name: name.into(),
    })
}

// ============================================================================
// Literals
// ============================================================================

/// Escape a string for use inside a double-quoted literal.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn string_literal(value: &str) -> Expression {
    Expression::Literal(Literal {
        kind: LiteralKind::String,
        value: value.to_string(),
        original: format!("\"{}\"", escape_string(value)),
    })
}

pub fn int_literal(value: i64) -> Expression {
    let text = value.to_string();
    Expression::Literal(Literal {
        kind: LiteralKind::Int,
        value: text.clone(),
        original: text,
    })
}

/// Build a record literal keeping the given entry order.
pub fn record_literal<K: Into<Identifier>>(
    fields: impl IntoIterator<Item = (K, Expression)>,
) -> RecordLiteral {
    RecordLiteral {
        fields: fields
            .into_iter()
            .map(|(key, value)| RecordField {
                key: key.into(),
                value,
            })
            .collect(),
    }
}

// ============================================================================
// Expressions
// ============================================================================

pub fn named_arg(name: &str, expr: Expression) -> Expression {
    Expression::NamedArgument(NamedArgument {
        name: name.into(),
        expr: Box::new(expr),
    })
}

/// `alias:name(args)`
pub fn function_invocation(
    package_alias: Option<&str>,
    name: &str,
    args: Vec<Expression>,
) -> Expression {
    Expression::Invocation(Invocation {
        receiver: None,
        package_alias: package_alias.into(),
        name: name.into(),
        args,
        action_call: false,
    })
}

/// `new(args)`
pub fn type_init(args: Vec<Expression>) -> Expression {
    Expression::TypeInit(TypeInit { args })
}

/// `<@annotation> expr`
pub fn type_conversion(annotation: AnnotationAttachment, expr: Expression) -> Expression {
    Expression::TypeConversion(TypeConversion {
        annotation,
        expr: Box::new(expr),
    })
}

pub fn annotation(
    package_alias: Option<&str>,
    name: &str,
    payload: Option<RecordLiteral>,
) -> AnnotationAttachment {
    AnnotationAttachment {
        package_alias: package_alias.into(),
        name: name.into(),
        payload,
    }
}

// ============================================================================
// Statements
// ============================================================================

/// `var name = expr;`
pub fn variable_def(name: &str, initializer: Expression) -> Statement {
    Statement::VariableDef(VariableDef {
        name: name.into(),
        type_node: None,
        initializer: Some(initializer),
    })
}

/// `Type name = expr;`
pub fn typed_variable_def(type_node: TypeNode, name: &str, initializer: Expression) -> Statement {
    Statement::VariableDef(VariableDef {
        name: name.into(),
        type_node: Some(type_node),
        initializer: Some(initializer),
    })
}

pub fn expression_stmt(expr: Expression) -> Statement {
    Statement::Expression(expr)
}

// ============================================================================
// Declarations
// ============================================================================

/// Create an import node. The alias defaults to the last `.` segment of the
/// module name.
pub fn import_package(
    org_name: &str,
    module_name: &str,
    version: Option<&str>,
    alias: Option<&str>,
) -> ImportPackage {
    let comps: Vec<Identifier> = module_name.split('.').map(Identifier::new).collect();
    let alias = match alias {
        Some(a) if !a.is_empty() => Identifier::new(a),
        _ => comps.last().cloned().unwrap_or_default(),
    };
    ImportPackage {
        org_name: org_name.into(),
        package_name_comps: comps,
        version: version.into(),
        alias,
    }
}

pub fn global_variable(
    type_node: Option<TypeNode>,
    name: &str,
    initializer: Expression,
    flags: FlagSet,
) -> GlobalVariable {
    GlobalVariable {
        name: name.into(),
        type_node,
        initializer: Some(initializer),
        flags,
    }
}

/// Resource function taking `(http:Caller caller, http:Request request)` with
/// an empty body.
pub fn resource_function(name: &str, annotation: Option<AnnotationAttachment>) -> Function {
    Function {
        name: name.into(),
        params: vec![
            Parameter {
                type_node: user_defined_type(Some(PKG_HTTP), PKG_HTTP_CALLER),
                name: VAR_CALLER.into(),
            },
            Parameter {
                type_node: user_defined_type(Some(PKG_HTTP), PKG_HTTP_REQUEST),
                name: VAR_REQUEST.into(),
            },
        ],
        return_type: TypeNode::Nil,
        body: Block::default(),
        flags: FlagSet::from([Flag::Resource]),
        annotations: annotation.into_iter().collect(),
    }
}

/// Create a service with its type definition and backing `final service`
/// variable.
pub fn service(
    name: &str,
    attached_exprs: Vec<Expression>,
    service_type_name: &str,
    annotation: Option<AnnotationAttachment>,
    functions: Vec<Function>,
) -> Service {
    let type_definition = ServiceTypeDefinition::new(service_type_name.into(), functions);
    let variable = GlobalVariable {
        name: name.into(),
        type_node: Some(user_defined_type(None, service_type_name)),
        initializer: None,
        flags: FlagSet::from([Flag::Final, Flag::Service]),
    };
    Service {
        name: name.into(),
        attached_exprs,
        annotations: annotation.into_iter().collect(),
        type_definition,
        variable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_is_quoted_and_escaped() {
        match string_literal("say \"hi\"\n") {
            Expression::Literal(lit) => {
                assert_eq!(lit.kind, LiteralKind::String);
                assert_eq!(lit.value, "say \"hi\"\n");
                assert_eq!(lit.original, "\"say \\\"hi\\\"\\n\"");
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_import_alias_defaults_to_last_segment() {
        let import = import_package("ballerina", "lang.int", None, None);
        assert_eq!(import.alias.value(), "int");
        assert!(import.version.is_empty());

        let aliased = import_package("ballerina", "http", Some("1.0.0"), Some("h"));
        assert_eq!(aliased.alias.value(), "h");
        assert_eq!(aliased.version.value(), "1.0.0");

        let empty_alias = import_package("ei", "Mule", None, Some(""));
        assert_eq!(empty_alias.alias.value(), "Mule");
    }

    #[test]
    fn test_resource_function_shape() {
        let function = resource_function("sayHello", None);
        assert_eq!(function.params.len(), 2);
        assert_eq!(function.params[0].name.value(), VAR_CALLER);
        assert!(function.flags.contains(&Flag::Resource));
        assert!(function.annotations.is_empty());
        assert!(function.body.statements.is_empty());
    }

    #[test]
    fn test_service_owns_type_definition_and_variable() {
        let svc = service(
            "svc",
            vec![variable_ref(None, "ep")],
            "svc$$service$0",
            None,
            Vec::new(),
        );
        assert_eq!(svc.type_definition.name.value(), "svc$$service$0");
        assert!(svc.variable.flags.contains(&Flag::Final));
        assert_eq!(
            svc.variable.type_node,
            Some(user_defined_type(None, "svc$$service$0"))
        );
    }
}
