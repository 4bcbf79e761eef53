// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Source generation from a completed compilation unit.
//!
//! Output depends only on the tree and traversal order. Block-like
//! constructs (records, service bodies, function bodies) push one indentation
//! level on `{` and pop it before the matching `}`.

use crate::ast::{
    AnnotationAttachment, Block, CompilationUnit, Expression, FlagSet, Function, GlobalVariable,
    Identifier, ImportPackage, Invocation, Parameter, RecordLiteral, Service, Statement,
    TopLevelNode, TypeNode, VariableDef,
};
use crate::config::{CodegenConfig, DEFAULT_INDENT_WIDTH};
use crate::error::{ConversionError, Result};

/// Pretty-printer for [`CompilationUnit`]s.
#[derive(Debug)]
pub struct CodeGenerator {
    buffer: String,
    indent_unit: String,
    /// Depth per open block; the bottom entry is always 0
    indent_stack: Vec<usize>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::with_indent_width(DEFAULT_INDENT_WIDTH)
    }
}

impl CodeGenerator {
    pub fn new(config: &CodegenConfig) -> Self {
        Self::with_indent_width(config.indent_width)
    }

    pub fn with_indent_width(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_unit: " ".repeat(width),
            indent_stack: vec![0],
        }
    }

    /// Render `unit` to source text.
    pub fn generate(&mut self, unit: &CompilationUnit) -> Result<String> {
        self.buffer.clear();
        self.indent_stack.truncate(1);

        let mut previous: Option<&TopLevelNode> = None;
        for node in &unit.top_level_nodes {
            if let Some(prev) = previous {
                let section_changed =
                    std::mem::discriminant(prev) != std::mem::discriminant(node);
                if section_changed || matches!(node, TopLevelNode::Service(_)) {
                    self.buffer.push('\n');
                }
            }
            match node {
                TopLevelNode::Import(import) => self.write_import(import),
                TopLevelNode::GlobalVariable(variable) => self.write_global_variable(variable)?,
                TopLevelNode::Service(service) => self.write_service(service)?,
            }
            previous = Some(node);
        }

        Ok(std::mem::take(&mut self.buffer))
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn depth(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.depth() {
            self.buffer.push_str(&self.indent_unit);
        }
    }

    fn open_block(&mut self) {
        self.buffer.push_str("{\n");
        let depth = self.depth();
        self.indent_stack.push(depth + 1);
    }

    fn close_block(&mut self) {
        if self.indent_stack.len() > 1 {
            self.indent_stack.pop();
        }
        self.write_indent();
        self.buffer.push('}');
    }

    fn write_flags(&mut self, flags: &FlagSet) {
        for keyword in flags.iter().map(|f| f.keyword()) {
            self.buffer.push_str(keyword);
            self.buffer.push(' ');
        }
    }

    fn write_qualified(&mut self, package_alias: &Identifier, name: &Identifier) {
        if !package_alias.is_empty() {
            self.buffer.push_str(package_alias.value());
            self.buffer.push(':');
        }
        self.buffer.push_str(name.value());
    }

    // ========================================================================
    // Top-level Nodes
    // ========================================================================

    fn write_import(&mut self, import: &ImportPackage) {
        self.write_indent();
        self.buffer.push_str("import ");
        if !import.org_name.is_empty() {
            self.buffer.push_str(import.org_name.value());
            self.buffer.push('/');
        }
        self.buffer.push_str(&import.module_name());
        if !import.version.is_empty() {
            self.buffer.push_str(" version ");
            self.buffer.push_str(import.version.value());
        }
        let default_alias = import.package_name_comps.last();
        if !import.alias.is_empty() && default_alias != Some(&import.alias) {
            self.buffer.push_str(" as ");
            self.buffer.push_str(import.alias.value());
        }
        self.buffer.push_str(";\n");
    }

    fn write_global_variable(&mut self, variable: &GlobalVariable) -> Result<()> {
        let Some(initializer) = &variable.initializer else {
            return Err(ConversionError::UnsupportedNode(format!(
                "global variable '{}' without initializer",
                variable.name
            )));
        };
        self.write_indent();
        self.write_flags(&variable.flags);
        match &variable.type_node {
            Some(type_node) => self.write_type(type_node),
            None => self.buffer.push_str("var"),
        }
        self.buffer.push(' ');
        self.buffer.push_str(variable.name.value());
        self.buffer.push_str(" = ");
        self.write_expression(initializer)?;
        self.buffer.push_str(";\n");
        Ok(())
    }

    fn write_service(&mut self, service: &Service) -> Result<()> {
        for annotation in &service.annotations {
            self.write_annotation(annotation)?;
        }
        self.write_indent();
        self.buffer.push_str("service ");
        self.buffer.push_str(service.name.value());
        if !service.attached_exprs.is_empty() {
            self.buffer.push_str(" on ");
            self.write_separated(&service.attached_exprs)?;
        }
        self.buffer.push(' ');
        self.open_block();
        for (i, function) in service.type_definition.functions().iter().enumerate() {
            if i > 0 {
                self.buffer.push('\n');
            }
            self.write_function(function)?;
        }
        self.close_block();
        self.buffer.push('\n');
        Ok(())
    }

    fn write_annotation(&mut self, annotation: &AnnotationAttachment) -> Result<()> {
        self.write_indent();
        self.buffer.push('@');
        self.write_qualified(&annotation.package_alias, &annotation.name);
        if let Some(payload) = &annotation.payload {
            self.buffer.push(' ');
            self.write_record(payload)?;
        }
        self.buffer.push('\n');
        Ok(())
    }

    fn write_function(&mut self, function: &Function) -> Result<()> {
        for annotation in &function.annotations {
            self.write_annotation(annotation)?;
        }
        self.write_indent();
        self.write_flags(&function.flags);
        self.buffer.push_str("function ");
        self.buffer.push_str(function.name.value());
        self.buffer.push('(');
        let remaining = function.params.len();
        for (i, param) in function.params.iter().enumerate() {
            self.write_parameter(param);
            if i + 1 < remaining {
                self.buffer.push_str(", ");
            }
        }
        self.buffer.push(')');
        if let TypeNode::UserDefined(_) = &function.return_type {
            self.buffer.push_str(" returns ");
            self.write_type(&function.return_type);
        }
        self.buffer.push(' ');
        self.write_block(&function.body)?;
        self.buffer.push('\n');
        Ok(())
    }

    fn write_parameter(&mut self, param: &Parameter) {
        self.write_type(&param.type_node);
        self.buffer.push(' ');
        self.buffer.push_str(param.name.value());
    }

    fn write_type(&mut self, type_node: &TypeNode) {
        match type_node {
            TypeNode::UserDefined(t) => self.write_qualified(&t.package_alias, &t.name),
            TypeNode::Nil => self.buffer.push_str("()"),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn write_block(&mut self, block: &Block) -> Result<()> {
        self.open_block();
        for statement in &block.statements {
            self.write_statement(statement)?;
        }
        self.close_block();
        Ok(())
    }

    fn write_statement(&mut self, statement: &Statement) -> Result<()> {
        self.write_indent();
        match statement {
            Statement::VariableDef(def) => self.write_variable_def(def)?,
            Statement::Expression(expr) => self.write_expression(expr)?,
        }
        self.buffer.push_str(";\n");
        Ok(())
    }

    fn write_variable_def(&mut self, def: &VariableDef) -> Result<()> {
        match (&def.type_node, &def.initializer) {
            (None, None) => {
                return Err(ConversionError::UnsupportedNode(format!(
                    "variable definition '{}' without type or initializer",
                    def.name
                )));
            }
            (Some(type_node), _) => self.write_type(type_node),
            (None, Some(_)) => self.buffer.push_str("var"),
        }
        self.buffer.push(' ');
        self.buffer.push_str(def.name.value());
        if let Some(initializer) = &def.initializer {
            self.buffer.push_str(" = ");
            self.write_expression(initializer)?;
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn write_expression(&mut self, expr: &Expression) -> Result<()> {
        match expr {
            Expression::Literal(lit) => {
                if lit.kind.is_numeric() {
                    self.buffer.push_str(&lit.value);
                } else {
                    self.buffer.push_str(&lit.original);
                }
            }
            Expression::RecordLiteral(record) => self.write_record(record)?,
            Expression::Invocation(invocation) => self.write_invocation(invocation)?,
            Expression::NamedArgument(arg) => {
                return Err(ConversionError::UnsupportedNode(format!(
                    "named argument '{}' outside an argument list",
                    arg.name
                )));
            }
            Expression::TypeInit(init) => {
                self.buffer.push_str("new");
                self.write_args(&init.args)?;
            }
            Expression::VariableReference(var) => {
                self.write_qualified(&var.package_alias, &var.name)
            }
            Expression::TypeConversion(conversion) => {
                if conversion.annotation.payload.is_some() {
                    return Err(ConversionError::UnsupportedNode(format!(
                        "annotation '{}' with payload in type conversion",
                        conversion.annotation.name
                    )));
                }
                self.buffer.push_str("<@");
                self.write_qualified(
                    &conversion.annotation.package_alias,
                    &conversion.annotation.name,
                );
                self.buffer.push_str("> ");
                self.write_expression(&conversion.expr)?;
            }
        }
        Ok(())
    }

    fn write_record(&mut self, record: &RecordLiteral) -> Result<()> {
        if record.is_empty() {
            self.buffer.push_str("{}");
            return Ok(());
        }
        self.open_block();
        let remaining = record.fields.len();
        for (i, field) in record.fields.iter().enumerate() {
            self.write_indent();
            self.buffer.push_str(field.key.value());
            self.buffer.push_str(": ");
            self.write_expression(&field.value)?;
            if i + 1 < remaining {
                self.buffer.push(',');
            }
            self.buffer.push('\n');
        }
        self.close_block();
        Ok(())
    }

    fn write_invocation(&mut self, invocation: &Invocation) -> Result<()> {
        match &invocation.receiver {
            Some(receiver) => {
                self.write_expression(receiver)?;
                self.buffer
                    .push_str(if invocation.action_call { "->" } else { "." });
                self.buffer.push_str(invocation.name.value());
            }
            None => self.write_qualified(&invocation.package_alias, &invocation.name),
        }
        self.write_args(&invocation.args)
    }

    /// `(a, b, name = c)`; the only position where named arguments render.
    fn write_args(&mut self, args: &[Expression]) -> Result<()> {
        self.buffer.push('(');
        let remaining = args.len();
        for (i, arg) in args.iter().enumerate() {
            match arg {
                Expression::NamedArgument(named) => {
                    self.buffer.push_str(named.name.value());
                    self.buffer.push_str(" = ");
                    self.write_expression(&named.expr)?;
                }
                other => self.write_expression(other)?,
            }
            if i + 1 < remaining {
                self.buffer.push_str(", ");
            }
        }
        self.buffer.push(')');
        Ok(())
    }

    /// Comma-separated expressions without enclosing brackets.
    fn write_separated(&mut self, exprs: &[Expression]) -> Result<()> {
        let remaining = exprs.len();
        for (i, expr) in exprs.iter().enumerate() {
            self.write_expression(expr)?;
            if i + 1 < remaining {
                self.buffer.push_str(", ");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Flag, Literal, LiteralKind};
    use crate::builder::{CompilationUnitBuilder, util};

    fn render(unit: &CompilationUnit) -> Result<String> {
        CodeGenerator::default().generate(unit)
    }

    fn unit_with(nodes: Vec<TopLevelNode>) -> CompilationUnit {
        CompilationUnit {
            name: "test".to_string(),
            top_level_nodes: nodes,
        }
    }

    #[test]
    fn test_imports() {
        let unit = unit_with(vec![
            TopLevelNode::Import(util::import_package("ei", "Mule", None, None)),
            TopLevelNode::Import(util::import_package("ballerina", "lang.int", Some("1.2.0"), None)),
            TopLevelNode::Import(util::import_package("ballerina", "http", None, Some("h"))),
        ]);
        assert_eq!(
            render(&unit).unwrap(),
            "import ei/Mule;\n\
             import ballerina/lang.int version 1.2.0;\n\
             import ballerina/http as h;\n"
        );
    }

    #[test]
    fn test_listener_global_with_named_argument() {
        let mut builder = CompilationUnitBuilder::new("test");
        builder.add_http_listener("_LISTENER_cfg0", 9091, "cfg").unwrap();
        let unit = builder.build().unwrap();
        assert_eq!(
            render(&unit).unwrap(),
            "import ballerina/http;\n\
             \n\
             listener http:Listener _LISTENER_cfg0 = new(9091, config = cfg);\n"
        );
    }

    #[test]
    fn test_record_literal_layout() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            None,
            "cfg",
            Expression::RecordLiteral(util::record_literal([
                ("host", util::string_literal("0.0.0.0")),
                ("timeoutInMillis", util::int_literal(30000)),
            ])),
            FlagSet::new(),
        ))]);
        assert_eq!(
            render(&unit).unwrap(),
            "var cfg = {\n    host: \"0.0.0.0\",\n    timeoutInMillis: 30000\n};\n"
        );
    }

    #[test]
    fn test_empty_record_renders_braces() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            Some(util::user_defined_type(Some("http"), "ServiceEndpointConfiguration")),
            "cfg",
            Expression::RecordLiteral(RecordLiteral::default()),
            FlagSet::new(),
        ))]);
        assert_eq!(
            render(&unit).unwrap(),
            "http:ServiceEndpointConfiguration cfg = {};\n"
        );
    }

    #[test]
    fn test_flags_render_in_fixed_order() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            None,
            "x",
            util::int_literal(1),
            FlagSet::from([Flag::Final, Flag::Public]),
        ))]);
        assert_eq!(render(&unit).unwrap(), "public final var x = 1;\n");
    }

    #[test]
    fn test_literal_rendering() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            None,
            "d",
            Expression::Literal(Literal {
                kind: LiteralKind::Decimal,
                value: "1.50".to_string(),
                original: "1.50d".to_string(),
            }),
            FlagSet::new(),
        ))]);
        assert_eq!(render(&unit).unwrap(), "var d = 1.50;\n");
    }

    #[test]
    fn test_service_with_resource() {
        let mut builder = CompilationUnitBuilder::new("test");
        let annotation = util::annotation(
            Some("http"),
            "ServiceConfig",
            Some(util::record_literal([("basePath", util::string_literal("/hi"))])),
        );
        builder
            .add_service(
                "svc",
                vec![util::variable_ref(None, "ep")],
                Vec::new(),
                Some(annotation),
            )
            .unwrap();
        let function = builder
            .attach_function("svc", util::resource_function("hello", None))
            .unwrap();
        builder
            .add_statement(
                &function,
                util::expression_stmt(Expression::Invocation(Invocation {
                    receiver: Some(Box::new(util::variable_ref(None, "caller"))),
                    package_alias: Identifier::empty(),
                    name: "respond".into(),
                    args: vec![util::string_literal("ok")],
                    action_call: true,
                })),
            )
            .unwrap();
        builder
            .attach_function("svc", util::resource_function("empty", None))
            .unwrap();
        let unit = builder.build().unwrap();

        let expected = "\
@http:ServiceConfig {
    basePath: \"/hi\"
}
service svc on ep {
    resource function hello(http:Caller caller, http:Request request) {
        caller->respond(\"ok\");
    }

    resource function empty(http:Caller caller, http:Request request) {
    }
}
";
        assert_eq!(render(&unit).unwrap(), expected);
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            None,
            "r",
            Expression::RecordLiteral(util::record_literal([("a", util::int_literal(1))])),
            FlagSet::new(),
        ))]);
        let text = CodeGenerator::with_indent_width(2).generate(&unit).unwrap();
        assert_eq!(text, "var r = {\n  a: 1\n};\n");
    }

    #[test]
    fn test_named_argument_outside_args_is_unsupported() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(util::global_variable(
            None,
            "x",
            util::named_arg("config", util::int_literal(1)),
            FlagSet::new(),
        ))]);
        assert!(matches!(
            render(&unit),
            Err(ConversionError::UnsupportedNode(_))
        ));
    }

    #[test]
    fn test_global_without_initializer_is_unsupported() {
        let unit = unit_with(vec![TopLevelNode::GlobalVariable(GlobalVariable {
            name: "x".into(),
            type_node: None,
            initializer: None,
            flags: FlagSet::new(),
        })]);
        assert!(matches!(
            render(&unit),
            Err(ConversionError::UnsupportedNode(_))
        ));
    }

    #[test]
    fn test_generation_is_repeatable() {
        let mut builder = CompilationUnitBuilder::new("test");
        builder.add_import("ei", "Mule", None, None).unwrap();
        builder.add_http_listener("l0", 1, "c").unwrap();
        let unit = builder.build().unwrap();
        let mut generator = CodeGenerator::default();
        let first = generator.generate(&unit).unwrap();
        let second = generator.generate(&unit).unwrap();
        assert_eq!(first, second);
    }
}
