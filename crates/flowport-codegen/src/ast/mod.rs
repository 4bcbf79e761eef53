// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Target AST node model.
//!
//! A closed set of node kinds covering the subset of Ballerina needed to
//! express services, listeners, resource functions, records, literals and
//! simple invocations. Nodes are created through [`crate::builder`] and
//! rendered by [`crate::generator`].

pub mod expr;
pub mod stmt;

use std::collections::BTreeSet;
use std::fmt;

pub use expr::{
    Expression, Invocation, Literal, LiteralKind, NamedArgument, RecordField, RecordLiteral,
    TypeConversion, TypeInit, VariableReference,
};
pub use stmt::{Block, Statement, VariableDef};

// ============================================================================
// Identifiers and Types
// ============================================================================

/// Textual identifier. An empty identifier means "unqualified" when used as a
/// package alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The empty identifier.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Option<&str>> for Identifier {
    fn from(value: Option<&str>) -> Self {
        value.map(Identifier::new).unwrap_or_default()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a named type, optionally qualified by a package alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDefinedType {
    pub package_alias: Identifier,
    pub name: Identifier,
}

/// Type positions used by the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    UserDefined(UserDefinedType),
    /// `()`
    Nil,
}

// ============================================================================
// Flags and Annotations
// ============================================================================

/// Declaration flags. The derive order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    Public,
    Listener,
    Final,
    Service,
    Resource,
}

impl Flag {
    /// Keyword rendered for this flag.
    pub fn keyword(self) -> &'static str {
        match self {
            Flag::Public => "public",
            Flag::Listener => "listener",
            Flag::Final => "final",
            Flag::Service => "service",
            Flag::Resource => "resource",
        }
    }
}

/// Ordered set of flags.
pub type FlagSet = BTreeSet<Flag>;

/// `@alias:name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationAttachment {
    pub package_alias: Identifier,
    pub name: Identifier,
    /// Record payload; `None` renders the bare annotation reference.
    pub payload: Option<RecordLiteral>,
}

// ============================================================================
// Top-level Nodes
// ============================================================================

/// Root node: an ordered list of top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub name: String,
    pub top_level_nodes: Vec<TopLevelNode>,
}

impl CompilationUnit {
    pub fn imports(&self) -> impl Iterator<Item = &ImportPackage> {
        self.top_level_nodes.iter().filter_map(|n| match n {
            TopLevelNode::Import(i) => Some(i),
            _ => None,
        })
    }

    pub fn global_variables(&self) -> impl Iterator<Item = &GlobalVariable> {
        self.top_level_nodes.iter().filter_map(|n| match n {
            TopLevelNode::GlobalVariable(v) => Some(v),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.top_level_nodes.iter().filter_map(|n| match n {
            TopLevelNode::Service(s) => Some(s),
            _ => None,
        })
    }
}

/// Declarations allowed at the top level of a compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelNode {
    Import(ImportPackage),
    GlobalVariable(GlobalVariable),
    Service(Service),
}

/// `import org/a.b.c version v as alias;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPackage {
    pub org_name: Identifier,
    /// Dot-separated module name components
    pub package_name_comps: Vec<Identifier>,
    /// Empty when no version is pinned
    pub version: Identifier,
    pub alias: Identifier,
}

impl ImportPackage {
    /// Full module name, components joined with `.`
    pub fn module_name(&self) -> String {
        self.package_name_comps
            .iter()
            .map(Identifier::value)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Module-level variable, e.g. an endpoint configuration or a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariable {
    pub name: Identifier,
    /// `None` renders `var`
    pub type_node: Option<TypeNode>,
    pub initializer: Option<Expression>,
    pub flags: FlagSet,
}

/// A service together with the type definition and variable backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: Identifier,
    /// Listener expressions the service is attached to
    pub attached_exprs: Vec<Expression>,
    pub annotations: Vec<AnnotationAttachment>,
    pub type_definition: ServiceTypeDefinition,
    /// `final service` variable typed by the service type definition.
    ///
    /// Part of the declaration triple in the tree; the generator prints the
    /// `service <name> on <listener>` form instead of this variable.
    pub variable: GlobalVariable,
}

/// Object type holding the service's functions.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTypeDefinition {
    pub name: Identifier,
    pub flags: FlagSet,
    functions: Vec<Function>,
}

impl ServiceTypeDefinition {
    pub(crate) fn new(name: Identifier, functions: Vec<Function>) -> Self {
        Self {
            name,
            flags: FlagSet::from([Flag::Service]),
            functions,
        }
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub(crate) fn attach(&mut self, function: Function) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    pub(crate) fn function_mut(&mut self, index: usize) -> Option<&mut Function> {
        self.functions.get_mut(index)
    }
}

/// A function; resource functions carry [`Flag::Resource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub return_type: TypeNode,
    pub body: Block,
    pub flags: FlagSet,
    pub annotations: Vec<AnnotationAttachment>,
}

/// `Type name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_node: TypeNode,
    pub name: Identifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_order_follows_rendering() {
        let flags = FlagSet::from([Flag::Service, Flag::Final, Flag::Listener]);
        let keywords: Vec<&str> = flags.iter().map(|f| f.keyword()).collect();
        assert_eq!(keywords, vec!["listener", "final", "service"]);
    }

    #[test]
    fn test_identifier_from_option() {
        assert!(Identifier::from(None::<&str>).is_empty());
        assert_eq!(Identifier::from(Some("http")).value(), "http");
    }

    #[test]
    fn test_module_name() {
        let import = ImportPackage {
            org_name: "ballerina".into(),
            package_name_comps: vec!["lang".into(), "int".into()],
            version: Identifier::empty(),
            alias: "int".into(),
        };
        assert_eq!(import.module_name(), "lang.int");
    }
}
