// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statement nodes.

use super::{Expression, Identifier, TypeNode};

/// Ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDef(VariableDef),
    Expression(Expression),
}

/// `Type name = init;`, `var name = init;` or `Type name;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: Identifier,
    /// `None` declares the variable with `var`
    pub type_node: Option<TypeNode>,
    pub initializer: Option<Expression>,
}
