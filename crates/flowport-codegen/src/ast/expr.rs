// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Expression nodes.

use super::{AnnotationAttachment, Identifier};

/// Expression variants supported by the generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    RecordLiteral(RecordLiteral),
    Invocation(Invocation),
    NamedArgument(NamedArgument),
    TypeInit(TypeInit),
    VariableReference(VariableReference),
    TypeConversion(TypeConversion),
}

/// Literal type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Decimal,
    Boolean,
    Nil,
    String,
}

impl LiteralKind {
    /// Numeric kinds render their raw value; all others render the original form.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            LiteralKind::Int | LiteralKind::Float | LiteralKind::Decimal
        )
    }
}

/// A literal. `original` is the exact source form, already quoted and
/// escaped by whoever built the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: String,
    pub original: String,
}

/// `{ key: value, ... }` with entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordLiteral {
    pub fields: Vec<RecordField>,
}

impl RecordLiteral {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub key: Identifier,
    pub value: Expression,
}

/// Function or action call.
///
/// Renders `alias:name(args)`, `receiver.name(args)`, or `receiver->name(args)`
/// for action calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub receiver: Option<Box<Expression>>,
    pub package_alias: Identifier,
    pub name: Identifier,
    pub args: Vec<Expression>,
    pub action_call: bool,
}

/// `name = expr`, valid only inside an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub name: Identifier,
    pub expr: Box<Expression>,
}

/// `new(args)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeInit {
    pub args: Vec<Expression>,
}

/// `alias:name` or `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    pub package_alias: Identifier,
    pub name: Identifier,
}

/// `<@annotation> expr`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConversion {
    pub annotation: AnnotationAttachment,
    pub expr: Box<Expression>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_kinds() {
        assert!(LiteralKind::Int.is_numeric());
        assert!(LiteralKind::Decimal.is_numeric());
        assert!(!LiteralKind::String.is_numeric());
        assert!(!LiteralKind::Boolean.is_numeric());
    }
}
