//! AST Node Types
//!
//! Organized by category:
//! - `operators`: Binary, unary and increment operators
//! - `expr`: Expression nodes
//! - `stmt`: Statement nodes and blocks
//!
//! Shared leaves (identifiers, literals, parameters, function bodies) live
//! here.

mod expr;
mod operators;
mod stmt;

pub use expr::{AAMember, Expr, ExprKind};
pub use operators::{BinaryOp, IncrementOp, UnaryOp};
pub use stmt::{Block, ElseIf, PrintItem, Stmt, StmtKind};

use crate::{Location, ValueKind};

/// A name as written in source, with its location.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Identifier {
    pub name: String,
    pub location: Location,
}

impl Identifier {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Identifier {
            name: name.into(),
            location,
        }
    }

    /// Trailing type designator (`$ % ! # &`), if any.
    pub fn type_designator(&self) -> Option<ValueKind> {
        match self.name.chars().last()? {
            '$' => Some(ValueKind::String),
            '%' => Some(ValueKind::Int32),
            '!' => Some(ValueKind::Float),
            '#' => Some(ValueKind::Double),
            '&' => Some(ValueKind::Int64),
            _ => None,
        }
    }
}

/// Literal values produced by the parser.
///
/// `Float` holds the source value before single-precision normalization;
/// the runtime normalizes on construction.
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Invalid,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f64),
    Double(f64),
    String(String),
}

impl Literal {
    pub fn kind(&self) -> ValueKind {
        match self {
            Literal::Invalid => ValueKind::Invalid,
            Literal::Boolean(_) => ValueKind::Boolean,
            Literal::Int32(_) => ValueKind::Int32,
            Literal::Int64(_) => ValueKind::Int64,
            Literal::Float(_) => ValueKind::Float,
            Literal::Double(_) => ValueKind::Double,
            Literal::String(_) => ValueKind::String,
        }
    }
}

/// A declared function parameter: `name [= default] [as Kind]`.
#[derive(Clone, PartialEq, Debug)]
pub struct Parameter {
    pub name: Identifier,
    pub kind: ValueKind,
    pub default: Option<Expr>,
    pub location: Location,
}

impl Parameter {
    pub fn new(name: Identifier, kind: ValueKind) -> Self {
        let location = name.location.clone();
        Parameter {
            name,
            kind,
            default: None,
            location,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A function or sub body with its declared signature.
///
/// Subs are functions whose `returns` is `Void`.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionExpr {
    pub parameters: Vec<Parameter>,
    pub returns: ValueKind,
    pub body: Block,
    pub location: Location,
}

impl FunctionExpr {
    pub fn new(
        parameters: Vec<Parameter>,
        returns: ValueKind,
        body: Block,
        location: Location,
    ) -> Self {
        FunctionExpr {
            parameters,
            returns,
            body,
            location,
        }
    }
}
