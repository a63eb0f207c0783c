//! Expression Types
//!
//! Expressions own their children (`Box<Expr>`); function literals are the
//! exception and are shared through `Rc<FunctionExpr>` so that callables
//! can keep their body alive without a deep copy.

use std::fmt;
use std::rc::Rc;

use super::{BinaryOp, FunctionExpr, Identifier, Literal, UnaryOp};
use crate::Location;

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Location,
}

impl Expr {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Expr { kind, location }
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn literal(value: Literal, location: Location) -> Self {
        Expr::new(ExprKind::Literal(value), location)
    }

    pub fn variable(name: Identifier) -> Self {
        let location = name.location.clone();
        Expr::new(ExprKind::Variable(name), location)
    }

    /// `left op right`, located over both operands.
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        let location = left.location.merge(&right.location);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, location: Location) -> Self {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    /// `callee(args)`; `closing_paren` is where "not a function" is reported.
    pub fn call(callee: Expr, args: Vec<Expr>, closing_paren: Location) -> Self {
        let location = callee.location.merge(&closing_paren);
        Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
                optional: false,
                closing_paren,
            },
            location,
        )
    }

    pub fn dotted_get(obj: Expr, name: Identifier) -> Self {
        let location = obj.location.merge(&name.location);
        Expr::new(
            ExprKind::DottedGet {
                obj: Box::new(obj),
                name,
                optional: false,
            },
            location,
        )
    }

    pub fn indexed_get(obj: Expr, indexes: Vec<Expr>, closing_square: Location) -> Self {
        let location = obj.location.merge(&closing_square);
        Expr::new(
            ExprKind::IndexedGet {
                obj: Box::new(obj),
                indexes,
                optional: false,
                closing_square,
            },
            location,
        )
    }

    pub fn function(func: FunctionExpr) -> Self {
        let location = func.location.clone();
        Expr::new(ExprKind::Function(Rc::new(func)), location)
    }

    /// Marks a call or member access as optional-chained (`?.`, `?(`, `?[`).
    #[must_use]
    pub fn into_optional(mut self) -> Self {
        match &mut self.kind {
            ExprKind::Call { optional, .. }
            | ExprKind::DottedGet { optional, .. }
            | ExprKind::IndexedGet { optional, .. } => *optional = true,
            _ => {}
        }
        self
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.location)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
        closing_paren: Location,
    },

    /// Anonymous `function(...) ... end function`
    Function(Rc<FunctionExpr>),

    /// `obj.name`
    DottedGet {
        obj: Box<Expr>,
        name: Identifier,
        optional: bool,
    },

    /// `obj[i, j]`
    IndexedGet {
        obj: Box<Expr>,
        indexes: Vec<Expr>,
        optional: bool,
        closing_square: Location,
    },

    /// `(expr)`
    Grouping(Box<Expr>),

    Literal(Literal),

    /// `[a, b, c]`
    ArrayLiteral(Vec<Expr>),

    /// `{ key: value }`
    AALiteral(Vec<AAMember>),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Variable(Identifier),
}

/// One `key: value` entry of an associative array literal.
///
/// The key keeps the spelling used in source.
#[derive(Clone, PartialEq, Debug)]
pub struct AAMember {
    pub name: String,
    pub value: Expr,
}

impl AAMember {
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        AAMember {
            name: name.into(),
            value,
        }
    }
}
