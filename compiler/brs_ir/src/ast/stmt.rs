//! Statement Types

use std::fmt;
use std::rc::Rc;

use super::{Expr, FunctionExpr, Identifier, IncrementOp};
use crate::Location;

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: Location,
}

impl Stmt {
    pub fn new(kind: StmtKind, location: Location) -> Self {
        Stmt { kind, location }
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// `name = value`, located over the name and the value.
    pub fn assignment(name: Identifier, value: Expr) -> Self {
        let location = name.location.merge(&value.location);
        Stmt::new(StmtKind::Assignment { name, value }, location)
    }

    pub fn expression(expr: Expr) -> Self {
        let location = expr.location.clone();
        Stmt::new(StmtKind::Expression(expr), location)
    }

    /// `function name(...) ... end function` at module level.
    pub fn function(name: Identifier, func: FunctionExpr) -> Self {
        let location = func.location.clone();
        Stmt::new(
            StmtKind::Function {
                name,
                func: Rc::new(func),
            },
            location,
        )
    }

    /// True for `Block` statements, which the debugger never stops on.
    #[inline]
    pub fn is_block(&self) -> bool {
        matches!(self.kind, StmtKind::Block(_))
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.location)
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `name = value`; `name` may end in a type designator (`$ % ! # &`).
    Assignment { name: Identifier, value: Expr },

    /// `dim name[d1, d2]`
    Dim { name: Identifier, dimensions: Vec<Expr> },

    Block(Block),

    Expression(Expr),

    ExitFor,
    ExitWhile,
    ContinueFor,
    ContinueWhile,

    /// Named function declaration.
    Function {
        name: Identifier,
        func: Rc<FunctionExpr>,
    },

    If {
        condition: Expr,
        then_branch: Block,
        else_ifs: Vec<ElseIf>,
        else_branch: Option<Block>,
    },

    Increment { value: Expr, op: IncrementOp },

    Print { items: Vec<PrintItem> },

    Goto { label: Identifier },

    Label { name: Identifier },

    Return { value: Option<Expr> },

    End,
    Stop,

    /// `for counter = start to final_value step increment`
    ///
    /// `increment` is the literal `1` when the source has no `step`.
    For {
        counter: Identifier,
        start: Expr,
        final_value: Expr,
        increment: Expr,
        body: Block,
    },

    ForEach {
        item: Identifier,
        target: Expr,
        body: Block,
    },

    While { condition: Expr, body: Block },

    /// `obj.name = value`
    DottedSet {
        obj: Expr,
        name: Identifier,
        value: Expr,
    },

    /// `obj[i] = value`
    IndexedSet {
        obj: Expr,
        indexes: Vec<Expr>,
        value: Expr,
        closing_square: Location,
    },

    /// `library "path"`; resolved before execution.
    Library { path: String },

    TryCatch {
        try_block: Block,
        catch_block: Block,
        error_binding: Identifier,
    },

    Throw { value: Expr },
}

/// A sequence of statements with its own location.
#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: Location,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, location: Location) -> Self {
        Block {
            statements,
            location,
        }
    }

    pub fn empty(location: Location) -> Self {
        Block::new(Vec::new(), location)
    }
}

/// `else if condition then ...`
#[derive(Clone, PartialEq, Debug)]
pub struct ElseIf {
    pub condition: Expr,
    pub then_branch: Block,
}

/// One entry of a `print` list.
#[derive(Clone, PartialEq, Debug)]
pub enum PrintItem {
    Expr(Expr),
    /// `,` advances to the next print zone.
    Tab,
    /// `;` joins items with nothing in between.
    Space,
}
