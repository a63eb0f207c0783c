//! BRS IR - Syntax Tree Types
//!
//! This crate contains the data structures the runtime consumes from the
//! BrightScript front end:
//! - Locations for source positions (`file(line,col)`)
//! - Value kinds shared by the type system and call signatures
//! - AST nodes (Expr, Stmt, `FunctionExpr`, etc.)
//!
//! # Design Philosophy
//!
//! - **Tree, not arena**: the parser hands over an owned tree. Function
//!   bodies are shared through `Rc<FunctionExpr>` so callables can hold
//!   on to them without cloning statements.
//! - **Locations everywhere**: every node carries the `Location` the
//!   runtime reports in errors and backtraces.
//! - **Names stay as written**: identifiers keep their source casing;
//!   the runtime lowercases at lookup time.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod location;
mod value_kind;

pub use ast::{
    AAMember, BinaryOp, Block, ElseIf, Expr, ExprKind, FunctionExpr, Identifier, IncrementOp,
    Literal, Parameter, PrintItem, Stmt, StmtKind, UnaryOp,
};
pub use location::{Location, Position};
pub use value_kind::{ValueKind, ValueKindParseError};

static_assert_size!(Position, 8);
