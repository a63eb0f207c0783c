//! Functions every run sees in its global scope.
//!
//! The standard library proper is supplied by the embedder through
//! `InterpreterBuilder::global_function`; the core only brings object
//! construction.

use std::rc::Rc;

use brs_ir::ValueKind;
use brs_values::{create_object, Argument, BrsInterface, Callable, Signature, Value};

/// Name of the interface value bound to `global`.
pub(crate) const GLOBAL_INTERFACE: &str = "ifGlobal";

/// The built-in global functions.
pub fn global_functions() -> Vec<Callable> {
    vec![Callable::native(
        "CreateObject",
        Signature::new(
            vec![Argument::new("name", ValueKind::String)],
            ValueKind::Dynamic,
        )
        .variadic(),
        create_object,
    )]
}

/// The `global` interface listing `functions` as its methods.
pub(crate) fn global_interface(functions: &[Callable]) -> Value {
    Value::Interface(Rc::new(BrsInterface::new(
        GLOBAL_INTERFACE,
        functions.iter().map(Callable::name),
    )))
}
