#![deny(clippy::arithmetic_side_effects)]
#![allow(
    clippy::result_large_err,
    reason = "ControlSignal carries the full error record; boxing only the error variant is enough"
)]
//! BRS Values - Runtime value model for the BrightScript engine.
//!
//! This crate provides:
//! - `Value`: the tagged runtime value and its equality/ordering contracts
//! - `Number`: the four-kind numeric tower with the device's promotion,
//!   truncation and formatting rules
//! - `Callable`/`Signature`: what can be called and how arguments match
//! - Components: interface tables, dispatch, boxing, `roArray`,
//!   `roAssociativeArray` and the object factory behind `CreateObject`
//! - `RuntimeError`/`ControlSignal`: the error catalog and the non-local
//!   control flow the evaluator propagates through `Result`
//!
//! # Architecture
//!
//! Values are single-threaded: objects are `Rc<RefCell<..>>` handles and
//! functions share their body through `Rc`. Components never see the
//! evaluator directly; native code talks to it through `CallContext`.

pub mod callable;
mod coercion;
pub mod component;
mod context;
pub mod errors;
pub mod numeric;
mod value;

pub use callable::{
    Argument, Callable, CallableImpl, Mismatch, MethodFn, NativeFn, Satisfaction, Signature,
};
pub use coercion::try_coerce;
pub use component::{
    create_object, Arity, BoxedValue, BrsComponent, BrsInterface, Collection, ConstructorFn,
    FactoryEntry, ObjectFactory, ObjectRef, RoArray, RoAssociativeArray,
};
pub use context::CallContext;
pub use errors::{
    cast_mismatch, find_error_detail, operator_mismatch, runtime_error, type_mismatch,
    ControlSignal, ErrorDetail, EvalResult, Operand, RuntimeError, TracePoint,
};
pub use numeric::{BitwiseOperand, BitwiseResult, Float, Number};
pub use value::Value;
