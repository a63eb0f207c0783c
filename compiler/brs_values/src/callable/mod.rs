//! Callables and their signatures.
//!
//! A `Callable` is a name, one or more signatures and an implementation:
//! a native function, a component method bound to its receiver, or a user
//! function body. The evaluator owns the call protocol (signature
//! selection, defaults, trace points); this module only describes what can
//! be called and how arguments are matched.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use brs_ir::{Expr, FunctionExpr, Literal, Location, ValueKind};

use crate::coercion::try_coerce;
use crate::component::ObjectRef;
use crate::context::CallContext;
use crate::errors::{ErrorDetail, EvalResult, RuntimeError};
use crate::value::Value;

static ANONYMOUS_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Native function: receives already coerced and defaulted arguments.
pub type NativeFn = fn(&mut dyn CallContext, &[Value]) -> EvalResult;

/// Component method: like `NativeFn`, plus the receiving object.
pub type MethodFn = fn(&mut dyn CallContext, &ObjectRef, &[Value]) -> EvalResult;

/// One declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub kind: ValueKind,
    /// Evaluated in the callee's scope when the caller omits the argument.
    pub default: Option<Expr>,
}

impl Argument {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Argument {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Optional argument with a literal default.
    pub fn optional(name: impl Into<String>, kind: ValueKind, default: Literal) -> Self {
        Argument {
            name: name.into(),
            kind,
            default: Some(Expr::literal(default, Location::internal())),
        }
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Parameter list plus return kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub args: Vec<Argument>,
    pub returns: ValueKind,
    /// Accepts any number of extra arguments after `args`.
    pub variadic: bool,
}

impl Signature {
    pub fn new(args: Vec<Argument>, returns: ValueKind) -> Self {
        Signature {
            args,
            returns,
            variadic: false,
        }
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Signature declared by a user function.
    pub fn from_function(func: &FunctionExpr) -> Self {
        let args = func
            .parameters
            .iter()
            .map(|param| Argument {
                name: param.name.name.clone(),
                kind: param.kind,
                default: param.default.clone(),
            })
            .collect();
        Signature::new(args, func.returns)
    }

    pub fn required_count(&self) -> usize {
        self.args.iter().filter(|arg| arg.is_required()).count()
    }

    /// Checks `args` against this signature.
    ///
    /// Arity is checked first (too few, then too many for fixed-arity
    /// signatures); every provided argument is then coerced to its
    /// parameter kind.
    pub fn check(&self, args: &[Value]) -> Satisfaction {
        let mut mismatches = Vec::new();
        if args.len() < self.required_count() {
            mismatches.push(Mismatch::TooFewArguments {
                received: args.len(),
            });
        } else if !self.variadic && args.len() > self.args.len() {
            mismatches.push(Mismatch::TooManyArguments {
                expected: self.args.len(),
                received: args.len(),
            });
        }

        let mut coerced = args.to_vec();
        for ((param, received), slot) in self.args.iter().zip(args).zip(coerced.iter_mut()) {
            match try_coerce(received, param.kind) {
                Some(value) => *slot = value,
                None => mismatches.push(Mismatch::ArgumentType {
                    name: param.name.clone(),
                    expected: param.kind,
                    received: received.kind(),
                }),
            }
        }

        Satisfaction {
            coerced,
            mismatches,
        }
    }
}

/// Why a signature rejected a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    TooFewArguments {
        received: usize,
    },
    TooManyArguments {
        expected: usize,
        received: usize,
    },
    ArgumentType {
        name: String,
        expected: ValueKind,
        received: ValueKind,
    },
}

/// Outcome of checking arguments against one signature.
#[derive(Clone, Debug)]
pub struct Satisfaction {
    pub coerced: Vec<Value>,
    pub mismatches: Vec<Mismatch>,
}

impl Satisfaction {
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// How a callable runs.
#[derive(Clone)]
pub enum CallableImpl {
    Native(NativeFn),
    Method { receiver: ObjectRef, func: MethodFn },
    User(Rc<FunctionExpr>),
}

struct CallableData {
    name: String,
    signatures: Vec<Rc<Signature>>,
    imp: CallableImpl,
    location: Location,
}

/// A function value.
///
/// Cloning is cheap and keeps identity: two clones are the same function
/// for `=` purposes. The optional context is the associative array the
/// function was read from, which becomes `m` when it is called through a
/// member access. The context is held strongly so that it outlives a
/// temporary receiver, as in `makeObject().method()`.
#[derive(Clone)]
pub struct Callable {
    data: Rc<CallableData>,
    context: Option<ObjectRef>,
}

impl Callable {
    fn build(name: String, signatures: Vec<Rc<Signature>>, imp: CallableImpl, location: Location) -> Self {
        Callable {
            data: Rc::new(CallableData {
                name,
                signatures,
                imp,
                location,
            }),
            context: None,
        }
    }

    /// Native function with a single signature.
    pub fn native(name: impl Into<String>, signature: Signature, func: NativeFn) -> Self {
        Callable::native_overloaded(name, vec![signature], func)
    }

    /// Native function accepting any of `signatures`.
    pub fn native_overloaded(name: impl Into<String>, signatures: Vec<Signature>, func: NativeFn) -> Self {
        Callable::build(
            name.into(),
            signatures.into_iter().map(Rc::new).collect(),
            CallableImpl::Native(func),
            Location::internal(),
        )
    }

    /// Component method bound to `receiver`.
    pub fn method(
        name: &str,
        signatures: Vec<Rc<Signature>>,
        receiver: ObjectRef,
        func: MethodFn,
    ) -> Self {
        Callable::build(
            name.to_owned(),
            signatures,
            CallableImpl::Method { receiver, func },
            Location::internal(),
        )
    }

    /// User function. Anonymous functions get a generated `$anon_N` name.
    pub fn user(name: Option<&str>, func: Rc<FunctionExpr>) -> Self {
        let name = match name {
            Some(name) => name.to_owned(),
            None => {
                let id = ANONYMOUS_COUNTER.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                format!("$anon_{id}")
            }
        };
        let signature = Rc::new(Signature::from_function(&func));
        let location = func.location.clone();
        Callable::build(name, vec![signature], CallableImpl::User(func), location)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn signatures(&self) -> &[Rc<Signature>] {
        &self.data.signatures
    }

    pub fn implementation(&self) -> &CallableImpl {
        &self.data.imp
    }

    /// Declaration site; internal for natives.
    pub fn location(&self) -> &Location {
        &self.data.location
    }

    #[inline]
    pub fn is_user_defined(&self) -> bool {
        matches!(self.data.imp, CallableImpl::User(_))
    }

    /// Same function, bound to the object it was read from.
    #[must_use]
    pub fn with_context(&self, context: &ObjectRef) -> Self {
        Callable {
            data: Rc::clone(&self.data),
            context: Some(context.clone()),
        }
    }

    /// The same function with no receiver bound.
    #[must_use]
    pub fn without_context(&self) -> Self {
        Callable {
            data: Rc::clone(&self.data),
            context: None,
        }
    }

    /// The object this function was read from.
    pub fn context(&self) -> Option<ObjectRef> {
        self.context.clone()
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// First signature `args` satisfy, with the coerced arguments.
    pub fn first_satisfied_signature(&self, args: &[Value]) -> Option<(Rc<Signature>, Vec<Value>)> {
        self.data.signatures.iter().find_map(|signature| {
            let satisfaction = signature.check(args);
            satisfaction
                .is_satisfied()
                .then(|| (Rc::clone(signature), satisfaction.coerced))
        })
    }

    /// The multi-line type mismatch listing every signature and why `args`
    /// failed it.
    #[cold]
    pub fn argument_mismatch_error(&self, args: &[Value], location: Location) -> RuntimeError {
        let name = self.name();
        let header = if self.data.signatures.len() == 1 {
            format!("Provided arguments don't match {name}'s signature.")
        } else {
            format!("Provided arguments don't match any of {name}'s signatures.")
        };
        let mut lines = vec![header];
        for signature in &self.data.signatures {
            lines.push(format_mismatch(name, signature, &signature.check(args)));
        }
        RuntimeError::with_message(
            ErrorDetail::TYPE_MISMATCH.errno,
            format!("{}: {}", ErrorDetail::TYPE_MISMATCH.message, lines.join("\n")),
            location,
        )
    }
}

fn format_mismatch(name: &str, signature: &Signature, satisfaction: &Satisfaction) -> String {
    let params: Vec<String> = signature
        .args
        .iter()
        .map(|arg| {
            let text = format!("{} as {}", arg.name, arg.kind);
            if arg.is_required() {
                text
            } else {
                format!("[{text}]")
            }
        })
        .collect();
    let mut lines = vec![format!(
        "    function {name}({}) as {}:",
        params.join(", "),
        signature.returns
    )];
    let required = signature.required_count();
    for mismatch in &satisfaction.mismatches {
        let line = match mismatch {
            Mismatch::TooFewArguments { received } => {
                format!("* {name} requires at least {required} argument(s), but received {received}.")
            }
            Mismatch::TooManyArguments { expected, received } => {
                format!("* {name} accepts at most {expected} argument(s), but received {received}.")
            }
            Mismatch::ArgumentType {
                name: arg,
                expected,
                received,
            } => format!("* Argument '{arg}' must be of type {expected}, but received {received}."),
        };
        lines.push(format!("        {line}"));
    }
    lines.join("\n")
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.data.imp {
            CallableImpl::Native(_) => "native",
            CallableImpl::Method { .. } => "method",
            CallableImpl::User(_) => "user",
        };
        write!(f, "Callable({}, {kind})", self.data.name)
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Function: {}>", self.data.name.to_lowercase())
    }
}
