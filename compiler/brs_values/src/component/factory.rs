//! Object factory behind `CreateObject`.
//!
//! Class names are matched case-insensitively. Each entry carries a
//! parameter-count contract checked before the constructor runs.

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use super::{array, assoc_array, BoxedValue};
use crate::context::CallContext;
use crate::errors::{runtime_error, ErrorDetail, EvalResult};
use crate::numeric::Float;
use crate::value::Value;

/// Builds a component from the arguments that followed the class name.
///
/// An `Err` message is reported on the output sink, not raised.
pub type ConstructorFn = fn(&mut dyn CallContext, &[Value]) -> Result<Value, String>;

/// How many arguments a constructor takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Extra arguments are dropped; the constructor always sees none.
    Variadic,
    Exactly(usize),
}

#[derive(Copy, Clone)]
pub struct FactoryEntry {
    pub constructor: ConstructorFn,
    pub arity: Arity,
}

/// Case-insensitive registry of constructible classes.
#[derive(Clone)]
pub struct ObjectFactory {
    entries: FxHashMap<String, (String, FactoryEntry)>,
}

impl ObjectFactory {
    /// Empty factory.
    pub fn new() -> Self {
        ObjectFactory {
            entries: FxHashMap::default(),
        }
    }

    /// Factory with the collection and boxed classes registered.
    pub fn with_builtins() -> Self {
        let mut factory = ObjectFactory::new();
        factory.register("roArray", Arity::Exactly(2), array::construct);
        factory.register("roAssociativeArray", Arity::Exactly(0), assoc_array::construct);
        factory.register("roInt", Arity::Variadic, |_, _| Ok(boxed(Value::Int32(0))));
        factory.register("roFloat", Arity::Variadic, |_, _| Ok(boxed(Value::Float(Float::new(0.0)))));
        factory.register("roDouble", Arity::Variadic, |_, _| Ok(boxed(Value::Double(0.0))));
        factory.register("roLongInteger", Arity::Variadic, |_, _| Ok(boxed(Value::Int64(0))));
        factory.register("roBoolean", Arity::Variadic, |_, _| Ok(boxed(Value::Boolean(false))));
        factory.register("roString", Arity::Variadic, |_, _| Ok(boxed(Value::string(""))));
        factory.register("roInvalid", Arity::Variadic, |_, _| Ok(boxed(Value::Invalid)));
        factory
    }

    /// Adds or replaces the class `name`.
    pub fn register(&mut self, name: &str, arity: Arity, constructor: ConstructorFn) {
        self.entries.insert(
            name.to_lowercase(),
            (name.to_owned(), FactoryEntry { constructor, arity }),
        );
    }

    pub fn lookup(&self, name: &str) -> Option<FactoryEntry> {
        self.entries.get(&name.to_lowercase()).map(|(_, entry)| *entry)
    }

    /// Registered class names as they were registered, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.values().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        ObjectFactory::with_builtins()
    }
}

fn boxed(value: Value) -> Value {
    Value::object(BoxedValue::new(value))
}

/// `CreateObject(name, ...args)`.
///
/// Unknown classes and constructor failures are diagnostics; only a wrong
/// argument count for a fixed-arity class is an error.
pub fn create_object(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Value::Invalid);
    };
    let name = name.unbox().as_str().map(str::to_owned).unwrap_or_default();
    let pkg = ctx.location().format_pkg();

    let Some(entry) = ctx.object_factory().lookup(&name) else {
        warn!(class = %name, "unknown class name");
        ctx.write_diagnostic(&format!(
            "BRIGHTSCRIPT: ERROR: Runtime: unknown classname \"{name}\": {pkg}"
        ));
        return Ok(Value::Invalid);
    };

    let params: &[Value] = match entry.arity {
        Arity::Variadic => &[],
        Arity::Exactly(expected) if expected > 0 && rest.is_empty() => {
            ctx.write_diagnostic(&format!(
                "BRIGHTSCRIPT: ERROR: Runtime: \"{name}\": invalid number of parameters: {pkg}"
            ));
            return Ok(Value::Invalid);
        }
        Arity::Exactly(expected) if expected != rest.len() => {
            return Err(runtime_error(ErrorDetail::RO_WRONG_NUMBER_OF_PARAMS, ctx.location()).into());
        }
        Arity::Exactly(_) => rest,
    };

    trace!(class = %name, args = params.len(), "constructing component");
    match (entry.constructor)(ctx, params) {
        Ok(value) => Ok(value),
        Err(message) => {
            ctx.write_diagnostic(&format!("{message}: {pkg}"));
            Ok(Value::Invalid)
        }
    }
}
