//! Function call evaluation: callee resolution, signature selection,
//! argument binding and return value checks.

use std::rc::Rc;

use brs_ir::{Expr, ExprKind, FunctionExpr, Location, Stmt, ValueKind};
use brs_values::{
    cast_mismatch, runtime_error, try_coerce, Callable, CallableImpl, ControlSignal, ErrorDetail,
    EvalResult, ObjectRef, Operand, Signature, TracePoint, Value,
};
use smallvec::SmallVec;

use super::{AccessMode, Interpreter};
use crate::ScopeKind;

/// Evaluated call arguments. Most calls pass a handful.
type CallArgs = SmallVec<[Value; 4]>;

impl Interpreter {
    /// `callee(args)`.
    ///
    /// Arguments are evaluated left to right before the callee is checked.
    /// When the callee was read off an object (`a.f()`, `a["f"]()`), the
    /// function's context becomes `m`; otherwise `m` is the root `m`.
    pub(crate) fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        optional: bool,
        closing_paren: &Location,
    ) -> EvalResult {
        let target = match &callee.kind {
            ExprKind::DottedGet {
                obj,
                name,
                optional,
            } => {
                self.location = callee.location.clone();
                self.eval_dotted_get(obj, name, *optional, AccessMode::Callee)?
            }
            _ => self.evaluate(callee)?,
        };

        let mut values = CallArgs::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        let Value::Callable(callable) = target.unbox() else {
            if optional && target.is_invalid_like() {
                return Ok(target);
            }
            return Err(self.raise(runtime_error(
                ErrorDetail::NOT_A_FUNCTION,
                closing_paren.clone(),
            )));
        };

        let m = match &callee.kind {
            ExprKind::DottedGet { .. } | ExprKind::IndexedGet { .. } => callable.context(),
            _ => None,
        };
        self.call_function(&callable, &values, m, &callee.location, closing_paren)
    }

    /// Calls `callable` with already evaluated arguments.
    ///
    /// `m` is the receiver for user functions (`None` for the root `m`).
    /// `call_location` goes into the backtrace; an argument mismatch is
    /// reported at `report_at`.
    pub fn call_function(
        &mut self,
        callable: &Callable,
        args: &[Value],
        m: Option<ObjectRef>,
        call_location: &Location,
        report_at: &Location,
    ) -> EvalResult {
        let Some((signature, coerced)) = callable.first_satisfied_signature(args) else {
            return Err(self.raise(callable.argument_mismatch_error(args, report_at.clone())));
        };

        let result = match callable.implementation() {
            CallableImpl::User(func) => {
                self.call_user(callable, func, &signature, coerced, m, call_location)
            }
            CallableImpl::Native(native) => {
                let args = self.fill_defaults(&signature, coerced)?;
                self.location = call_location.clone();
                native(self, &args).map_err(|signal| self.record_signal(signal))
            }
            CallableImpl::Method { receiver, func } => {
                let args = self.fill_defaults(&signature, coerced)?;
                self.location = call_location.clone();
                func(self, receiver, &args).map_err(|signal| self.record_signal(signal))
            }
        };

        match result {
            Err(ControlSignal::Return { value, location }) => {
                self.check_return(value, location, signature.returns)
            }
            other => other,
        }
    }

    /// Looks up a function by name and calls it from the host side.
    ///
    /// Returns `Ok(None)` when `name` is not bound to a function.
    pub fn call_by_name(&mut self, name: &str, args: &[Value]) -> EvalResult<Option<Value>> {
        let Some(Value::Callable(callable)) = self.env.lookup(name) else {
            return Ok(None);
        };
        let at = Location::internal();
        self.call_function(&callable, args, None, &at, &at).map(Some)
    }

    /// Runs a user function body in a fresh sub-environment, with its
    /// frame on the call stack.
    fn call_user(
        &mut self,
        callable: &Callable,
        func: &Rc<FunctionExpr>,
        signature: &Rc<Signature>,
        args: Vec<Value>,
        m: Option<ObjectRef>,
        call_location: &Location,
    ) -> EvalResult {
        let frame = TracePoint {
            function_name: callable.name().to_owned(),
            function_location: callable.location().clone(),
            call_location: call_location.clone(),
            signature: Rc::clone(signature),
        };
        if let Err(err) = self.call_stack.push(frame) {
            return Err(self.raise(err));
        }

        let m = m.unwrap_or_else(|| self.env.root_m().clone());
        let env = self.env.sub_environment(Some(m));
        let mut scoped = self.in_call_frame(env);
        scoped.bind_parameters(signature, args)?;
        scoped.run_body(&func.body.statements)?;
        Ok(Value::Invalid)
    }

    /// Defines every parameter in the callee's scope. Missing arguments
    /// take their default, evaluated in the callee's environment.
    fn bind_parameters(&mut self, signature: &Signature, args: Vec<Value>) -> EvalResult<()> {
        let mut provided = args.into_iter();
        for param in &signature.args {
            let value = match (provided.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.evaluate(default)?,
                (None, None) => Value::Invalid,
            };
            let at = self.location.clone();
            self.env
                .define(ScopeKind::Function, &param.name, value, &at)
                .map_err(|err| self.raise(err))?;
        }
        Ok(())
    }

    /// Appends the defaults of trailing parameters the caller left out.
    fn fill_defaults(&mut self, signature: &Signature, mut args: Vec<Value>) -> EvalResult<Vec<Value>> {
        for param in signature.args.iter().skip(args.len()) {
            let Some(default) = &param.default else {
                break;
            };
            let value = self.evaluate(default)?;
            args.push(value);
        }
        Ok(args)
    }

    /// Runs statements as a function body.
    ///
    /// A `goto` unwinds to here and the body restarts in label-search
    /// mode; a label that is never found is a missing line number at the
    /// `goto`. Loop signals that escape every loop are reported here.
    pub(crate) fn run_body(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        self.env.reset_jump_state();
        let mut goto_location = None;
        loop {
            match self.execute_statements(statements) {
                Ok(()) => break,
                Err(ControlSignal::Goto { label, location }) => {
                    self.env.goto_label = Some(label.to_lowercase());
                    goto_location = Some(location);
                }
                Err(ControlSignal::ExitFor) => {
                    return Err(self.stray_signal(ErrorDetail::EXIT_FOR_WITHOUT_FOR));
                }
                Err(ControlSignal::ContinueFor) => {
                    return Err(self.stray_signal(ErrorDetail::CONTINUE_FOR_WITHOUT_FOR));
                }
                Err(ControlSignal::ExitWhile) => {
                    return Err(self.stray_signal(ErrorDetail::EXIT_WHILE_WITHOUT_WHILE));
                }
                Err(ControlSignal::ContinueWhile) => {
                    return Err(self.stray_signal(ErrorDetail::CONTINUE_WHILE_WITHOUT_WHILE));
                }
                Err(other) => return Err(other),
            }
        }

        match goto_location {
            Some(location) if self.env.goto_label.is_some() => {
                self.env.reset_jump_state();
                // Reported from the caller's point of view.
                let mut frames = self.call_stack.capture();
                frames.pop();
                let err = runtime_error(ErrorDetail::MISSING_LINE_NUMBER, location)
                    .with_backtrace(frames);
                Err(self.raise(err))
            }
            _ => Ok(()),
        }
    }

    #[cold]
    fn stray_signal(&mut self, detail: ErrorDetail) -> ControlSignal {
        let at = self.location.clone();
        self.raise(runtime_error(detail, at))
    }

    /// Validates a `return` against the declared return kind.
    fn check_return(&mut self, value: Option<Value>, location: Location, returns: ValueKind) -> EvalResult {
        let value = match value {
            Some(_) if returns == ValueKind::Void => {
                return Err(self.raise(runtime_error(ErrorDetail::RETURN_WITH_VALUE, location)));
            }
            None if returns != ValueKind::Void => {
                return Err(self.raise(runtime_error(ErrorDetail::RETURN_WITHOUT_VALUE, location)));
            }
            None => return Ok(Value::Invalid),
            Some(value) => value,
        };

        if let Some(coerced) = try_coerce(&value, returns) {
            return Ok(coerced);
        }
        if returns != ValueKind::Dynamic && returns != value.kind() {
            let err = cast_mismatch(
                Operand::new(returns, location.clone()),
                Operand::of(&value, location),
            );
            return Err(self.raise(err));
        }
        Ok(value)
    }
}
