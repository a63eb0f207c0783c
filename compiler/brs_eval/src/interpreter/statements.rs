//! Statement execution.
//!
//! Loops own their exit/continue signals and re-propagate everything
//! else. A `goto` unwinds to the enclosing function body, which replays
//! its statements in label-search mode: `execute` then only descends into
//! blocks until the label is seen, and execution resumes right after it.
//! Loops entered during the search remember where to pick up again
//! (`Environment::continue_for` and `continue_for_each`).

use std::rc::Rc;

use brs_ir::{
    BinaryOp, Block, Expr, ExprKind, FunctionExpr, Identifier, IncrementOp, Location, PrintItem, Stmt,
    StmtKind,
};
use brs_stack::ensure_sufficient_stack;
use brs_values::{
    cast_mismatch, runtime_error, try_coerce, type_mismatch, Callable, ControlSignal, ErrorDetail,
    EvalResult, Number, ObjectRef, Operand, RuntimeError, Value,
};
use tracing::warn;

use super::Interpreter;
use crate::exec::control::{
    contains_label, continues, dim_array, dimension_size, is_true, loop_step, skips_entirely,
    steps_up,
};
use crate::exec::print::{format_item, zone_padding, PRINT_NEWLINE};
use crate::exec::throw::{error_record, thrown_error};
use crate::operators::{evaluate_binary, OperandLocations};
use crate::print_handler::advance_column;
use crate::ScopeKind;

impl Interpreter {
    /// Executes one statement.
    ///
    /// While a `goto` label is pending the statement is only searched for
    /// it. Otherwise the host is polled first (except right after `stop`).
    pub fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        if self.env.goto_label.is_some() {
            return self.search_label(stmt);
        }
        if !self.last_was_stop {
            self.check_debugger(stmt)?;
        }
        if !stmt.location.is_unknown() {
            self.location = stmt.location.clone();
        }
        self.last_was_stop = matches!(stmt.kind, StmtKind::Stop);
        ensure_sufficient_stack(|| self.exec_stmt(stmt))
    }

    /// Executes statements in order, stopping at the first signal.
    pub(crate) fn execute_statements(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        for stmt in statements {
            self.execute(stmt)?;
        }
        Ok(())
    }

    #[inline]
    fn execute_block(&mut self, block: &Block) -> EvalResult<()> {
        self.execute_statements(&block.statements)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match &stmt.kind {
            StmtKind::Expression(expr) => self.evaluate(expr).map(drop),
            StmtKind::Assignment { name, value } => {
                let evaluated = self.evaluate(value)?;
                self.assign_variable(name, evaluated, &value.location)
            }
            StmtKind::Dim { name, dimensions } => self.exec_dim(name, dimensions),
            StmtKind::Block(block) => self.execute_block(block),
            StmtKind::Increment { value, op } => self.exec_increment(value, *op, &stmt.location),
            StmtKind::Print { items } => self.exec_print(items),
            StmtKind::If {
                condition,
                then_branch,
                else_ifs,
                else_branch,
            } => {
                if is_true(&self.evaluate(condition)?) {
                    return self.execute_block(then_branch);
                }
                for else_if in else_ifs {
                    if is_true(&self.evaluate(&else_if.condition)?) {
                        return self.execute_block(&else_if.then_branch);
                    }
                }
                match else_branch {
                    Some(block) => self.execute_block(block),
                    None => Ok(()),
                }
            }
            StmtKind::For {
                counter,
                start,
                final_value,
                increment,
                body,
            } => self.exec_for(counter, start, final_value, increment, body),
            StmtKind::ForEach { item, target, body } => self.exec_for_each(item, target, body),
            StmtKind::While { condition, body } => self.exec_while(condition, body),
            StmtKind::ExitFor => Err(ControlSignal::ExitFor),
            StmtKind::ContinueFor => Err(ControlSignal::ContinueFor),
            StmtKind::ExitWhile => Err(ControlSignal::ExitWhile),
            StmtKind::ContinueWhile => Err(ControlSignal::ContinueWhile),
            StmtKind::Goto { label } => Err(ControlSignal::Goto {
                label: label.name.clone(),
                location: stmt.location.clone(),
            }),
            StmtKind::Label { .. } | StmtKind::Library { .. } => Ok(()),
            StmtKind::Return { value } => {
                let value = match value {
                    Some(expr) => Some(self.evaluate(expr)?),
                    None => None,
                };
                Err(ControlSignal::Return {
                    value,
                    location: stmt.location.clone(),
                })
            }
            StmtKind::End => Err(ControlSignal::End),
            StmtKind::Stop => {
                self.debug_mode = true;
                self.check_debugger(stmt)
            }
            StmtKind::Function { name, func } => self.declare_function(name, func, &stmt.location),
            StmtKind::DottedSet { obj, name, value } => self.assign_dotted(obj, name, value),
            StmtKind::IndexedSet {
                obj,
                indexes,
                value,
                closing_square,
            } => self.assign_indexed(obj, indexes, value, closing_square),
            StmtKind::TryCatch {
                try_block,
                catch_block,
                error_binding,
            } => self.exec_try_catch(try_block, catch_block, error_binding),
            StmtKind::Throw { value } => {
                let thrown = self.evaluate(value)?;
                let err = thrown_error(&thrown, &mut self.user_errno, stmt.location.clone());
                Err(self.raise(err))
            }
        }
    }

    /// Binds a local, applying the name's type designator (`a$`, `n%`).
    fn assign_variable(&mut self, name: &Identifier, value: Value, value_location: &Location) -> EvalResult<()> {
        let value = match name.type_designator() {
            Some(kind) => match try_coerce(&value, kind) {
                Some(coerced) => coerced,
                None => {
                    let err = cast_mismatch(
                        Operand::new(kind, name.location.clone()),
                        Operand::of(&value, value_location.clone()),
                    );
                    return Err(self.raise(err));
                }
            },
            None => value,
        };
        self.define_local(name, value)
    }

    fn define_local(&mut self, name: &Identifier, value: Value) -> EvalResult<()> {
        self.env
            .define(ScopeKind::Function, &name.name, value, &name.location)
            .map_err(|err| self.raise(err))
    }

    fn exec_dim(&mut self, name: &Identifier, dimensions: &[Expr]) -> EvalResult<()> {
        let mut sizes = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            let bound = self.evaluate(dimension)?;
            let Some(size) = dimension_size(&bound) else {
                return Err(self.raise(runtime_error(
                    ErrorDetail::NON_NUMERIC_ARRAY_INDEX,
                    dimension.location.clone(),
                )));
            };
            sizes.push(size);
        }
        self.define_local(name, dim_array(&sizes))
    }

    /// `x++` / `x--` on a variable, member or element.
    fn exec_increment(&mut self, target: &Expr, op: IncrementOp, location: &Location) -> EvalResult<()> {
        let current = self.evaluate(target)?.unbox();
        let Some(number) = current.as_number() else {
            let message = match op {
                IncrementOp::Increment => "Attempting to increment value of non-numeric type",
                IncrementOp::Decrement => "Attempting to decrement value of non-numeric type",
            };
            let err = type_mismatch(message, Operand::of(&current, location.clone()), None);
            return Err(self.raise(err));
        };
        let updated = Value::from(match op {
            IncrementOp::Increment => number.add(Number::Int32(1)),
            IncrementOp::Decrement => number.sub(Number::Int32(1)),
        });

        match &target.kind {
            ExprKind::Variable(name) => self.define_local(name, updated),
            ExprKind::DottedGet { obj, name, .. } => {
                let source = self.evaluate(obj)?;
                let collection = self.assignable(source, &name.location)?;
                self.store_member(&collection, name, updated)
            }
            ExprKind::IndexedGet {
                obj,
                indexes,
                closing_square,
                ..
            } => {
                let source = self.evaluate(obj)?;
                let collection = self.assignable(source, &obj.location)?;
                self.store_indexed(&collection, indexes, updated, closing_square)
            }
            _ => Ok(()),
        }
    }

    /// `print`: the whole line goes to the sink in one write.
    fn exec_print(&mut self, items: &[PrintItem]) -> EvalResult<()> {
        self.printed = true;
        let mut column = self.print_handler.column();
        let mut line = String::new();
        for item in items {
            let text = match item {
                PrintItem::Expr(expr) => format_item(&self.evaluate(expr)?),
                PrintItem::Tab => zone_padding(column),
                PrintItem::Space => continue,
            };
            advance_column(&mut column, &text);
            line.push_str(&text);
        }
        if !matches!(items.last(), Some(PrintItem::Space)) {
            line.push_str(PRINT_NEWLINE);
        }
        self.print_handler.print(&line);
        Ok(())
    }

    /// Counted loop. Start, final value and step are evaluated once; the
    /// counter is advanced by `counter = counter + step` after every pass.
    fn exec_for(
        &mut self,
        counter: &Identifier,
        start: &Expr,
        final_value: &Expr,
        increment: &Expr,
        body: &Block,
    ) -> EvalResult<()> {
        let step = loop_step(self.evaluate(increment)?);
        let first = if self.env.continue_for {
            self.advance_counter(counter, &step, &increment.location)?;
            self.env.continue_for = false;
            self.env.get(counter).unwrap_or(Value::Uninitialized)
        } else {
            let initial = self.evaluate(start)?;
            self.assign_variable(counter, initial, &start.location)?;
            self.env.get(counter).unwrap_or(Value::Uninitialized)
        };
        let last = self.evaluate(final_value)?;
        if skips_entirely(&first, &last, &step) {
            return Ok(());
        }

        let up = steps_up(&step);
        loop {
            let current = self.env.get(counter).unwrap_or(Value::Uninitialized);
            if !continues(&current, &last, up) {
                break;
            }
            match self.execute_block(body) {
                Ok(()) | Err(ControlSignal::ContinueFor) => {}
                Err(ControlSignal::ExitFor) => break,
                Err(other) => return Err(other),
            }
            self.advance_counter(counter, &step, &increment.location)?;
        }
        Ok(())
    }

    /// `counter = counter + step`.
    fn advance_counter(&mut self, counter: &Identifier, step: &Value, step_location: &Location) -> EvalResult<()> {
        let current = self.env.get(counter).unwrap_or(Value::Uninitialized).unbox();
        let at = OperandLocations {
            left: &counter.location,
            right: step_location,
        };
        let next = evaluate_binary(BinaryOp::Add, &current, step, at).map_err(|err| self.raise(err))?;
        self.assign_variable(counter, next, step_location)
    }

    /// `for each item in target`.
    ///
    /// A target that cannot be enumerated only gets a console warning.
    fn exec_for_each(&mut self, item: &Identifier, target: &Expr, body: &Block) -> EvalResult<()> {
        let collection = match self.evaluate(target)? {
            Value::Object(obj) if obj.is_collection() => obj,
            other => {
                let at = &item.location;
                warn!(kind = %other.kind(), location = %at, "for each over a non-enumerable value");
                self.print_handler.diagnostic(&format!(
                    "BRIGHTSCRIPT: ERROR: Runtime: FOR EACH value is not an enumerable object: {}({})",
                    at.file, at.start.line
                ));
                return Ok(());
            }
        };

        let mut resume_at = 0;
        if self.env.continue_for {
            resume_at = self.env.continue_for_each;
            self.env.continue_for = false;
            self.env.continue_for_each = 0;
        }

        collection.with_collection_mut(|c| c.reset_next());
        let mut index: usize = 0;
        while let Some(element) = next_element(&collection) {
            self.define_local(item, element)?;
            if resume_at <= index {
                match self.execute_block(body) {
                    Ok(()) | Err(ControlSignal::ContinueFor) => {}
                    Err(ControlSignal::ExitFor) => break,
                    Err(goto @ ControlSignal::Goto { .. }) => {
                        self.env.continue_for_each = index.saturating_add(1);
                        return Err(goto);
                    }
                    Err(other) => return Err(other),
                }
            }
            index = index.saturating_add(1);
        }
        Ok(())
    }

    fn exec_while(&mut self, condition: &Expr, body: &Block) -> EvalResult<()> {
        while is_true(&self.evaluate(condition)?) {
            match self.execute_block(body) {
                Ok(()) | Err(ControlSignal::ContinueWhile) => {}
                Err(ControlSignal::ExitWhile) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    /// Named function declaration, bound in the module scope. The same
    /// declaration seen again is a no-op; a second one elsewhere is an error.
    fn declare_function(&mut self, name: &Identifier, func: &Rc<FunctionExpr>, location: &Location) -> EvalResult<()> {
        if self.env.has(&name.name, ScopeKind::Module) {
            if let Some(Value::Callable(existing)) = self.env.lookup(&name.name) {
                if existing.location() != location {
                    let message = format!(
                        "Attempting to declare function '{}' at {}, but it already exists in this scope from {}",
                        name.name,
                        location.file,
                        existing.location().file
                    );
                    return Err(self.raise(RuntimeError::plain(message, name.location.clone())));
                }
            }
            return Ok(());
        }
        let callable = Callable::user(Some(&name.name), Rc::clone(func));
        self.env
            .define(ScopeKind::Module, &name.name, Value::Callable(callable), location)
            .map_err(|err| self.raise(err))
    }

    /// `try ... catch err ... end try`.
    ///
    /// Runtime errors from the try block are caught; every other signal
    /// passes through. A `goto` from the try block into this catch block
    /// is a missing line number.
    fn exec_try_catch(&mut self, try_block: &Block, catch_block: &Block, error_binding: &Identifier) -> EvalResult<()> {
        let saved = self.try_mode;
        self.try_mode = true;
        let outcome = self.execute_block(try_block);
        self.try_mode = saved;

        match outcome {
            Err(ControlSignal::Error(err)) => {
                self.define_local(error_binding, error_record(&err))?;
                self.execute_block(catch_block)
            }
            Err(ControlSignal::Goto { label, location }) if contains_label(&catch_block.statements, &label) => {
                Err(self.raise(runtime_error(ErrorDetail::MISSING_LINE_NUMBER, location)))
            }
            other => other,
        }
    }

    /// Label-search mode: descends into blocks looking for the pending
    /// label. Loops that contain it resume iterating once it is found.
    fn search_label(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match &stmt.kind {
            StmtKind::Label { name } => {
                let matches = self
                    .env
                    .goto_label
                    .as_deref()
                    .is_some_and(|label| name.name.eq_ignore_ascii_case(label));
                if matches {
                    self.env.goto_label = None;
                }
                return Ok(());
            }
            StmtKind::Block(block) => return self.execute_block(block),
            StmtKind::If {
                then_branch,
                else_ifs,
                else_branch,
                ..
            } => {
                self.execute_block(then_branch)?;
                for else_if in else_ifs {
                    if self.env.goto_label.is_none() {
                        break;
                    }
                    self.execute_block(&else_if.then_branch)?;
                }
                if let (Some(block), true) = (else_branch, self.env.goto_label.is_some()) {
                    self.execute_block(block)?;
                }
                return Ok(());
            }
            StmtKind::TryCatch { catch_block, .. } => return self.execute_block(catch_block),
            StmtKind::For { body, .. } | StmtKind::ForEach { body, .. } => {
                match self.execute_block(body) {
                    Ok(()) => self.env.continue_for = self.env.goto_label.is_none(),
                    Err(ControlSignal::ExitFor) => {
                        self.env.continue_for = false;
                        return Ok(());
                    }
                    Err(ControlSignal::ContinueFor) => self.env.continue_for = true,
                    Err(other) => {
                        self.env.continue_for = false;
                        return Err(other);
                    }
                }
            }
            StmtKind::While { body, .. } => match self.execute_block(body) {
                Ok(()) | Err(ControlSignal::ContinueWhile) => {}
                Err(ControlSignal::ExitWhile) => return Ok(()),
                Err(other) => return Err(other),
            },
            _ => return Ok(()),
        }

        if self.env.goto_label.is_none() {
            return self.exec_stmt(stmt);
        }
        Ok(())
    }
}

/// Next element of a collection being enumerated, `None` once exhausted.
fn next_element(collection: &ObjectRef) -> Option<Value> {
    collection
        .with_collection_mut(|c| c.has_next().then(|| c.get_next()))
        .flatten()
}
