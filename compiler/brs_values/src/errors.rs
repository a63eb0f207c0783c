//! Runtime errors and control-flow signals.
//!
//! Every error the engine raises is a `RuntimeError`: an errno from the
//! device catalog, a message, the location it was raised at and, once the
//! evaluator has seen it, a snapshot of the call stack.
//!
//! Loop exits, `goto`, `return` and debugger exits are not errors but travel
//! the same `Result` channel as `ControlSignal` variants. Each boundary
//! (loop, function body, try block) matches only the variants it owns and
//! re-propagates everything else.
//!
//! Factory functions (`type_mismatch`, `runtime_error`, ...) are the public
//! way to build errors; they are `#[cold]` so the happy path stays tight.

use std::fmt;
use std::rc::Rc;

use brs_ir::{Location, ValueKind};

use crate::callable::Signature;
use crate::value::Value;

/// Result of evaluating an expression or executing a statement.
pub type EvalResult<T = Value> = Result<T, ControlSignal>;

/// An errno and its default message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ErrorDetail {
    pub errno: i32,
    pub message: &'static str,
}

macro_rules! error_catalog {
    ($($name:ident = $errno:literal, $message:literal;)*) => {
        impl ErrorDetail {
            $(pub const $name: ErrorDetail = ErrorDetail { errno: $errno, message: $message };)*
        }

        const CATALOG: &[ErrorDetail] = &[$(ErrorDetail::$name),*];
    };
}

error_catalog! {
    NEXT_WITHOUT_FOR = 0, "Next Without For.";
    BAD_SYNTAX = 2, "Syntax Error.";
    RETURN_WITHOUT_GOSUB = 4, "Return Without Gosub.";
    OUT_OF_DATA = 6, "Out of Data on READ.";
    BAD_FUNCTION_PARAMETER = 8, "Invalid parameter passed to function/array (e.g neg matrix dim or sqr root).";
    OUT_OF_MEMORY = 12, "Out Of Memory.";
    MISSING_LINE_NUMBER = 14, "Label/Line Not Found.";
    INDEX_OUT_OF_BOUNDS = 16, "Array subscript out of bounds.";
    RE_DIM_ARRAY = 18, "Attempted to redimension an array.";
    DIVIDE_BY_ZERO = 20, "Divide by Zero.";
    TYPE_MISMATCH = 24, "Type Mismatch.";
    OUT_OF_MEMORY_STRING = 26, "Out of Memory when doing string operation.";
    STRING_TOO_LONG = 28, "String Too Long.";
    BAD_BIT_SHIFT = 30, "Invalid Bitwise Shift.";
    NO_CONTINUE = 32, "Continue Not Allowed.";
    CONSTANT_OUT_OF_RANGE = 34, "Constant Out Of Range";
    EXECUTION_TIMEOUT = 35, "Execution timeout";
    FORMAT_SPECIFIER = 36, "Invalid Format Specifier";
    MALFORMED_THROW = 38, "Invalid argument to Throw";
    USER_DEFINED = 40, "User-specified exception";
    TOO_MANY_TASKS = 41, "Too many task threads";
    RUN_UNSUPPORTED = 140, "run() is unsupported.";
    CONTINUE_FOR_WITHOUT_FOR = 141, "Continue For is not inside a For loop";
    CONTINUE_WHILE_WITHOUT_WHILE = 142, "Continue While is not inside a While";
    LABEL_IN_TRY = 143, "Labels are illegal inside a TRY clause.";
    EVAL_DEPRECATED = 144, "eval() is deprecated. You must eliminate usage of eval().";
    FUNCTION_NOT_IN_NAMESPACE = 145, "Function is not defined in component's namespace";
    EXPECTED_BUILTIN_CALL = 157, "Syntax Error. Builtin function call expected.";
    VAR_SHADOWS_FUNCTION = 160, "Variable name cannot be the same as that of a declared function.";
    TOO_MANY_LABELS = 161, "Too Many Labels. Internal Label table size exceeded.";
    CLASS_NOT_FOUND = 162, "Class Not Found.";
    INTERFACE_TOO_LARGE = 163, "Interface has too many functions for bytecode.";
    MISSING_INITIALIZER = 164, "Assignment initializer missing.";
    EXIT_FOR_WITHOUT_FOR = 165, "Exit For is not inside a For loop.";
    UNSUPPORTED_STATEMENT = 166, "Statement type no longer supported.";
    INVALID_TYPE = 167, "Type is Invalid.";
    MISSING_RETURN_TYPE = 168, "Function must have a return type.";
    RETURN_WITHOUT_VALUE = 169, "Return must return a value.";
    RETURN_WITH_VALUE = 170, "Return can not have a return-value if inside a Sub or Function with Void return type.";
    FOR_EACH_INDEX_TYPE = 171, "For-Each index variable must be 'dynamic' type.";
    NO_MAIN_FUNCTION = 172, "No Main() Found.";
    DUPLICATE_SUB = 173, "SUB or FUNCTION defined twice.";
    LIMIT_EXCEEDED = 174, "Internal limit size exceeded.";
    EXIT_WHILE_WITHOUT_WHILE = 175, "Exit While is not inside a While.";
    TOO_MANY_VARIABLES = 176, "Variable table size exceeded.";
    TOO_MANY_CONSTANTS = 177, "Constant table size exceeded.";
    FUNCTION_NOT_EXPECTED = 178, "Function not expected here.";
    UNTERMINATED_STRING = 179, "String missing ending quote.";
    DUPLICATE_LABEL = 180, "Label/LineNumber defined more than once.";
    UNTERMINATED_BLOCK = 181, "A block (such as FOR/NEXT or IF/ENDIF) was not terminated correctly.";
    BAD_NEXT = 182, "Variable in NEXT does not match correct FOR.";
    END_OF_FILE = 183, "Unexpected End-Of-File.";
    LOAD_FILE = 185, "Error loading file.";
    LINE_NUMBER_SEQUENCE = 186, "Classic BASIC style line number is out of sequence.";
    NO_LINE_NUMBER = 187, "Line Number not found where expected.";
    IF_WITHOUT_END_IF = 189, "ENDIF Missing.";
    WHILE_WITHOUT_END_WHILE = 190, "While Statement is missing a matching EndWhile.";
    END_WHILE_WITHOUT_WHILE = 191, "EndWhile Without While.";
    EXCEPTION_ON_STACK = 222, "UNEXPECTED INTERNAL (Exception on stack)";
    STACK_OVERFLOW = 223, "Stack overflow.";
    NOT_A_FUNCTION = 224, "Function Call Operator ( ) attempted on non-function.";
    UNSUPPORTED_UNICODE = 225, "Error: Unicode not supported.";
    RETURN_FROM_NON_FUNCTION = 226, "Return from non-function.";
    BAD_NUMBER_OF_INDEXES = 227, "Invalid number of Array indexes.";
    BAD_LHS = 228, "Invalid value for left-side of expression.";
    MISSING_RETURN_VALUE = 229, "Function does not have a required return.";
    UNINITIALIZED_FUNCTION = 230, "Use of a reference to a function/sub that is not initialized.";
    UNDIMMED_ARRAY = 231, "Array operation attempted on variable not DIM'd.";
    NON_NUMERIC_ARRAY_INDEX = 232, "Attempt to use a non-numeric array index not allowed.";
    UNINITIALIZED_VARIABLE = 233, "Use of uninitialized variable.";
    TYPELESS_OPERATION = 235, "Operation on UnTyped operand(s) attempted.";
    DOT_ON_NON_OBJECT = 236, "'Dot' Operator attempted with invalid BrightScript Component or interface reference.";
    NON_STATIC_INTERFACE_CALL = 237, "Interface function calls from type rotINTERFACE must by static.";
    NOT_WAIT_COMPATIBLE = 238, "Tried to Wait on an BrightScript Component that does not have MessagePort interface.";
    NON_PRINTABLE = 239, "Non printable value.";
    IGNORED_RETURN_VALUE = 240, "Function returns a value that is ignored.";
    WRONG_NUMBER_OF_PARAMS = 241, "Wrong number of function parameters.";
    TOO_MANY_PARAMS = 242, "Too many function parameters (internal limit exceeded).";
    INTERFACE_NOT_A_MEMBER = 243, "Interface not a member of BrightScript Component";
    MEMBER_FUNCTION_NOT_FOUND = 244, "Member function not found in BrightScript Component or interface.";
    RO_WRONG_NUMBER_OF_PARAMS = 245, "BrightScript Component function call does not have the correct number of parameters.";
    OBJECT_CLASS_NOT_FOUND = 246, "BrightScript Component Class not Found.";
    STOP = 247, "STOP";
    BREAK = 248, "BREAK";
    STACK_UNDERFLOW = 249, "Stack Underflow.";
    MISSING_PARENTHESES = 250, "Missing Parentheses";
    UNSUPPORTED_EXPRESSION_OPERATOR = 251, "Unsupported expression operator.";
    NORMAL_END = 252, "Normal End.";
    UNDEFINED_OP_CODE = 253, "Undefined Op Code.";
    INTERNAL = 254, "UNEXPECTED INTERNAL.";
    OKAY = 255, "OKAY";
}

/// Looks up the catalog entry for `errno`.
pub fn find_error_detail(errno: i32) -> Option<ErrorDetail> {
    CATALOG.iter().copied().find(|detail| detail.errno == errno)
}

/// One frame of the live call stack.
///
/// Pushed right before a user-defined function body runs and popped on
/// every way out of it.
#[derive(Clone, Debug)]
pub struct TracePoint {
    /// Name as written at the call site.
    pub function_name: String,
    /// Where the function is declared.
    pub function_location: Location,
    /// Where the call was made.
    pub call_location: Location,
    /// The signature that matched the call.
    pub signature: Rc<Signature>,
}

impl TracePoint {
    /// `name(a As Integer,b As String) As Void`
    pub fn format_signature(&self) -> String {
        let args: Vec<String> = self
            .signature
            .args
            .iter()
            .map(|arg| format!("{} As {}", arg.name, arg.kind))
            .collect();
        format!(
            "{}({}) As {}",
            self.function_name,
            args.join(","),
            self.signature.returns
        )
    }
}

/// A raised runtime error.
///
/// `Display` renders `file(line,col-col): message`.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{location}: {message}")]
pub struct RuntimeError {
    pub errno: i32,
    pub message: String,
    pub location: Location,
    /// Call stack at raise time, innermost last.
    ///
    /// Filled in by the evaluator when the error is recorded.
    pub backtrace: Option<Vec<TracePoint>>,
    /// Extra fields of a structured `throw`, in insertion order.
    pub extra_fields: Vec<(String, Value)>,
}

impl RuntimeError {
    /// Error with the detail's errno and message.
    pub fn new(detail: ErrorDetail, location: Location) -> Self {
        RuntimeError::with_message(detail.errno, detail.message, location)
    }

    pub fn with_message(errno: i32, message: impl Into<String>, location: Location) -> Self {
        RuntimeError {
            errno,
            message: message.into(),
            location,
            backtrace: None,
            extra_fields: Vec::new(),
        }
    }

    /// Error raised by a native function or component with a free-form message.
    ///
    /// Reported with the internal errno.
    pub fn plain(message: impl Into<String>, location: Location) -> Self {
        RuntimeError::with_message(ErrorDetail::INTERNAL.errno, message, location)
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: Vec<TracePoint>) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_extra_fields(mut self, fields: Vec<(String, Value)>) -> Self {
        self.extra_fields = fields;
        self
    }

    /// The `file(line,col): message` line printed for uncaught errors.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

/// Non-local control flow, propagated through `Err`.
#[derive(Clone, Debug)]
pub enum ControlSignal {
    /// `return [value]`; unwinds to the nearest function boundary.
    Return {
        value: Option<Value>,
        location: Location,
    },
    ExitFor,
    ContinueFor,
    ExitWhile,
    ContinueWhile,
    /// `goto label`; unwinds to the enclosing function body, which restarts
    /// in label-search mode.
    Goto { label: String, location: Location },
    /// `end`: stops the run without an error.
    End,
    /// The debugger asked to abandon the run.
    DebugExit,
    Error(Box<RuntimeError>),
}

impl ControlSignal {
    /// The runtime error carried by this signal, if any.
    pub fn as_error(&self) -> Option<&RuntimeError> {
        match self {
            ControlSignal::Error(err) => Some(err),
            _ => None,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlSignal::Error(_))
    }
}

impl From<RuntimeError> for ControlSignal {
    fn from(err: RuntimeError) -> Self {
        ControlSignal::Error(Box::new(err))
    }
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSignal::Return { .. } => f.write_str("return"),
            ControlSignal::ExitFor => f.write_str("exit for"),
            ControlSignal::ContinueFor => f.write_str("continue for"),
            ControlSignal::ExitWhile => f.write_str("exit while"),
            ControlSignal::ContinueWhile => f.write_str("continue while"),
            ControlSignal::Goto { label, .. } => write!(f, "goto {label}"),
            ControlSignal::End => f.write_str("end-statement"),
            ControlSignal::DebugExit => f.write_str("debug-exit"),
            ControlSignal::Error(err) => write!(f, "{err}"),
        }
    }
}

/// One side of a type mismatch: a kind and where it came from.
#[derive(Clone, Debug)]
pub struct Operand {
    pub kind: ValueKind,
    pub location: Location,
}

impl Operand {
    pub fn new(kind: ValueKind, location: Location) -> Self {
        Operand { kind, location }
    }

    pub fn of(value: &Value, location: Location) -> Self {
        Operand::new(value.kind(), location)
    }
}

// Error factories

/// Error with a catalog entry's default message.
#[cold]
pub fn runtime_error(detail: ErrorDetail, location: Location) -> RuntimeError {
    RuntimeError::new(detail, location)
}

/// `Type Mismatch. {message} "Left" and "Right".`
///
/// Reported at the left operand's location.
#[cold]
pub fn type_mismatch(message: &str, left: Operand, right: Option<Operand>) -> RuntimeError {
    let mut text = format!(
        "{} {message} \"{}\"",
        ErrorDetail::TYPE_MISMATCH.message,
        left.kind
    );
    if let Some(right) = right {
        text.push_str(&format!(" and \"{}\"", right.kind));
    }
    text.push('.');
    RuntimeError::with_message(ErrorDetail::TYPE_MISMATCH.errno, text, left.location)
}

/// `Type Mismatch. Unable to cast "From" to "To".`
///
/// Reported at the target's location.
#[cold]
pub fn cast_mismatch(target: Operand, value: Operand) -> RuntimeError {
    let text = format!(
        "{} Unable to cast \"{}\" to \"{}\".",
        ErrorDetail::TYPE_MISMATCH.message,
        value.kind,
        target.kind
    );
    RuntimeError::with_message(ErrorDetail::TYPE_MISMATCH.errno, text, target.location)
}

/// Operator applied to operand kinds it does not support.
#[cold]
pub fn operator_mismatch(symbol: &str, left: Operand, right: Option<Operand>) -> RuntimeError {
    type_mismatch(&format!("Operator \"{symbol}\" can't be applied to"), left, right)
}
