//! Stack growth for the tree-walking evaluator.
//!
//! `execute` and `evaluate` recurse once per nested statement, expression and
//! BrightScript call. Scripts that recurse deeply (or nest expressions
//! absurdly) would otherwise overflow the host thread's stack before the
//! interpreter's own call-depth limit triggers.
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough; the engine manages its own stack.

/// Remaining-stack threshold below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// Wrap every recursive entry point of the evaluator with this:
///
/// ```text
/// pub fn evaluate(&mut self, expr: &Expr) -> EvalResult {
///     ensure_sufficient_stack(|| self.evaluate_inner(expr))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: call `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_evaluation_depth_survives() {
        fn nest(depth: u32) -> u32 {
            ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
        }

        assert_eq!(nest(200_000), 200_000);
    }

    #[test]
    fn result_passes_through() {
        let result: Result<&str, ()> = ensure_sufficient_stack(|| Ok("done"));
        assert_eq!(result, Ok("done"));
    }
}
