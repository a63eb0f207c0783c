//! What native functions and component methods may ask of the engine.

use brs_ir::Location;

use crate::component::ObjectFactory;

/// Engine services available to native code during a call.
///
/// Implemented by the interpreter. Kept small so components never depend
/// on the evaluator itself.
pub trait CallContext {
    /// Location of the call being served.
    fn location(&self) -> Location;

    /// Writes `text` to the output sink as is.
    fn write_output(&mut self, text: &str);

    /// Writes one diagnostic line (warnings, soft errors) to the output sink.
    fn write_diagnostic(&mut self, line: &str);

    /// Registered component constructors.
    fn object_factory(&self) -> &ObjectFactory;
}
