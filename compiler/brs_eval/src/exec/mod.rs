//! Statement helpers that need no interpreter state.
//!
//! - `control` - conditions, counted loop bounds and `dim` array trees
//! - `print` - print zones and number spacing
//! - `throw` - thrown values to errors and errors to catch records

pub mod control;
pub mod print;
pub mod throw;
