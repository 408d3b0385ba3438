//! Structural signature classification for selected commands.
//!
//! Everything here is a pure string/type computation over a single
//! [`Command`]; no cross-command state is involved.

use crate::registry::Command;

/// The integer type OpenCL threads its status codes through.
const ERROR_TYPE: &str = "cl_int";
/// The error-out parameter shape, `cl_int*`.
const ERROR_OUT_TYPE: &str = "cl_int*";

/// How a command reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSignal {
    /// The return value is the `cl_int` status itself.
    ReturnsErrorCode,
    /// The last parameter is a `cl_int*` the status is written through.
    LastParamErrorOut,
    /// Neither convention applies.
    None,
}

/// The function-pointer typedef identifier, e.g. `PFNCLCREATECONTEXTFUNC`.
pub fn pfn_typedef_name(command: &Command) -> String {
    format!("PFN{}FUNC", command.name().to_uppercase())
}

/// The fallback stub identifier, e.g. `clCreateContextDummyImpl`.
pub fn fallback_name(command: &Command) -> String {
    format!("{}DummyImpl", command.name())
}

/// Classify a command's error-signaling convention.
///
/// A nullary command returning `cl_int` always counts as error-returning,
/// while a non-nullary one is excluded whenever its last parameter has the
/// error-out shape.
pub fn error_signal(command: &Command) -> ErrorSignal {
    let last_is_error_out = command
        .params()
        .last()
        .is_some_and(|p| p.ty.text() == ERROR_OUT_TYPE);
    if command.return_type().text() == ERROR_TYPE && !last_is_error_out {
        ErrorSignal::ReturnsErrorCode
    } else if last_is_error_out {
        ErrorSignal::LastParamErrorOut
    } else {
        ErrorSignal::None
    }
}
