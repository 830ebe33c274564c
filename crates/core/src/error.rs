//! Host-level failures: bad heap references, malformed builtins.
//!
//! In-language failures (the ones a Wisp script can catch) are not
//! represented here — those travel as [`crate::methods::MethodResult`]
//! and mainloop `Status` values, per the engine's own error-handling
//! design. `CogError` is reserved for bugs and boot-time failures a
//! script cannot observe or recover from.

use std::fmt;

#[derive(Debug)]
pub enum CogError {
    /// A `CellRef` outlived the heap it was allocated from, or was
    /// never valid (e.g. came from a different `Heap` instance).
    DanglingRef,
    /// A builtin or method was invoked on a cell variant it does not
    /// support and no soft-dispatch fallback was registered.
    NoSuchMethod { kind: &'static str, variant: &'static str },
    /// A module registered a name that already exists in its table.
    DuplicateBinding(String),
}

impl fmt::Display for CogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CogError::DanglingRef => write!(f, "dangling cell reference"),
            CogError::NoSuchMethod { kind, variant } => {
                write!(f, "no {kind} method registered for variant {variant}")
            }
            CogError::DuplicateBinding(name) => {
                write!(f, "duplicate builtin binding: {name}")
            }
        }
    }
}

impl std::error::Error for CogError {}
