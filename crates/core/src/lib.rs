//! Tagged GC heap, value model, and method dispatch registry.
//!
//! `wisp-core` is the lowest layer: it owns the cell representation, the
//! allocator/collector, and the registry builtin modules use to attach
//! behavior to cell variants. It knows nothing about environments, the
//! mainloop, or parsing — those live in `wisp-runtime` and `wisp-parser`.

pub mod error;
pub mod heap;
pub mod ident;
pub mod list;
pub mod methods;
pub mod value;

pub use error::CogError;
pub use heap::{CellRef, Heap};
pub use ident::Identifier;
pub use methods::{BuiltinFn, Dispatch, MethodFn, MethodKind, MethodResult, Module, Registry};
pub use value::{Cell, Tag, Value, Variant, hash_float};
