//! The builtin catalog: a trivial stack shuffle per module, grouped
//! the way the original engine's builtin tables are grouped.

pub mod arith;
pub mod binder;
pub mod compare;
pub mod control;
pub mod io;
pub mod list;
pub mod string;

use wisp_core::Registry;

use crate::mainloop::Interpreter;

/// # Safety
/// Every builtin is only ever invoked by `Interpreter::call_builtin`,
/// which always passes `self` cast to `*mut ()` — this just undoes
/// that cast. Never call a builtin function pointer directly with any
/// other pointer.
pub(crate) unsafe fn ctx<'a>(ctx: *mut ()) -> &'a mut Interpreter {
    unsafe { &mut *(ctx as *mut Interpreter) }
}

/// Registers every builtin module into `registry`. `Registry::dispatch`
/// scans modules in registration order and takes the first match, so
/// this order is the priority order for any method two modules both
/// answer.
pub fn install_all(registry: &mut Registry) {
    registry.load(arith::module());
    registry.load(compare::module());
    registry.load(string::module());
    registry.load(list::module());
    registry.load(io::module());
    registry.load(control::module());
    registry.load(binder::module());
}
