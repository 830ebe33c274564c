//! Method dispatch registry.
//!
//! A [`Module`] bundles the function table and method table a builtin
//! package contributes. Function names resolve to a fixed slot in the
//! interpreter's global builtin table (looked up once at parse time,
//! per the identifier-packing design); methods resolve by `(Tag,
//! MethodKind)` and are consulted whenever the mainloop needs a
//! variant to answer `EXEC`, `SHOW`, or another well-known message.

use std::collections::HashMap;

use crate::value::{Tag, Value};

/// The well-known messages every variant may answer. `Exec`/`Show`
/// naming follows the original engine's `COG_M_EXEC`/`COG_M_SHOW`
/// convention (see DESIGN.md, Open Question 3) rather than an
/// invented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Exec,
    Show,
    ShowRec,
    Hash,
    StreamPuts,
    StreamGetch,
    StreamUngets,
}

/// A builtin function's signature: it receives the live interpreter
/// state opaquely via `ctx` (concretely `&mut wisp_runtime::mainloop::Interpreter`,
/// downcast by the caller — kept generic here so `wisp-core` does not
/// depend on `wisp-runtime`) and returns whether it completed, needs a
/// dispatch fallback, or failed.
pub type BuiltinFn = fn(ctx: *mut ()) -> MethodResult;
pub type MethodFn = fn(ctx: *mut (), subject: Value) -> MethodResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodResult {
    Handled,
    /// Soft-dispatch sentinel: never propagated as a mainloop status,
    /// only ever returned from a method lookup that came up empty.
    NotImplemented,
    Error,
}

/// How a missing `(Tag, MethodKind)` pair is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Return [`MethodResult::NotImplemented`] to the caller.
    Soft,
    /// A missing method is a programmer bug: panic naming the pair.
    Strict,
}

#[derive(Default)]
pub struct Module {
    pub name: &'static str,
    functions: Vec<(&'static str, BuiltinFn)>,
    methods: HashMap<(Tag, MethodKind), MethodFn>,
}

impl Module {
    pub fn new(name: &'static str) -> Self {
        Module { name, functions: Vec::new(), methods: HashMap::new() }
    }

    /// Registers `name` as a builtin function. Panics on a duplicate
    /// name within the same module — that is always a programming
    /// error, never a script-level one.
    pub fn register_fn(&mut self, name: &'static str, f: BuiltinFn) {
        if self.functions.iter().any(|(n, _)| *n == name) {
            panic!("duplicate builtin binding: {name}");
        }
        self.functions.push((name, f));
    }

    pub fn register_method(&mut self, tag: Tag, kind: MethodKind, f: MethodFn) {
        self.methods.insert((tag, kind), f);
    }

    pub fn functions(&self) -> &[(&'static str, BuiltinFn)] {
        &self.functions
    }

    pub fn lookup_method(&self, tag: Tag, kind: MethodKind) -> Option<MethodFn> {
        self.methods.get(&(tag, kind)).copied()
    }
}

/// The global registry: an ordered list of modules (registration order
/// is preserved deliberately, since dispatch order is observable), a
/// flattened function table for packed-identifier resolution, and a
/// merged method table.
pub struct Registry {
    modules: Vec<Module>,
    function_table: Vec<(&'static str, BuiltinFn)>,
    dispatch: Dispatch,
}

impl Registry {
    pub fn new(dispatch: Dispatch) -> Self {
        Registry { modules: Vec::new(), function_table: Vec::new(), dispatch }
    }

    pub fn load(&mut self, module: Module) {
        for entry in module.functions() {
            self.function_table.push(*entry);
        }
        self.modules.push(module);
    }

    pub fn function_slot(&self, name: &str) -> Option<usize> {
        self.function_table.iter().position(|(n, _)| *n == name)
    }

    pub fn function_name(&self, slot: usize) -> Option<&'static str> {
        self.function_table.get(slot).map(|(n, _)| *n)
    }

    pub fn function_at(&self, slot: usize) -> Option<BuiltinFn> {
        self.function_table.get(slot).map(|(_, f)| *f)
    }

    pub fn dispatch(&self, tag: Tag, kind: MethodKind, ctx: *mut (), subject: Value) -> MethodResult {
        for module in self.modules.iter() {
            if let Some(f) = module.lookup_method(tag, kind) {
                return f(ctx, subject);
            }
        }
        match self.dispatch {
            Dispatch::Soft => MethodResult::NotImplemented,
            Dispatch::Strict => panic!("no {kind:?} method registered for {tag:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: *mut ()) -> MethodResult {
        MethodResult::Handled
    }

    #[test]
    fn registers_and_finds_functions_in_order() {
        let mut module = Module::new("test");
        module.register_fn("a", noop);
        module.register_fn("b", noop);
        let mut registry = Registry::new(Dispatch::Soft);
        registry.load(module);
        assert_eq!(registry.function_slot("a"), Some(0));
        assert_eq!(registry.function_slot("b"), Some(1));
        assert_eq!(registry.function_slot("missing"), None);
    }

    #[test]
    #[should_panic(expected = "duplicate builtin binding")]
    fn duplicate_registration_panics() {
        let mut module = Module::new("test");
        module.register_fn("a", noop);
        module.register_fn("a", noop);
    }
}
