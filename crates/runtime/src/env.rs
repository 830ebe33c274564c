//! Lexical environment: a stack of scopes, each a small association
//! list scanned linearly. Deliberately not a `HashMap` — scopes rarely
//! hold more than a handful of bindings, and linear scan keeps the
//! binding order observable the way the mainloop's other small
//! collections do.

use wisp_core::{Heap, Identifier, Value, Variant};

#[derive(Clone, Copy)]
pub enum Binding {
    /// An immutable binding introduced by `Def`.
    Def(Value),
    /// A mutable binding introduced by `Let`; `Value` is a `BoxCell`
    /// so assignment can update it in place without rewriting the
    /// scope's association list.
    Var(Value),
}

impl Binding {
    pub fn get(self, heap: &Heap) -> Value {
        match self {
            Binding::Def(v) => v,
            Binding::Var(boxed) => match heap.variant(boxed) {
                Variant::BoxCell(v) => *v,
                _ => boxed,
            },
        }
    }

    /// Assigns through a `Var` binding. Returns `false` for `Def`
    /// bindings, which are immutable.
    pub fn set(self, heap: &mut Heap, new_value: Value) -> bool {
        match self {
            Binding::Def(_) => false,
            Binding::Var(boxed) => {
                *heap.variant_mut(boxed) = Variant::BoxCell(new_value);
                true
            }
        }
    }
}

#[derive(Default, Clone)]
pub struct Scope {
    bindings: Vec<(Identifier, Binding)>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn define(&mut self, name: Identifier, value: Value) {
        self.bindings.push((name, Binding::Def(value)));
    }

    pub fn define_var(&mut self, heap: &mut Heap, name: Identifier, value: Value) {
        let boxed = heap.alloc(Variant::BoxCell(value));
        self.bindings.push((name, Binding::Var(boxed)));
    }

    /// Binds `name` directly to an already-allocated `BoxCell`,
    /// without allocating a new one — used when a closure re-installs
    /// a captured `Var` binding so mutations remain visible to every
    /// other closure sharing that binding.
    pub fn define_existing_var(&mut self, name: Identifier, boxed: Value) {
        self.bindings.push((name, Binding::Var(boxed)));
    }

    pub fn lookup(&self, name: Identifier) -> Option<Binding> {
        self.bindings.iter().rev().find(|(n, _)| *n == name).map(|(_, b)| *b)
    }

    pub fn bindings(&self) -> &[(Identifier, Binding)] {
        &self.bindings
    }
}

impl Binding {
    /// Raw cell reference this binding carries: the value itself for
    /// `Def`, the `BoxCell` for `Var` — used when flattening an
    /// environment for closure capture, where the distinction must
    /// survive the round trip.
    pub fn raw(self) -> Value {
        match self {
            Binding::Def(v) => v,
            Binding::Var(boxed) => boxed,
        }
    }
}

/// The environment: an explicit stack of scopes, innermost last.
/// Lookup walks from the innermost scope outward, matching the
/// mainloop's call/return discipline (`InstallCallScope` pushes,
/// `RestoreCallerScope` pops).
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment { scopes: vec![Scope::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 { self.scopes.pop() } else { None }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("environment always has a root scope")
    }

    pub fn lookup(&self, name: Identifier) -> Option<Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    pub fn define(&mut self, name: Identifier, value: Value) {
        self.current().define(name, value);
    }

    pub fn define_var(&mut self, heap: &mut Heap, name: Identifier, value: Value) {
        self.scopes.last_mut().expect("root scope").define_var(heap, name, value);
    }

    pub fn define_existing_var(&mut self, name: Identifier, boxed: Value) {
        self.current().define_existing_var(name, boxed);
    }

    /// Assigns to an existing `Var` binding, searching outward.
    /// Returns `false` if `name` is unbound or bound immutably.
    pub fn assign(&mut self, heap: &mut Heap, name: Identifier, value: Value) -> bool {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.lookup(name) {
                return binding.set(heap, value);
            }
        }
        false
    }

    /// Snapshots the current scope stack as the `scope` a closure
    /// captures. Scopes themselves are not cloned (their bindings
    /// stay live behind `Rc`-free `Vec`s owned by the environment);
    /// closures instead capture an index into this stack's depth at
    /// the point of closure creation and re-establish that many
    /// scopes on invocation, matching the "late-bound at evaluation
    /// time" rule in the closures design.
    pub fn snapshot_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Clones the full scope stack, innermost last — used to snapshot
    /// the environment into a captured continuation.
    pub fn snapshot_scopes(&self) -> Vec<Scope> {
        self.scopes.clone()
    }

    /// Replaces the entire scope stack wholesale — used to restore a
    /// continuation's captured environment on invocation.
    pub fn restore_scopes(&mut self, scopes: Vec<Scope>) {
        self.scopes = scopes;
    }

    /// Every `Value` a GC root walk must keep alive on this environment's
    /// behalf: a `Def`'s bound value, or a `Var`'s `BoxCell` itself (so
    /// the indirection cell survives even between mutations).
    pub fn roots(&self) -> Vec<Value> {
        let mut out = Vec::new();
        for scope in &self.scopes {
            for (_, binding) in scope.bindings() {
                out.push(binding.raw());
            }
        }
        out
    }

    /// Flattens every visible binding (innermost scope wins on name
    /// collision) into `(name, raw-cell)` pairs, for building the
    /// association list a closure captures.
    pub fn flatten(&self) -> Vec<(Identifier, Value)> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for scope in self.scopes.iter().rev() {
            for (name, binding) in scope.bindings().iter().rev() {
                if seen.insert(*name) {
                    out.push((*name, binding.raw()));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::ident::Identifier;

    #[test]
    fn def_then_lookup() {
        let mut heap = Heap::new();
        let mut env = Environment::new();
        let x = Identifier::try_pack("x").unwrap();
        let v = heap.alloc(Variant::Integer(5));
        env.define(x, v);
        assert!(env.lookup(x).is_some());
    }

    #[test]
    fn var_is_mutable_def_is_not() {
        let mut heap = Heap::new();
        let mut env = Environment::new();
        let x = Identifier::try_pack("x").unwrap();
        let y = Identifier::try_pack("y").unwrap();
        let v1 = heap.alloc(Variant::Integer(1));
        let v2 = heap.alloc(Variant::Integer(2));
        env.define(x, v1);
        env.define_var(&mut heap, y, v1);
        assert!(!env.assign(&mut heap, x, v2));
        assert!(env.assign(&mut heap, y, v2));
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut heap = Heap::new();
        let mut env = Environment::new();
        let x = Identifier::try_pack("x").unwrap();
        let outer = heap.alloc(Variant::Integer(1));
        let inner = heap.alloc(Variant::Integer(2));
        env.define(x, outer);
        env.push_scope();
        env.define(x, inner);
        let found = env.lookup(x).unwrap().get(&heap);
        match heap.variant(found) {
            Variant::Integer(n) => assert_eq!(*n, 2),
            _ => panic!("wrong variant"),
        }
        env.pop_scope();
        let found = env.lookup(x).unwrap().get(&heap);
        match heap.variant(found) {
            Variant::Integer(n) => assert_eq!(*n, 1),
            _ => panic!("wrong variant"),
        }
    }
}
