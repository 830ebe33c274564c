//! The trampoline mainloop: a work stack, a when-guarded command
//! queue, and a status register. There is no native recursion for
//! executing Wisp code — every step pops one frame off the queue,
//! and running a block only ever pushes more frames, so arbitrarily
//! deep Wisp call chains never grow the Rust call stack.

use wisp_core::value::Tag;
use wisp_core::{Heap, Identifier, MethodKind, MethodResult, Registry, Value, Variant};

use crate::closure;
use crate::env::{Binding, Environment};

/// The guard a queued frame fires under. `Nil` frames always fire.
/// `OnEnter`/`OnExit` bracket a call's scope-management frames.
/// `User` lets builtins install their own named guard (used by
/// `call/cc`'s continuation-invocation frames).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Nil,
    Error,
    OnEnter,
    OnExit,
    User(Identifier),
}

#[derive(Clone, Copy)]
pub enum Action {
    /// Execute a value: for a `List`/scalar this just pushes it onto
    /// the work stack (self-evaluating), for an `Identifier` it looks
    /// the name up and executes the binding, for a `BuiltinFunc` it
    /// calls the builtin.
    Exec(Value),
    /// Invokes a quotation (`Block`/`Closure`) — used where a value is
    /// meant to run rather than be pushed as data, e.g. a captured
    /// continuation's receiver.
    Invoke(Value),
    /// Pop the environment's innermost scope (closure/call return).
    RestoreCallerScope,
    /// Push a fresh scope, optionally pre-populated by the closure
    /// this call frame belongs to.
    InstallCallScope(Option<Value>),
    /// Run a native builtin by its function-table slot.
    CallBuiltin(usize),
}

#[derive(Clone, Copy)]
pub struct Frame {
    pub when: Status,
    pub action: Action,
    pub cookie: Option<Value>,
}

impl Frame {
    pub fn always(action: Action) -> Self {
        Frame { when: Status::Nil, action, cookie: None }
    }
}

/// Ties the heap, registry, environment, and execution state together
/// so builtins (invoked as `fn(ctx: *mut ())`) can be handed a type-
/// erased pointer to this struct and cast it back.
pub struct Interpreter {
    pub heap: Heap,
    pub registry: Registry,
    pub env: Environment,
    pub work_stack: Vec<Value>,
    pub queue: Vec<Frame>,
    pub status: Status,
    pub stdout: Option<Value>,
    pub stdin: Option<Value>,
    pub stderr: Option<Value>,
}

impl Interpreter {
    pub fn new(heap: Heap, registry: Registry) -> Self {
        Interpreter {
            heap,
            registry,
            env: Environment::new(),
            work_stack: Vec::new(),
            queue: Vec::new(),
            status: Status::Nil,
            stdout: None,
            stdin: None,
            stderr: None,
        }
    }

    pub fn push(&mut self, v: Value) {
        self.work_stack.push(v);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.work_stack.pop()
    }

    pub fn queue_action(&mut self, frame: Frame) {
        self.queue.push(frame);
    }

    /// Queues `value` to be executed next (LIFO: the most recently
    /// queued frame runs first, matching a call stack's discipline).
    pub fn queue_exec(&mut self, value: Value) {
        self.queue_action(Frame::always(Action::Exec(value)));
    }

    pub fn queue_invoke(&mut self, value: Value) {
        self.queue_action(Frame::always(Action::Invoke(value)));
    }

    fn roots(&self) -> Vec<Value> {
        let mut roots: Vec<Value> = self.work_stack.clone();
        roots.extend(self.env.roots());
        for frame in &self.queue {
            if let Action::Exec(v) | Action::Invoke(v) = frame.action {
                roots.push(v);
            }
            if let Action::InstallCallScope(Some(v)) = frame.action {
                roots.push(v);
            }
            if let Some(c) = frame.cookie {
                roots.push(c);
            }
        }
        if let Some(v) = self.stdout {
            roots.push(v);
        }
        if let Some(v) = self.stdin {
            roots.push(v);
        }
        if let Some(v) = self.stderr {
            roots.push(v);
        }
        roots
    }

    fn maybe_gc(&mut self) {
        if self.heap.cells_in_use() >= self.heap.gc_threshold {
            let roots = self.roots();
            self.heap.gc(&roots);
        }
    }

    /// Runs the queue to completion (the top-level drive loop; the
    /// REPL and file-interpretation entry points both bottom out
    /// here). Returns the final status.
    pub fn run(&mut self) -> Status {
        while let Some(frame) = self.queue.pop() {
            if !Self::guard_matches(frame.when, self.status) {
                continue;
            }
            self.status = Status::Nil;
            self.step(frame);
            self.maybe_gc();
        }
        self.status
    }

    fn guard_matches(when: Status, current: Status) -> bool {
        when == Status::Nil || when == current
    }

    fn step(&mut self, frame: Frame) {
        match frame.action {
            Action::Exec(value) => self.exec(value),
            Action::RestoreCallerScope => {
                self.env.pop_scope();
            }
            Action::InstallCallScope(pre) => {
                self.env.push_scope();
                if let Some(scope_list) = pre {
                    self.install_captured_scope(scope_list);
                }
            }
            Action::CallBuiltin(slot) => self.call_builtin(slot),
        }
    }

    fn install_captured_scope(&mut self, scope_list: Value) {
        for binding in wisp_core::list::to_vec(&self.heap, scope_list) {
            let Some(name_val) = wisp_core::list::car(&self.heap, binding) else { continue };
            let Variant::Identifier(id) = self.heap.variant(name_val) else { continue };
            let id = *id;
            let Some(bound) = wisp_core::list::cdr(&self.heap, binding) else { continue };
            if self.heap.tag_of(bound) == Tag::BoxCell {
                self.env.define_existing_var(id, bound);
            } else {
                self.env.define(id, bound);
            }
        }
    }

    fn call_builtin(&mut self, slot: usize) {
        let Some(f) = self.registry.function_at(slot) else {
            self.status = Status::Error;
            return;
        };
        let ctx = self as *mut Interpreter as *mut ();
        match f(ctx) {
            MethodResult::Handled => {}
            MethodResult::Error => self.status = Status::Error,
            MethodResult::NotImplemented => self.status = Status::Error,
        }
    }

    /// Executes a single command-stream value: identifiers resolve
    /// through the environment or the builtin table and a bound
    /// builtin function is called immediately. Everything else —
    /// scalars, strings, plain lists, and quotations (`Block`/
    /// `Closure` values) alike — is self-evaluating: it is simply
    /// pushed as data. A quotation only actually runs when something
    /// explicitly invokes it (see [`Interpreter::invoke`]), which is
    /// what `Do` and continuation invocation do.
    pub fn exec(&mut self, value: Value) {
        match self.heap.tag_of(value) {
            Tag::Identifier => self.exec_identifier(value),
            Tag::BuiltinFunc => {
                let slot = match self.heap.variant(value) {
                    Variant::BuiltinFunc(slot) => *slot,
                    _ => unreachable!(),
                };
                self.queue_action(Frame::always(Action::CallBuiltin(slot)));
            }
            _ => self.push(value),
        }
    }

    /// Runs a quotation: `Block`s splice their commands inline into
    /// the caller's own environment (no new scope), `Closure`s install
    /// their captured scope first and restore the caller's on return.
    /// Used by `Do` and by continuation/`call/cc` receiver invocation.
    pub fn invoke(&mut self, value: Value) {
        match self.heap.tag_of(value) {
            Tag::Block => {
                let body = match self.heap.variant(value) {
                    Variant::Block(b) => *b,
                    _ => unreachable!(),
                };
                self.exec_inline(body);
            }
            Tag::Closure => {
                let (body, scope) = match self.heap.variant(value) {
                    Variant::Closure(c) => (c.body, c.scope),
                    _ => unreachable!(),
                };
                self.exec_block(body, Some(scope));
            }
            Tag::BuiltinFunc | Tag::Identifier => self.exec(value),
            _ => self.status = Status::Error,
        }
    }

    fn exec_identifier(&mut self, value: Value) {
        let id = match self.heap.variant(value) {
            Variant::Identifier(id) => *id,
            _ => unreachable!(),
        };
        if let Some(binding) = self.env.lookup(id) {
            let bound = binding.get(&self.heap);
            match binding {
                // Def stores the value unwrapped; EXEC runs it.
                Binding::Def(_) => self.exec(bound),
                // Var wraps the value; EXEC merely pushes the inner value.
                Binding::Var(_) => self.push(bound),
            }
            return;
        }
        if let Identifier::Builtin(slot) = id {
            self.queue_action(Frame::always(Action::CallBuiltin(slot)));
            return;
        }
        self.status = Status::Error;
    }

    /// Splices a block's commands directly into the queue without
    /// installing or restoring a scope — used by `Do`, which runs a
    /// quoted block inline in the caller's own environment rather than
    /// as a separate call frame.
    pub fn exec_inline(&mut self, body: Value) {
        for command in wisp_core::list::to_vec(&self.heap, body).into_iter().rev() {
            self.queue_exec(command);
        }
    }

    fn exec_block(&mut self, body: Value, captured_scope: Option<Value>) {
        self.queue_action(Frame::always(Action::RestoreCallerScope));
        for command in wisp_core::list::to_vec(&self.heap, body).into_iter().rev() {
            self.queue_exec(command);
        }
        self.queue_action(Frame::always(Action::InstallCallScope(captured_scope)));
    }

    /// Looks up a method through the registry, dispatching by the
    /// subject's tag. `ctx` is this interpreter, type-erased.
    pub fn dispatch_method(&mut self, kind: MethodKind, subject: Value) -> MethodResult {
        let tag = self.heap.tag_of(subject);
        let ctx = self as *mut Interpreter as *mut ();
        self.registry.dispatch(tag, kind, ctx, subject)
    }

    /// Captures the current execution state as a continuation value,
    /// per the closures/continuations design: a `Foreign` cell whose
    /// `traced` list keeps the snapshot's values alive.
    pub fn capture_continuation(&mut self) -> Value {
        closure::capture_continuation(self)
    }

    pub fn invoke_continuation(&mut self, k: Value, arg: Value) {
        closure::invoke_continuation(self, k, arg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::Variant;

    #[test]
    fn self_evaluating_scalar_just_pushes() {
        let heap = Heap::new();
        let registry = Registry::new(wisp_core::Dispatch::Soft);
        let mut interp = Interpreter::new(heap, registry);
        let five = interp.heap.alloc(Variant::Integer(5));
        interp.queue_exec(five);
        interp.run();
        assert_eq!(interp.work_stack.len(), 1);
    }
}
