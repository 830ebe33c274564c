//! Closures and first-class continuations.
//!
//! A closure is a `Block` plus the environment visible where it was
//! created, flattened into an ordinary association list so the
//! mainloop can rebuild scopes from it without any type the GC does
//! not already know how to trace. A continuation goes one step
//! further: it snapshots the whole machine (work stack, pending
//! queue, environment) so invoking it later resumes exactly where
//! capture left off, including past any number of intervening calls.

use std::rc::Rc;

use wisp_core::value::ForeignData;
use wisp_core::{Value, Variant, list};

use crate::env::Scope;
use crate::mainloop::{Action, Frame, Interpreter, Status};

/// Builds a closure from `body` (a `Block` value) and the
/// interpreter's current environment.
pub fn make_closure(interp: &mut Interpreter, body: Value) -> Value {
    let bindings = interp.env.flatten();
    let pairs: Vec<Value> = bindings
        .into_iter()
        .map(|(name, raw)| {
            let name_val = interp.heap.alloc(Variant::Identifier(name));
            list::cons(&mut interp.heap, name_val, raw)
        })
        .collect();
    let scope = list::from_iter(&mut interp.heap, pairs.into_iter());
    interp.heap.alloc(Variant::Closure(wisp_core::value::ClosureData { body, scope }))
}

struct ContinuationSnapshot {
    work_stack: Vec<Value>,
    queue: Vec<Frame>,
    scopes: Vec<Scope>,
}

fn scope_values(scopes: &[Scope]) -> Vec<Value> {
    scopes.iter().flat_map(|s| s.bindings().iter().map(|(_, b)| b.raw())).collect()
}

fn frame_values(queue: &[Frame]) -> Vec<Value> {
    let mut out = Vec::new();
    for frame in queue {
        match frame.action {
            Action::Exec(v) | Action::Invoke(v) => out.push(v),
            Action::InstallCallScope(Some(v)) => out.push(v),
            _ => {}
        }
        if let Some(c) = frame.cookie {
            out.push(c);
        }
    }
    out
}

/// Captures the current work stack, pending queue, and scope stack as
/// a `Foreign` value — a full machine snapshot, so resuming it later
/// restores exactly the state at capture time, regardless of what ran
/// between capture and invocation.
pub fn capture_continuation(interp: &mut Interpreter) -> Value {
    let snapshot = ContinuationSnapshot {
        work_stack: interp.work_stack.clone(),
        queue: interp.queue.clone(),
        scopes: interp.env.snapshot_scopes(),
    };
    let mut traced: Vec<_> = snapshot.work_stack.iter().map(|v| v.cell_ref()).collect();
    traced.extend(frame_values(&snapshot.queue).iter().map(|v| v.cell_ref()));
    traced.extend(scope_values(&snapshot.scopes).iter().map(|v| v.cell_ref()));
    interp.heap.alloc(Variant::Foreign(ForeignData {
        data: Rc::new(snapshot),
        traced,
        type_name: "Continuation",
    }))
}

/// Invokes a captured continuation with `arg` as its sole input:
/// restores the snapshotted work stack, pending queue, and scope
/// stack, then pushes `arg`. This makes invocation an escape — control
/// does not return to the invocation site, matching the common
/// `call/cc`-as-escape usage pattern this engine targets — but the
/// resumed state (including any outstanding call frames and bindings)
/// is exactly what it was at capture time.
pub fn invoke_continuation(interp: &mut Interpreter, k: Value, arg: Value) {
    let Variant::Foreign(fd) = interp.heap.variant(k) else {
        interp.status = Status::Error;
        return;
    };
    let Some(snapshot) = fd.data.downcast_ref::<ContinuationSnapshot>() else {
        interp.status = Status::Error;
        return;
    };
    interp.work_stack = snapshot.work_stack.clone();
    interp.queue = snapshot.queue.clone();
    interp.env.restore_scopes(snapshot.scopes.clone());
    interp.push(arg);
}

/// `call/cc`: invokes `receiver` (a `Block`/`Closure`) with a freshly
/// captured continuation pushed as its argument.
pub fn call_cc(interp: &mut Interpreter, receiver: Value) {
    let k = capture_continuation(interp);
    interp.push(k);
    interp.queue_action(Frame::always(Action::Invoke(receiver)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mainloop::Interpreter;
    use wisp_core::{Dispatch, Heap, Registry};

    fn new_interp() -> Interpreter {
        Interpreter::new(Heap::new(), Registry::new(Dispatch::Soft))
    }

    #[test]
    fn closure_captures_visible_bindings() {
        let mut interp = new_interp();
        let x = wisp_core::Identifier::try_pack("x").unwrap();
        let v = interp.heap.alloc(Variant::Integer(9));
        interp.env.define(x, v);
        let body = list::nil(&mut interp.heap);
        let closure = make_closure(&mut interp, body);
        match interp.heap.variant(closure) {
            Variant::Closure(c) => {
                let pairs = list::to_vec(&interp.heap, c.scope);
                assert_eq!(pairs.len(), 1);
            }
            _ => panic!("expected closure"),
        }
    }

    /// Invoking a captured continuation restores the work stack to
    /// exactly what it was at capture time, plus the supplied
    /// argument, regardless of what the stack looked like (or how many
    /// intervening calls happened) right before the invoke.
    #[test]
    fn invoking_a_continuation_restores_the_captured_stack_plus_arg() {
        let mut interp = new_interp();
        let one = interp.heap.alloc(Variant::Integer(1));
        let two = interp.heap.alloc(Variant::Integer(2));
        interp.push(one);
        interp.push(two);

        let k = capture_continuation(&mut interp);

        // Perturb the stack after capture, as an intervening call would.
        let ninety_nine = interp.heap.alloc(Variant::Integer(99));
        interp.push(ninety_nine);
        interp.pop();
        interp.pop();

        let arg = interp.heap.alloc(Variant::Integer(42));
        invoke_continuation(&mut interp, k, arg);

        let values: Vec<i64> = interp
            .work_stack
            .iter()
            .map(|v| match interp.heap.variant(*v) {
                Variant::Integer(n) => *n,
                _ => panic!("expected integer"),
            })
            .collect();
        assert_eq!(values, vec![1, 2, 42]);
    }

    /// A continuation also restores the scope stack and pending queue
    /// it captured, not just the work stack: a binding defined after
    /// capture must not be visible once the continuation is invoked,
    /// and a frame queued after capture must not run.
    #[test]
    fn invoking_a_continuation_restores_scope_and_queue() {
        let mut interp = new_interp();
        let x = wisp_core::Identifier::try_pack("x").unwrap();
        let before = interp.heap.alloc(Variant::Integer(1));
        interp.env.define(x, before);

        let k = capture_continuation(&mut interp);

        let y = wisp_core::Identifier::try_pack("y").unwrap();
        let after = interp.heap.alloc(Variant::Integer(2));
        interp.env.define(y, after);
        let stray = interp.heap.alloc(Variant::Integer(999));
        interp.queue_action(Frame::always(Action::Exec(stray)));

        let arg = interp.heap.alloc(Variant::Integer(0));
        invoke_continuation(&mut interp, k, arg);

        assert!(interp.env.lookup(x).is_some());
        assert!(interp.env.lookup(y).is_none());
        assert!(interp.queue.is_empty());
    }
}
