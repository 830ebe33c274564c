//! Environment, trampoline mainloop, closures/continuations, the
//! dumper, and the builtin catalog — everything that executes parsed
//! Wisp code, given cells `wisp-core` already knows how to allocate.

pub mod builtins;
pub mod closure;
pub mod dump;
pub mod env;
pub mod iostring;
pub mod mainloop;
pub mod string;

pub use env::{Binding, Environment, Scope};
pub use mainloop::{Action, Frame, Interpreter, Status};

/// Builds a fresh interpreter with every builtin module loaded and the
/// three standard streams bound in the root scope, ready to execute
/// parsed input.
pub fn new_interpreter(dispatch: wisp_core::Dispatch) -> Interpreter {
    let heap = wisp_core::Heap::new();
    let mut registry = wisp_core::Registry::new(dispatch);
    builtins::install_all(&mut registry);
    let mut interp = Interpreter::new(heap, registry);

    let stdout = builtins::io::make_stdout(&mut interp);
    let stderr = builtins::io::make_stderr(&mut interp);
    let stdin = builtins::io::make_stdin(&mut interp);
    interp.stdout = Some(stdout);
    interp.stderr = Some(stderr);
    interp.stdin = Some(stdin);

    let stdout_id = wisp_core::Identifier::try_pack("stdout").expect("fits packed alphabet");
    let stderr_id = wisp_core::Identifier::try_pack("stderr").expect("fits packed alphabet");
    let stdin_id = wisp_core::Identifier::try_pack("stdin").expect("fits packed alphabet");
    interp.env.define(stdout_id, stdout);
    interp.env.define(stderr_id, stderr);
    interp.env.define(stdin_id, stdin);

    interp
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::{Dispatch, Variant};

    #[test]
    fn new_interpreter_has_standard_streams_bound() {
        let interp = new_interpreter(Dispatch::Soft);
        let id = wisp_core::Identifier::try_pack("stdout").unwrap();
        assert!(interp.env.lookup(id).is_some());
    }

    #[test]
    fn builtin_identifiers_resolve_to_function_slots() {
        let interp = new_interpreter(Dispatch::Soft);
        assert!(interp.registry.function_slot("+").is_some());
        assert!(interp.registry.function_slot("Dup").is_some());
    }

    #[test]
    fn arithmetic_end_to_end() {
        let mut interp = new_interpreter(Dispatch::Soft);
        let one = interp.heap.alloc(Variant::Integer(1));
        let two = interp.heap.alloc(Variant::Integer(2));
        let plus_slot = interp.registry.function_slot("+").unwrap();
        let plus = interp.heap.alloc(Variant::BuiltinFunc(plus_slot));
        interp.queue_exec(plus);
        interp.queue_exec(two);
        interp.queue_exec(one);
        interp.run();
        let result = interp.pop().unwrap();
        match interp.heap.variant(result) {
            Variant::Integer(n) => assert_eq!(*n, 3),
            _ => panic!("expected integer"),
        }
    }
}
