//! `Def`/`Let`: pop a value and the literal name symbol the parser
//! captured ahead of it, and bind the name in the current scope.
//! `Def` is immutable, `Let` installs a mutable `Var` binding.

use wisp_core::{MethodResult, Module, Variant};

use super::ctx;
use crate::mainloop::{Interpreter, Status};

fn name_symbol(interp: &mut Interpreter, value: wisp_core::Value) -> Option<wisp_core::Identifier> {
    match interp.heap.variant(value) {
        Variant::Symbol(id) => Some(*id),
        _ => None,
    }
}

fn def_(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(value), Some(name)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Some(id) = name_symbol(interp, name) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    interp.env.define(id, value);
    MethodResult::Handled
}

fn let_(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(value), Some(name)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Some(id) = name_symbol(interp, name) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Interpreter { env, heap, .. } = interp;
    env.define_var(heap, id, value);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("binder");
    m.register_fn("Def", def_);
    m.register_fn("Let", let_);
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::{Dispatch, Heap, Registry};

    fn new_interp() -> Interpreter {
        let mut registry = Registry::new(Dispatch::Soft);
        registry.load(module());
        Interpreter::new(Heap::new(), registry)
    }

    #[test]
    fn def_binds_immutably() {
        let mut interp = new_interp();
        let x = wisp_core::Identifier::try_pack("x").unwrap();
        let name = interp.heap.alloc(Variant::Symbol(x));
        let five = interp.heap.alloc(Variant::Integer(5));
        interp.push(name);
        interp.push(five);
        let ctx_ptr = &mut interp as *mut Interpreter as *mut ();
        assert_eq!(def_(ctx_ptr), MethodResult::Handled);
        assert!(interp.env.lookup(x).is_some());
    }

    #[test]
    fn def_with_empty_stack_is_an_arity_error() {
        let mut interp = new_interp();
        let ctx_ptr = &mut interp as *mut Interpreter as *mut ();
        assert_eq!(def_(ctx_ptr), MethodResult::Error);
        assert_eq!(interp.status, Status::Error);
    }
}
