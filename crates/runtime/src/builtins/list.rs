//! List words. `Stack` snapshots the work stack itself as a list,
//! per the §8 example transcripts.

use wisp_core::{MethodResult, Module, list};

use super::ctx;
use crate::mainloop::{Interpreter, Status};

fn cons(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(tail), Some(car)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = list::cons(&mut interp.heap, car, tail);
    interp.push(v);
    MethodResult::Handled
}

fn car(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    match list::car(&interp.heap, a) {
        Some(v) => {
            interp.push(v);
            MethodResult::Handled
        }
        None => {
            interp.status = Status::Error;
            MethodResult::Error
        }
    }
}

fn cdr(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    match list::cdr(&interp.heap, a) {
        Some(v) => {
            interp.push(v);
            MethodResult::Handled
        }
        None => {
            interp.status = Status::Error;
            MethodResult::Error
        }
    }
}

/// Snapshots the current work stack as a list, top of stack first,
/// without removing anything from the stack.
fn stack(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let items: Vec<_> = interp.work_stack.iter().rev().copied().collect();
    let snapshot = list::from_iter(&mut interp.heap, items.into_iter());
    interp.push(snapshot);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("list");
    m.register_fn("Cons", cons);
    m.register_fn("Car", car);
    m.register_fn("Cdr", cdr);
    m.register_fn("Stack", stack);
    m
}
