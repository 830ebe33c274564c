//! Control-flow combinators: `Do` runs a quoted block inline in the
//! current environment; `CallCC` is `call/cc`.

use wisp_core::value::Tag;
use wisp_core::{MethodResult, Module};

use super::ctx;
use crate::closure;
use crate::mainloop::{Interpreter, Status};

fn do_(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(quoted) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    match interp.heap.tag_of(quoted) {
        Tag::Block | Tag::Closure => interp.invoke(quoted),
        _ => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    }
    MethodResult::Handled
}

fn call_cc(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(receiver) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    closure::call_cc(interp, receiver);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("control");
    m.register_fn("Do", do_);
    m.register_fn("CallCC", call_cc);
    m
}
