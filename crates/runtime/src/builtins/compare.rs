//! Comparison and boolean logic words.

use wisp_core::{MethodResult, Module, Variant};

use super::ctx;
use crate::mainloop::{Interpreter, Status};

fn as_f64(interp: &Interpreter, v: wisp_core::Value) -> Option<f64> {
    match interp.heap.variant(v) {
        Variant::Integer(n) => Some(*n as f64),
        Variant::Float(f) => Some(*f),
        _ => None,
    }
}

fn numeric_cmp(
    ctx_ptr: *mut (),
    op: impl Fn(std::cmp::Ordering) -> bool,
) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let (Some(fa), Some(fb)) = (as_f64(interp, a), as_f64(interp, b)) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Some(ordering) = fa.partial_cmp(&fb) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let result = op(ordering);
    let v = interp.heap.alloc(Variant::Bool(result));
    interp.push(v);
    MethodResult::Handled
}

fn eq(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let result = structural_eq(interp, a, b);
    let v = interp.heap.alloc(Variant::Bool(result));
    interp.push(v);
    MethodResult::Handled
}

/// `=`: structural equality for scalars and strings, identity for
/// everything else (matching the "dispatch on EQ method" design —
/// since the catalog has no per-tag `Eq` method table yet, this
/// covers the scalar/string cases the testable properties exercise
/// and falls back to cell identity).
fn structural_eq(interp: &Interpreter, a: wisp_core::Value, b: wisp_core::Value) -> bool {
    use crate::string;
    match (interp.heap.variant(a), interp.heap.variant(b)) {
        (Variant::Integer(x), Variant::Integer(y)) => x == y,
        (Variant::Float(x), Variant::Float(y)) => x == y,
        (Variant::Bool(x), Variant::Bool(y)) => x == y,
        (Variant::Identifier(x), Variant::Identifier(y)) => x == y,
        (Variant::Symbol(x), Variant::Symbol(y)) => x == y,
        (Variant::StringChunk { .. }, Variant::StringChunk { .. }) => {
            string::to_bytes(interp.heap, a) == string::to_bytes(interp.heap, b)
        }
        _ => a.cell_ref() == b.cell_ref(),
    }
}

fn lt(ctx_ptr: *mut ()) -> MethodResult {
    numeric_cmp(ctx_ptr, |o| o == std::cmp::Ordering::Less)
}
fn gt(ctx_ptr: *mut ()) -> MethodResult {
    numeric_cmp(ctx_ptr, |o| o == std::cmp::Ordering::Greater)
}
fn le(ctx_ptr: *mut ()) -> MethodResult {
    numeric_cmp(ctx_ptr, |o| o != std::cmp::Ordering::Greater)
}
fn ge(ctx_ptr: *mut ()) -> MethodResult {
    numeric_cmp(ctx_ptr, |o| o != std::cmp::Ordering::Less)
}

fn as_bool(interp: &Interpreter, v: wisp_core::Value) -> Option<bool> {
    match interp.heap.variant(v) {
        Variant::Bool(b) => Some(*b),
        _ => None,
    }
}

fn or(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let (Some(ba), Some(bb)) = (as_bool(interp, a), as_bool(interp, b)) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = interp.heap.alloc(Variant::Bool(ba || bb));
    interp.push(v);
    MethodResult::Handled
}

fn and(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let (Some(ba), Some(bb)) = (as_bool(interp, a), as_bool(interp, b)) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = interp.heap.alloc(Variant::Bool(ba && bb));
    interp.push(v);
    MethodResult::Handled
}

fn not(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Some(ba) = as_bool(interp, a) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = interp.heap.alloc(Variant::Bool(!ba));
    interp.push(v);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("compare");
    m.register_fn("=", eq);
    m.register_fn("<", lt);
    m.register_fn(">", gt);
    m.register_fn("<=", le);
    m.register_fn(">=", ge);
    m.register_fn("Or", or);
    m.register_fn("And", and);
    m.register_fn("Not", not);
    m
}
