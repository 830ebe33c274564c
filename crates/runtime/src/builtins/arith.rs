//! Arithmetic and stack-shuffle words, grounded directly in the
//! original engine's arithmetic builtin bodies.

use wisp_core::{MethodResult, Module, Variant};

use super::ctx;
use crate::mainloop::{Interpreter, Status};

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(interp: &Interpreter, v: wisp_core::Value) -> Option<Num> {
    match interp.heap.variant(v) {
        Variant::Integer(n) => Some(Num::Int(*n)),
        Variant::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn push_num(interp: &mut Interpreter, n: Num) {
    let v = match n {
        Num::Int(i) => interp.heap.alloc(Variant::Integer(i)),
        Num::Float(f) => interp.heap.alloc(Variant::Float(f)),
    };
    interp.push(v);
}

fn binary_numeric(
    interp: &mut Interpreter,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> MethodResult {
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let (Some(nb), Some(na)) = (as_num(interp, b), as_num(interp, a)) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let result = match (na, nb) {
        (Num::Int(x), Num::Int(y)) => Num::Int(int_op(x, y)),
        (Num::Int(x), Num::Float(y)) => Num::Float(float_op(x as f64, y)),
        (Num::Float(x), Num::Int(y)) => Num::Float(float_op(x, y as f64)),
        (Num::Float(x), Num::Float(y)) => Num::Float(float_op(x, y)),
    };
    push_num(interp, result);
    MethodResult::Handled
}

fn add(ctx_ptr: *mut ()) -> MethodResult {
    binary_numeric(unsafe { ctx(ctx_ptr) }, |a, b| a.wrapping_add(b), |a, b| a + b)
}
fn sub(ctx_ptr: *mut ()) -> MethodResult {
    binary_numeric(unsafe { ctx(ctx_ptr) }, |a, b| a.wrapping_sub(b), |a, b| a - b)
}
fn mul(ctx_ptr: *mut ()) -> MethodResult {
    binary_numeric(unsafe { ctx(ctx_ptr) }, |a, b| a.wrapping_mul(b), |a, b| a * b)
}
fn div(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    binary_numeric(
        interp,
        |a, b| if b == 0 { 0 } else { a / b },
        |a, b| a / b,
    )
}
fn modulo(ctx_ptr: *mut ()) -> MethodResult {
    binary_numeric(unsafe { ctx(ctx_ptr) }, |a, b| if b == 0 { 0 } else { a % b }, |a, b| a % b)
}

fn neg(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    match as_num(interp, a) {
        Some(Num::Int(n)) => push_num(interp, Num::Int(-n)),
        Some(Num::Float(f)) => push_num(interp, Num::Float(-f)),
        None => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    }
    MethodResult::Handled
}

fn abs(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    match as_num(interp, a) {
        Some(Num::Int(n)) => push_num(interp, Num::Int(n.abs())),
        Some(Num::Float(f)) => push_num(interp, Num::Float(f.abs())),
        None => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    }
    MethodResult::Handled
}

fn dup(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    interp.push(a);
    interp.push(a);
    MethodResult::Handled
}

fn drop_(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    if interp.pop().is_none() {
        interp.status = Status::Error;
        return MethodResult::Error;
    }
    MethodResult::Handled
}

fn swap(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    interp.push(b);
    interp.push(a);
    MethodResult::Handled
}

fn over(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    interp.push(a);
    interp.push(b);
    interp.push(a);
    MethodResult::Handled
}

fn rot(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(c), Some(b), Some(a)) = (interp.pop(), interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    interp.push(b);
    interp.push(c);
    interp.push(a);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("arith");
    m.register_fn("+", add);
    m.register_fn("-", sub);
    m.register_fn("*", mul);
    m.register_fn("/", div);
    m.register_fn("mod", modulo);
    m.register_fn("neg", neg);
    m.register_fn("abs", abs);
    m.register_fn("Dup", dup);
    m.register_fn("Drop", drop_);
    m.register_fn("Swap", swap);
    m.register_fn("Over", over);
    m.register_fn("Rot", rot);
    m
}
