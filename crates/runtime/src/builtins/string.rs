//! String words, layered over `crate::string`'s chunked-rope
//! operations. The `IndexOf`/`Repeat` pair is the supplement drawn
//! from the original engine's string helpers that the distilled
//! catalog omitted (see SPEC_FULL.md §9).

use wisp_core::{MethodResult, Module, Variant};

use super::ctx;
use crate::mainloop::{Interpreter, Status};
use crate::string;

fn as_int(interp: &Interpreter, v: wisp_core::Value) -> Option<i64> {
    match interp.heap.variant(v) {
        Variant::Integer(n) => Some(*n),
        _ => None,
    }
}

fn append(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = string::append(&mut interp.heap, a, b);
    interp.push(v);
    MethodResult::Handled
}

fn len(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(a) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let n = string::byte_len(&interp.heap, a) as i64;
    let v = interp.heap.alloc(Variant::Integer(n));
    interp.push(v);
    MethodResult::Handled
}

fn substring(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(end), Some(start), Some(s)) = (interp.pop(), interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let (Some(start), Some(end)) = (as_int(interp, start), as_int(interp, end)) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = string::substring(&mut interp.heap, s, start.max(0) as usize, end.max(0) as usize);
    interp.push(v);
    MethodResult::Handled
}

fn cmp(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let ordering = string::cmp(&interp.heap, a, b) as i64;
    let v = interp.heap.alloc(Variant::Integer(ordering));
    interp.push(v);
    MethodResult::Handled
}

fn cmp_ci(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(b), Some(a)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let ordering = string::cmp_ci(&interp.heap, a, b) as i64;
    let v = interp.heap.alloc(Variant::Integer(ordering));
    interp.push(v);
    MethodResult::Handled
}

fn index_of(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(needle), Some(haystack)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let idx = string::index_of(&interp.heap, haystack, needle).map(|i| i as i64).unwrap_or(-1);
    let v = interp.heap.alloc(Variant::Integer(idx));
    interp.push(v);
    MethodResult::Handled
}

fn repeat(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(count), Some(s)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let Some(count) = as_int(interp, count) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let v = string::repeat(&mut interp.heap, s, count.max(0) as usize);
    interp.push(v);
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("string");
    m.register_fn("Append", append);
    m.register_fn("Len", len);
    m.register_fn("Substring", substring);
    m.register_fn("Cmp", cmp);
    m.register_fn("CmpCi", cmp_ci);
    m.register_fn("IndexOf", index_of);
    m.register_fn("Repeat", repeat);
    m
}
