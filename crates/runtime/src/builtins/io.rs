//! `Puts`/`Getch`/`Ungets`, dispatched onto whichever stream is given:
//! the three standard streams (thin `Foreign` markers wrapping real OS
//! handles) or a user `IoString`.

use std::io::{Read, Write};
use std::rc::Rc;

use wisp_core::value::ForeignData;
use wisp_core::{MethodResult, Module, Value, Variant};

use super::ctx;
use crate::iostring;
use crate::mainloop::{Interpreter, Status};

/// Marker payload for a native OS stream; `Foreign::type_name` records
/// which one so the builtins below know how to read/write it.
struct NativeStream;

pub fn make_stdout(interp: &mut Interpreter) -> Value {
    interp.heap.alloc(Variant::Foreign(ForeignData {
        data: Rc::new(NativeStream),
        traced: Vec::new(),
        type_name: "Stdout",
    }))
}

pub fn make_stderr(interp: &mut Interpreter) -> Value {
    interp.heap.alloc(Variant::Foreign(ForeignData {
        data: Rc::new(NativeStream),
        traced: Vec::new(),
        type_name: "Stderr",
    }))
}

pub fn make_stdin(interp: &mut Interpreter) -> Value {
    interp.heap.alloc(Variant::Foreign(ForeignData {
        data: Rc::new(NativeStream),
        traced: Vec::new(),
        type_name: "Stdin",
    }))
}

fn stream_kind(interp: &Interpreter, stream: Value) -> Option<&'static str> {
    match interp.heap.variant(stream) {
        Variant::Foreign(fd) => Some(fd.type_name),
        Variant::IoString(_) => Some("IoString"),
        _ => None,
    }
}

fn puts(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(stream), Some(text_val)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let text = crate::string::to_string_lossy(&interp.heap, text_val);
    match stream_kind(interp, stream) {
        Some("Stdout") => {
            print!("{text}");
            let _ = std::io::stdout().flush();
        }
        Some("Stderr") => {
            eprint!("{text}");
        }
        Some("IoString") => {
            if iostring::puts(&mut interp.heap, stream, &text).is_err() {
                interp.status = Status::Error;
                return MethodResult::Error;
            }
        }
        _ => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    }
    MethodResult::Handled
}

fn getch(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let Some(stream) = interp.pop() else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let byte = match stream_kind(interp, stream) {
        Some("Stdin") => {
            let mut buf = [0u8; 1];
            match std::io::stdin().read(&mut buf) {
                Ok(1) => Some(buf[0]),
                _ => None,
            }
        }
        Some("IoString") => iostring::getch(&mut interp.heap, stream),
        _ => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    };
    let v = match byte {
        Some(b) => interp.heap.alloc(Variant::Integer(b as i64)),
        None => interp.heap.alloc(Variant::Eof),
    };
    interp.push(v);
    MethodResult::Handled
}

fn ungets(ctx_ptr: *mut ()) -> MethodResult {
    let interp = unsafe { ctx(ctx_ptr) };
    let (Some(stream), Some(text_val)) = (interp.pop(), interp.pop()) else {
        interp.status = Status::Error;
        return MethodResult::Error;
    };
    let bytes = crate::string::to_bytes(&interp.heap, text_val);
    match stream_kind(interp, stream) {
        Some("IoString") => iostring::ungets(&mut interp.heap, stream, &bytes),
        _ => {
            interp.status = Status::Error;
            return MethodResult::Error;
        }
    }
    MethodResult::Handled
}

pub fn module() -> Module {
    let mut m = Module::new("io");
    m.register_fn("Puts", puts);
    m.register_fn("Getch", getch);
    m.register_fn("Ungets", ungets);
    m
}
