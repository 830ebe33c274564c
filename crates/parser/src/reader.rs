//! Phase two: tokens become values.
//!
//! A parenthesized group collapses into a `Block`; a bare word resolves
//! to a number, a boolean, a builtin identifier, or a plain one,
//! checked in that order. `Def`/`Let` get special handling: the name
//! token that follows is captured as a literal `Symbol` rather than
//! looked up, and the three pieces are re-emitted name-value-keyword so
//! the mainloop's ordinary push/call discipline defines the binding
//! (see SPEC_FULL.md's parser section for why the source order, which
//! is keyword-name-value, has to be reordered for a stack machine).

use wisp_core::{Identifier, Value, Variant, list};
use wisp_runtime::Interpreter;

use crate::error::ParseError;
use crate::lexer::Token;

/// Reads every token into a flat list of top-level commands, ready to
/// be run with `Interpreter::exec_inline`.
pub fn read_program(interp: &mut Interpreter, tokens: &[Token]) -> Result<Value, ParseError> {
    let mut pos = 0;
    let items = read_sequence(interp, tokens, &mut pos, false)?;
    Ok(list::from_iter(&mut interp.heap, items.into_iter()))
}

fn read_sequence(
    interp: &mut Interpreter,
    tokens: &[Token],
    pos: &mut usize,
    in_group: bool,
) -> Result<Vec<Value>, ParseError> {
    let mut out = Vec::new();
    loop {
        match tokens.get(*pos) {
            None => {
                if in_group {
                    return Err(ParseError::UnterminatedGroup);
                }
                return Ok(out);
            }
            Some(Token::Close) => {
                if in_group {
                    *pos += 1;
                    return Ok(out);
                }
                return Err(ParseError::UnmatchedCloseParen);
            }
            Some(Token::Word(w)) if w == "Def" || w == "Let" => {
                read_binder(interp, tokens, pos, w.as_str(), &mut out)?;
            }
            Some(_) => {
                out.push(read_one(interp, tokens, pos)?);
            }
        }
    }
}

fn read_binder(
    interp: &mut Interpreter,
    tokens: &[Token],
    pos: &mut usize,
    keyword: &str,
    out: &mut Vec<Value>,
) -> Result<(), ParseError> {
    let binder_name: &'static str = if keyword == "Let" { "Let" } else { "Def" };
    *pos += 1;
    let name_text = match tokens.get(*pos) {
        Some(Token::Word(text)) => text.clone(),
        _ => return Err(ParseError::DanglingBinder(binder_name)),
    };
    *pos += 1;
    if tokens.get(*pos).is_none() {
        return Err(ParseError::DanglingBinder(binder_name));
    }
    let name_id = resolve_identifier_text(interp, &name_text, false);
    let name_value = interp.heap.alloc(Variant::Symbol(name_id));
    let value_form = read_one(interp, tokens, pos)?;
    let binder_id = resolve_identifier_text(interp, binder_name, true);
    let binder_value = interp.heap.alloc(Variant::Identifier(binder_id));
    out.push(name_value);
    out.push(value_form);
    out.push(binder_value);
    Ok(())
}

/// Reads one value-producing form: a parenthesized group, a string, a
/// symbol literal, or a single bare word.
fn read_one(interp: &mut Interpreter, tokens: &[Token], pos: &mut usize) -> Result<Value, ParseError> {
    match tokens.get(*pos) {
        None => Err(ParseError::UnterminatedGroup),
        Some(Token::Open) => {
            *pos += 1;
            let items = read_sequence(interp, tokens, pos, true)?;
            let body = list::from_iter(&mut interp.heap, items.into_iter());
            Ok(interp.heap.alloc(Variant::Block(body)))
        }
        Some(Token::Close) => Err(ParseError::UnmatchedCloseParen),
        Some(Token::Str(s)) => {
            let v = wisp_runtime::string::make_string(&mut interp.heap, s);
            *pos += 1;
            Ok(v)
        }
        Some(Token::Symbol(s)) => {
            let id = resolve_identifier_text(interp, s, false);
            *pos += 1;
            Ok(interp.heap.alloc(Variant::Symbol(id)))
        }
        Some(Token::Word(w)) => {
            let w = w.clone();
            *pos += 1;
            Ok(read_word(interp, &w))
        }
    }
}

fn read_word(interp: &mut Interpreter, w: &str) -> Value {
    if let Ok(n) = w.parse::<i64>() {
        return interp.heap.alloc(Variant::Integer(n));
    }
    if (w.contains('.') || w.contains('e') || w.contains('E')) && w.parse::<f64>().is_ok() {
        let f: f64 = w.parse().expect("checked above");
        return interp.heap.alloc(Variant::Float(f));
    }
    match w {
        "True" => return interp.heap.alloc(Variant::Bool(true)),
        "False" => return interp.heap.alloc(Variant::Bool(false)),
        _ => {}
    }
    let id = resolve_identifier_text(interp, w, true);
    interp.heap.alloc(Variant::Identifier(id))
}

/// Resolves bare text to an identifier: a builtin function slot first
/// (when `allow_builtin`, skipped for binder-introduced names, which
/// must never shadow as a call), then a packed identifier, then a
/// long one backed by a chunked string.
fn resolve_identifier_text(interp: &mut Interpreter, text: &str, allow_builtin: bool) -> Identifier {
    if allow_builtin {
        if let Some(slot) = interp.registry.function_slot(text) {
            return Identifier::Builtin(slot);
        }
    }
    if let Some(id) = Identifier::try_pack(text) {
        return id;
    }
    let head = wisp_runtime::string::make_string(&mut interp.heap, text);
    Identifier::Long(head.cell_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use wisp_core::Dispatch;

    fn program(src: &str) -> (Interpreter, Value) {
        let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
        let tokens = tokenize(src).unwrap();
        let program = read_program(&mut interp, &tokens).unwrap();
        (interp, program)
    }

    #[test]
    fn flat_program_has_one_item_per_word() {
        let (interp, program) = program("1 2 +");
        assert_eq!(list::to_vec(&interp.heap, program).len(), 3);
    }

    #[test]
    fn parenthesized_group_becomes_single_block() {
        let (interp, program) = program("(1 2 3)");
        let items = list::to_vec(&interp.heap, program);
        assert_eq!(items.len(), 1);
        assert_eq!(interp.heap.tag_of(items[0]), wisp_core::value::Tag::Block);
    }

    #[test]
    fn def_reorders_name_value_keyword() {
        let (interp, program) = program("Def X 5");
        let items = list::to_vec(&interp.heap, program);
        assert_eq!(items.len(), 3);
        assert_eq!(interp.heap.tag_of(items[0]), wisp_core::value::Tag::Symbol);
        assert_eq!(interp.heap.tag_of(items[1]), wisp_core::value::Tag::Integer);
        assert_eq!(interp.heap.tag_of(items[2]), wisp_core::value::Tag::Identifier);
    }

    #[test]
    fn unmatched_close_paren_is_an_error() {
        let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
        let tokens = tokenize("1 2)").unwrap();
        assert!(read_program(&mut interp, &tokens).is_err());
    }

    #[test]
    fn dangling_def_is_an_error() {
        let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
        let tokens = tokenize("Def X").unwrap();
        assert!(read_program(&mut interp, &tokens).is_err());
    }

    #[test]
    fn eof_mid_block_is_an_unterminated_group_error() {
        let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
        let tokens = tokenize("(1 2 3").unwrap();
        match read_program(&mut interp, &tokens) {
            Err(ParseError::UnterminatedGroup) => {}
            other => panic!("expected UnterminatedGroup, got {other:?}"),
        }
    }
}
