//! The eight concrete end-to-end scenarios from the testable-properties
//! section: each parses a snippet of source and checks the resulting
//! work stack (or, for the parse-only scenarios, the parsed shape).

use wisp_core::{Dispatch, Variant, value::Tag};

fn run(src: &str) -> (wisp_runtime::Interpreter, Vec<wisp_core::Value>) {
    let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
    let program = wisp_parser::parse_program(&mut interp, src).expect("parse failed");
    interp.exec_inline(program);
    interp.run();
    let stack = interp.work_stack.clone();
    (interp, stack)
}

#[test]
fn scenario_1_arithmetic() {
    let (interp, stack) = run("1 2 +");
    assert_eq!(stack.len(), 1);
    match interp.heap.variant(stack[0]) {
        Variant::Integer(n) => assert_eq!(*n, 3),
        _ => panic!("expected integer"),
    }
}

#[test]
fn scenario_2_string_append() {
    let (interp, stack) = run("\"abc\" \"de\" Append");
    assert_eq!(stack.len(), 1);
    assert_eq!(wisp_runtime::string::to_string_lossy(&interp.heap, stack[0]), "abcde");
}

#[test]
fn scenario_3_boolean_logic() {
    let (interp, stack) = run("True False Or Not");
    assert_eq!(stack.len(), 1);
    match interp.heap.variant(stack[0]) {
        Variant::Bool(b) => assert!(!b),
        _ => panic!("expected bool"),
    }
}

#[test]
fn scenario_4_def_and_reference() {
    let (interp, stack) = run("Def X 5 X X *");
    assert_eq!(stack.len(), 1);
    match interp.heap.variant(stack[0]) {
        Variant::Integer(n) => assert_eq!(*n, 25),
        _ => panic!("expected integer"),
    }
}

#[test]
fn scenario_5_let_and_do() {
    let (interp, stack) = run("Let Y 10 (Y 1 +) Do");
    assert_eq!(stack.len(), 1);
    match interp.heap.variant(stack[0]) {
        Variant::Integer(n) => assert_eq!(*n, 11),
        _ => panic!("expected integer"),
    }
}

#[test]
fn scenario_6_stack_word_snapshots_in_reverse() {
    let (interp, stack) = run("1 2 3 Stack");
    assert_eq!(stack.len(), 4);
    let snapshot = wisp_core::list::to_vec(&interp.heap, stack[3]);
    let values: Vec<i64> = snapshot
        .iter()
        .map(|v| match interp.heap.variant(*v) {
            Variant::Integer(n) => *n,
            _ => panic!("expected integer"),
        })
        .collect();
    assert_eq!(values, vec![3, 2, 1]);
}

#[test]
fn scenario_7_parenthesized_group_is_a_block_that_runs_on_invoke() {
    let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
    let program = wisp_parser::parse_program(&mut interp, "(1 2 3)").unwrap();
    let items = wisp_core::list::to_vec(&interp.heap, program);
    assert_eq!(items.len(), 1);
    assert_eq!(interp.heap.tag_of(items[0]), Tag::Block);

    interp.invoke(items[0]);
    interp.run();
    let values: Vec<i64> = interp
        .work_stack
        .iter()
        .map(|v| match interp.heap.variant(*v) {
            Variant::Integer(n) => *n,
            _ => panic!("expected integer"),
        })
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn scenario_8_symbol_literal_shows_with_backslash() {
    let (interp, stack) = run("\\foo");
    assert_eq!(stack.len(), 1);
    assert_eq!(interp.heap.tag_of(stack[0]), Tag::Symbol);
    assert_eq!(wisp_runtime::dump::show(&interp.heap, stack[0]), "\\Foo");
}

/// `parse(show(v, readably=true))` reproduces `v` structurally, for a
/// representative value of each scalar/compound kind the invariant
/// names. Each source is parsed to a single top-level value, shown
/// readably, then reparsed — the second rendering must match the
/// first.
#[test]
fn readable_show_round_trips_through_parse() {
    for src in ["42", "\"hi there\"", "True", "\\bar", "(1 2)"] {
        let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
        let program = wisp_parser::parse_program(&mut interp, src).unwrap();
        let items = wisp_core::list::to_vec(&interp.heap, program);
        assert_eq!(items.len(), 1, "source {src:?} should parse to one value");
        let rendered = wisp_runtime::dump::show_readably(&interp.heap, items[0]);

        let mut interp2 = wisp_runtime::new_interpreter(Dispatch::Soft);
        let reparsed = wisp_parser::parse_program(&mut interp2, &rendered).unwrap();
        let reparsed_items = wisp_core::list::to_vec(&interp2.heap, reparsed);
        assert_eq!(reparsed_items.len(), 1);
        let rendered_again = wisp_runtime::dump::show_readably(&interp2.heap, reparsed_items[0]);

        assert_eq!(rendered, rendered_again, "round trip mismatch for {src:?}");
    }
}
