//! wisp — command-line driver for the Wisp interpreter.
//!
//! Usage:
//!   wisp                  # interactive REPL
//!   wisp <file>           # interpret a file
//!   wisp -c "<source>"    # interpret inline source
//!   wisp --help           # usage; exits non-zero on bad invocation

use std::path::{Path, PathBuf};

use clap::Parser as ClapParser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use wisp_core::{Dispatch, Value};
use wisp_runtime::{Interpreter, Status, dump};

#[derive(ClapParser)]
#[command(name = "wisp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concatenative, stack-oriented scripting engine", long_about = None)]
struct Args {
    /// Source file to interpret; omit for an interactive REPL
    file: Option<PathBuf>,

    /// Interpret SOURCE directly instead of reading a file
    #[arg(short = 'c', long = "command", value_name = "SOURCE")]
    command: Option<String>,
}

fn main() {
    tracing_subscriber::fmt::init();

    let argv: Vec<String> = std::env::args().collect();
    let args = Args::parse();

    let exit_code = match (&args.command, &args.file) {
        (Some(source), _) => run_source(source, &argv),
        (None, Some(path)) => run_file(path, &argv),
        (None, None) => run_repl(&argv),
    };
    std::process::exit(exit_code);
}

/// Binds `Parameters` in the root scope to the full original argv, per
/// the external-interfaces section of the spec.
fn bind_parameters(interp: &mut Interpreter, argv: &[String]) {
    let items: Vec<Value> =
        argv.iter().map(|s| wisp_runtime::string::make_string(&mut interp.heap, s)).collect();
    let list = wisp_core::list::from_iter(&mut interp.heap, items.into_iter());
    let id = wisp_core::Identifier::try_pack("Parameters").expect("fits packed alphabet");
    interp.env.define(id, list);
}

/// The boot-time prelude, embedded at compile time the way the
/// teacher's `stdlib_embed` module embeds its own `.seq` sources —
/// self-contained, no runtime filesystem dependency.
const PRELUDE: &str = include_str!("../prelude/prelude.wisp");

/// Loads the prelude into a fresh interpreter. A prelude parse/exec
/// failure is a host-level bug, not a script error, so it panics
/// rather than reporting through the in-language error path.
fn load_prelude(interp: &mut Interpreter) {
    let program = wisp_parser::parse_program(interp, PRELUDE).expect("prelude failed to parse");
    interp.exec_inline(program);
    if interp.run() == Status::Error {
        panic!("prelude raised an error during boot");
    }
}

fn new_interpreter(argv: &[String]) -> Interpreter {
    let mut interp = wisp_runtime::new_interpreter(Dispatch::Soft);
    bind_parameters(&mut interp, argv);
    load_prelude(&mut interp);
    interp
}

/// Runs `source` to completion and reports a trailing `Error` status
/// the way the outer driver is specified to: pop the diagnostic (if
/// any was left on the stack), render it with `%#O`, and print
/// `ERROR: …`. Returns whether the run ended in error.
fn run_and_report(interp: &mut Interpreter, source: &str) -> bool {
    let program = match wisp_parser::parse_program(interp, source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return true;
        }
    };
    interp.exec_inline(program);
    match interp.run() {
        Status::Error => {
            let diagnostic = interp.pop();
            match diagnostic {
                Some(v) => eprintln!("ERROR: {}", dump::format(&interp.heap, "%#O", &[v])),
                None => eprintln!("ERROR: (no diagnostic)"),
            }
            true
        }
        _ => false,
    }
}

fn run_source(source: &str, argv: &[String]) -> i32 {
    let mut interp = new_interpreter(argv);
    if run_and_report(&mut interp, source) { 1 } else { 0 }
}

fn run_file(path: &Path, argv: &[String]) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: could not read {}: {e}", path.display());
            return 1;
        }
    };
    run_source(&source, argv)
}

fn history_file_path() -> Option<PathBuf> {
    home::home_dir().map(|d| d.join(".local/share/wisp_history"))
}

fn run_repl(argv: &[String]) -> i32 {
    let mut interp = new_interpreter(argv);
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("ERROR: could not start line editor: {e}");
            return 1;
        }
    };
    let history_path = history_file_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("wisp> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                run_and_report(&mut interp, &line);
                for v in interp.work_stack.clone() {
                    println!("{}", dump::show(&interp.heap, v));
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("ERROR: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }
    0
}
