//! Coal command-line interface.
//!
//! Usage:
//!   coal            # start the interactive REPL
//!   coal file.coal  # evaluate a source file

use std::{env, fs, process::ExitCode};

use coal::{
    banner, reserved_reply, ErrorKind, LineBuffer, ReplSession, StdPrint, RESERVED_WORDS,
};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context, Editor, Helper,
};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.get(1) {
        Some(path) => run_file(path),
        None => run_repl(),
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    match coal::run_source(&source, &mut StdPrint) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => exit_code_for(&err),
    }
}

/// Maps an error to the process exit code, printing the report for real
/// errors. `exit`/`quit:` pass their status through silently.
fn exit_code_for(err: &coal::CoalError) -> ExitCode {
    if err.kind() != ErrorKind::Exit {
        eprintln!("{err}");
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let status = (err.exit_status() & 0xff) as u8;
    ExitCode::from(status)
}

/// Keyword completion over the reserved word set.
struct CoalHelper;

impl Helper for CoalHelper {}

impl Completer for CoalHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + 1);
        let prefix = &before[start..];
        let candidates = RESERVED_WORDS
            .iter()
            .filter(|keyword| keyword.starts_with(prefix))
            .map(|keyword| Pair {
                display: (*keyword).to_owned(),
                replacement: (*keyword).to_owned(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CoalHelper {
    type Hint = String;
}

impl Highlighter for CoalHelper {}

impl Validator for CoalHelper {}

fn run_repl() -> ExitCode {
    let mut editor: Editor<CoalHelper, DefaultHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    editor.set_helper(Some(CoalHelper));

    println!("{}", banner());

    let mut session = ReplSession::new();
    let mut buffer = LineBuffer::default();

    loop {
        let line = if buffer.is_empty() {
            editor.readline(">>> ")
        } else {
            let indent = " ".repeat(buffer.indent());
            editor.readline_with_initial("... ", (&indent, ""))
        };
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("KeyboardInterrupt");
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        let _ = editor.add_history_entry(line.as_str());

        if buffer.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(reply) = reserved_reply(trimmed) {
                println!("{reply}");
                continue;
            }
        }

        if let Some(source) = buffer.push_line(&line) {
            if let Err(err) = session.execute(&source, &mut StdPrint) {
                return exit_code_for(&err);
            }
        }
    }
}
