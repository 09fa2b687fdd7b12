//! Line-based interactive session.

use std::io::{self, BufRead};

use anyhow::Result;
use is_terminal::IsTerminal;
use pyrepl::PythonRepl;

use super::{default::DefaultHandler, Fencing};
use crate::printer::{print_output, TextPrinter};

const PROMPT: &str = ">>> ";
const CONTINUATION: &str = "... ";

/// Collects input lines into complete submissions. A line ending in `:`
/// or `\` opens a block that a blank line closes.
#[derive(Debug, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push(&mut self, line: &str) -> Option<String> {
        if self.lines.is_empty() {
            if line.trim().is_empty() {
                return None;
            }
            if opens_block(line) {
                self.lines.push(line.to_string());
                return None;
            }
            return Some(line.to_string());
        }
        if line.trim().is_empty() {
            return self.take();
        }
        self.lines.push(line.to_string());
        None
    }

    /// Drain whatever is buffered, e.g. at EOF.
    pub fn take(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let code = self.lines.join("\n");
        self.lines.clear();
        Some(code)
    }
}

fn opens_block(line: &str) -> bool {
    let line = line.trim_end();
    line.ends_with(':') || line.ends_with('\\')
}

enum Command {
    Locals,
    Restart,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        ":locals" => Some(Command::Locals),
        ":restart" => Some(Command::Restart),
        ":quit" | ":exit" => Some(Command::Quit),
        _ => None,
    }
}

pub struct ReplHandler;

impl ReplHandler {
    pub fn run(repl: &mut PythonRepl, fencing: &Fencing, printer: &TextPrinter) -> Result<()> {
        if !io::stdin().is_terminal() {
            anyhow::bail!("interactive mode requires a terminal on stdin");
        }
        printer.print(&format!(
            "python session via {} (:locals, :restart, :quit)",
            repl.options().interpreter
        ));

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut buffer = LineBuffer::default();
        let mut line = String::new();
        loop {
            printer.prompt(if buffer.is_empty() { PROMPT } else { CONTINUATION })?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                if let Some(code) = buffer.take() {
                    print_output(&repl.run(fencing.apply(&code)))?;
                }
                println!();
                return Ok(());
            }
            let line = line.trim_end_matches(['\n', '\r']);

            if buffer.is_empty() {
                match parse_command(line) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Locals) => {
                        if let Err(e) = DefaultHandler::show_locals(repl) {
                            printer.print(&e.to_string());
                        }
                        continue;
                    }
                    Some(Command::Restart) => {
                        match repl.restart() {
                            Ok(()) => printer.print("session restarted"),
                            Err(e) => printer.print(&e.to_string()),
                        }
                        continue;
                    }
                    None => {}
                }
            }

            if let Some(code) = buffer.push(line) {
                print_output(&repl.run(fencing.apply(&code)))?;
            }
        }
    }
}
