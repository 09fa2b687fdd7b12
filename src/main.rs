mod cli;
mod handlers;
mod printer;

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use pyrepl::{logging, Config, PythonRepl, ReplOptions};

use handlers::{default::DefaultHandler, repl::ReplHandler, Fencing};
use printer::TextPrinter;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let cfg = Config::load();
    logging::init_tracing(&cfg);

    let stdin_is_tty = io::stdin().is_terminal();
    if args.interactive && !stdin_is_tty {
        bail!("--interactive cannot be used with stdin input");
    }

    // Resolve the code unit: file, positional, then piped stdin.
    let code = if let Some(path) = &args.file {
        Some(fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?)
    } else if let Some(code) = args.code.clone() {
        Some(code)
    } else if !stdin_is_tty {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Some(buf)
    } else {
        None
    };

    let mut options = ReplOptions::from_config(&cfg);
    if let Some(program) = args.interpreter.as_deref() {
        options = options.interpreter(program);
    }
    if !args.define.is_empty() {
        options = options.locals(args.define.iter().cloned().collect());
    }

    let fencing = Fencing {
        enabled: !args.raw && cfg.get_bool("PYREPL_UNWRAP_MARKDOWN"),
        language: args.lang.clone().unwrap_or_else(|| cfg.language_tag()),
    };

    let mut repl = PythonRepl::with_options(options).context("starting python session")?;

    if let Some(code) = code.as_deref() {
        DefaultHandler::run(&mut repl, code, &fencing)?;
    }
    if args.show_locals {
        DefaultHandler::show_locals(&mut repl)?;
    }
    if args.interactive || code.is_none() {
        let printer = TextPrinter { color: cfg.get("PYREPL_PROMPT_COLOR") };
        ReplHandler::run(&mut repl, &fencing, &printer)?;
    }
    Ok(())
}
