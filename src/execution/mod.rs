//! Execution engine: a persistent python session whose `run` always
//! answers with a string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{self, Config};
use crate::error::{ReplError, Result};
use crate::process::{python::start_python, ProcessHandle};

pub mod python;

use python::{execute_ndjson, Request, Response, Scope, BOOTSTRAP};

/// A namespace entry read back from the interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Binding {
    /// The value survived a JSON round trip.
    Json(Value),
    /// `repr()` of a value JSON cannot hold (functions, modules, objects).
    Repr(String),
}

impl Binding {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Binding::Json(v) => Some(v),
            Binding::Repr(_) => None,
        }
    }

    /// Flatten into a plain JSON value; reprs become strings.
    pub fn to_json(&self) -> Value {
        match self {
            Binding::Json(v) => v.clone(),
            Binding::Repr(r) => Value::String(r.clone()),
        }
    }
}

impl PartialEq<Value> for Binding {
    fn eq(&self, other: &Value) -> bool {
        self.as_json() == Some(other)
    }
}

/// Outcome of one submission before it is flattened for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExecutionResult {
    Output(String),
    Fault(String),
}

impl ExecutionResult {
    fn is_fault(&self) -> bool {
        matches!(self, ExecutionResult::Fault(_))
    }

    fn into_text(self) -> String {
        match self {
            ExecutionResult::Output(s) | ExecutionResult::Fault(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub interpreter: String,
    pub globals: Option<Map<String, Value>>,
    pub locals: Option<Map<String, Value>>,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            interpreter: config::default_interpreter().to_string(),
            globals: None,
            locals: None,
        }
    }
}

impl ReplOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let interpreter = cfg
            .get("PYREPL_INTERPRETER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| config::default_interpreter().to_string());
        Self { interpreter, ..Self::default() }
    }

    pub fn interpreter(mut self, program: impl Into<String>) -> Self {
        self.interpreter = program.into();
        self
    }

    pub fn globals(mut self, globals: Map<String, Value>) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn locals(mut self, locals: Map<String, Value>) -> Self {
        self.locals = Some(locals);
        self
    }
}

/// A python session. Bindings made by one `run` are visible to the next.
///
/// With no locals supplied the globals mapping doubles as the locals, so
/// every top-level assignment shows up in both. Success and failure are
/// both reported by `run` as plain text and are only told apart by content.
pub struct PythonRepl {
    options: ReplOptions,
    process: Option<ProcessHandle>,
}

impl PythonRepl {
    pub fn new() -> Result<Self> {
        Self::with_options(ReplOptions::default())
    }

    pub fn with_options(options: ReplOptions) -> Result<Self> {
        let process = spawn(&options)?;
        Ok(Self { options, process: Some(process) })
    }

    /// Execute `code` and return what it printed, or the description of
    /// the error it raised. Never fails.
    pub fn run(&mut self, code: &str) -> String {
        let result = self
            .execute(code)
            .unwrap_or_else(|e| ExecutionResult::Fault(e.to_string()));
        let fault = result.is_fault();
        let text = result.into_text();
        tracing::debug!(fault, bytes = text.len(), "run finished");
        text
    }

    pub fn locals(&mut self) -> Result<BTreeMap<String, Binding>> {
        self.namespace(Scope::Locals)
    }

    pub fn globals(&mut self) -> Result<BTreeMap<String, Binding>> {
        self.namespace(Scope::Globals)
    }

    /// Look up a single local binding.
    pub fn local(&mut self, name: &str) -> Result<Option<Binding>> {
        Ok(self.locals()?.remove(name))
    }

    /// Throw the session away and start over from the construction options.
    pub fn restart(&mut self) -> Result<()> {
        self.process = None;
        self.process = Some(spawn(&self.options)?);
        tracing::info!(interpreter = %self.options.interpreter, "python session restarted");
        Ok(())
    }

    pub fn is_alive(&mut self) -> bool {
        self.process.as_mut().is_some_and(ProcessHandle::is_alive)
    }

    pub fn options(&self) -> &ReplOptions {
        &self.options
    }

    fn execute(&mut self, code: &str) -> Result<ExecutionResult> {
        match self.request(&Request::Run { code })? {
            Response::Ok { output } => Ok(ExecutionResult::Output(output)),
            Response::Fault { error } => Ok(ExecutionResult::Fault(error)),
            other => Err(ReplError::Protocol(other.describe())),
        }
    }

    fn namespace(&mut self, scope: Scope) -> Result<BTreeMap<String, Binding>> {
        match self.request(&Request::Namespace { scope })? {
            Response::Namespace { bindings } => Ok(bindings),
            other => Err(ReplError::Protocol(other.describe())),
        }
    }

    fn request(&mut self, request: &Request<'_>) -> Result<Response> {
        let handle = self.process.as_mut().ok_or(ReplError::NotRunning)?;
        match execute_ndjson(handle, request) {
            Ok(response) => Ok(response),
            Err(e) if e.is_transport() => {
                tracing::warn!(error = %e, "python interpreter lost");
                self.process = None;
                Err(e)
            }
            Err(e) => {
                // One whole reply line was consumed, so the session stays usable.
                tracing::warn!(error = %e, "unreadable interpreter reply");
                Err(e)
            }
        }
    }
}

fn spawn(options: &ReplOptions) -> Result<ProcessHandle> {
    let mut handle = start_python(&options.interpreter, BOOTSTRAP)?;
    let init = Request::Init {
        globals: options.globals.as_ref(),
        locals: options.locals.as_ref(),
    };
    match execute_ndjson(&mut handle, &init)? {
        Response::Ready => Ok(handle),
        other => Err(ReplError::Protocol(other.describe())),
    }
}
