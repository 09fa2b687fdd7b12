//! Line-delimited JSON protocol spoken with the python driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Binding;
use crate::error::Result;
use crate::process::ProcessHandle;

/// Driver run by the interpreter child. Keeps the session namespaces and
/// answers one response line per request line on a private copy of the
/// original stdin/stdout; fd 1 is pointed at stderr and fd 0 at the null
/// device so user code cannot interfere with the channel.
pub(crate) const BOOTSTRAP: &str = r#"
import contextlib
import io
import json
import math
import os
import sys

_MAX_DEPTH = 100
_INT_MIN = -(2 ** 63)
_INT_MAX = 2 ** 64 - 1


def _channel():
    sys.stdout.flush()
    out = os.fdopen(os.dup(1), "w", encoding="utf-8", newline="\n")
    inp = os.fdopen(os.dup(0), "r", encoding="utf-8", newline="\n")
    os.dup2(2, 1)
    null = os.open(os.devnull, os.O_RDONLY)
    os.dup2(null, 0)
    os.close(null)
    return inp, out


def _clean(text):
    return text.encode("utf-8", "replace").decode("utf-8")


def _text_ok(text):
    try:
        text.encode("utf-8")
    except UnicodeEncodeError:
        return False
    return True


def _portable(value, depth=0):
    # Exactly representable on the reading side: i64/u64 ints, finite
    # floats, well-formed text, bounded nesting.
    if depth > _MAX_DEPTH:
        return False
    if value is None or isinstance(value, bool):
        return True
    if isinstance(value, int):
        return _INT_MIN <= value <= _INT_MAX
    if isinstance(value, float):
        return math.isfinite(value)
    if isinstance(value, str):
        return _text_ok(value)
    if isinstance(value, (list, tuple)):
        return all(_portable(item, depth + 1) for item in value)
    if isinstance(value, dict):
        return all(
            isinstance(key, str) and _text_ok(key) and _portable(item, depth + 1)
            for key, item in value.items()
        )
    return False


def _encode(value):
    try:
        if _portable(value):
            return {"kind": "json", "value": value}
    except Exception:
        pass
    try:
        text = repr(value)
    except Exception:
        text = object.__repr__(value)
    return {"kind": "repr", "value": _clean(text)}


def _dump(namespace):
    return {
        _clean(str(name)): _encode(value)
        for name, value in list(namespace.items())
        if name != "__builtins__"
    }


def _run(code, scope):
    buffer = io.StringIO()
    try:
        with contextlib.redirect_stdout(buffer):
            exec(code, scope["globals"], scope["locals"])
    except BaseException as exc:
        return {"status": "fault", "error": _clean(str(exc))}
    return {"status": "ok", "output": _clean(buffer.getvalue())}


def _handle(request, scope):
    op = request["op"]
    if op == "init":
        seeded_globals = request.get("globals")
        seeded_locals = request.get("locals")
        scope["globals"] = dict(seeded_globals) if seeded_globals is not None else {}
        scope["locals"] = dict(seeded_locals) if seeded_locals is not None else scope["globals"]
        return {"status": "ready"}
    if op == "run":
        return _run(request["code"], scope)
    if op == "namespace":
        return {"status": "namespace", "bindings": _dump(scope[request["scope"]])}
    return {"status": "error", "message": "unknown op: %s" % op}


def _serve():
    inp, out = _channel()
    namespace = {}
    scope = {"globals": namespace, "locals": namespace}
    for line in inp:
        try:
            response = _handle(json.loads(line), scope)
            payload = json.dumps(response)
        except Exception as exc:
            payload = json.dumps({"status": "error", "message": _clean(repr(exc))})
        out.write(payload + "\n")
        out.flush()


_serve()
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Globals,
    Locals,
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Request<'a> {
    Init {
        globals: Option<&'a Map<String, Value>>,
        locals: Option<&'a Map<String, Value>>,
    },
    Run {
        code: &'a str,
    },
    Namespace {
        scope: Scope,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum Response {
    Ready,
    Ok { output: String },
    Fault { error: String },
    Namespace { bindings: BTreeMap<String, Binding> },
    Error { message: String },
}

impl Response {
    pub(crate) fn describe(&self) -> String {
        match self {
            Response::Ready => "ready".into(),
            Response::Ok { .. } => "ok".into(),
            Response::Fault { error } => format!("fault: {}", error),
            Response::Namespace { bindings } => format!("namespace ({} bindings)", bindings.len()),
            Response::Error { message } => format!("error: {}", message),
        }
    }
}

/// Send one request and wait for its response line.
pub(crate) fn execute_ndjson(handle: &mut ProcessHandle, request: &Request<'_>) -> Result<Response> {
    let line = serde_json::to_string(request)?;
    handle.send_line(&line)?;
    let reply = handle.read_line()?;
    Ok(serde_json::from_str(&reply)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let run = serde_json::to_value(Request::Run { code: "x = 1\nprint(x)" }).unwrap();
        assert_eq!(run, json!({"op": "run", "code": "x = 1\nprint(x)"}));

        let mut seed = Map::new();
        seed.insert("foo".into(), json!(4));
        let init = serde_json::to_value(Request::Init { globals: None, locals: Some(&seed) }).unwrap();
        assert_eq!(init, json!({"op": "init", "globals": null, "locals": {"foo": 4}}));

        let ns = serde_json::to_value(Request::Namespace { scope: Scope::Locals }).unwrap();
        assert_eq!(ns, json!({"op": "namespace", "scope": "locals"}));
    }

    #[test]
    fn test_request_line_has_no_raw_newline() {
        let line = serde_json::to_string(&Request::Run { code: "def f():\n    return 1\n" }).unwrap();
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_response_decoding() {
        let r: Response = serde_json::from_str(r#"{"status": "ready"}"#).unwrap();
        assert!(matches!(r, Response::Ready));

        let r: Response = serde_json::from_str(r#"{"status": "ok", "output": "2\n"}"#).unwrap();
        assert!(matches!(r, Response::Ok { ref output } if output == "2\n"));

        let r: Response =
            serde_json::from_str(r#"{"status": "fault", "error": "name 'foo' is not defined"}"#).unwrap();
        assert!(matches!(r, Response::Fault { ref error } if error == "name 'foo' is not defined"));

        let r: Response = serde_json::from_str(
            r#"{"status": "namespace", "bindings": {
                "a": {"kind": "json", "value": [1, "x"]},
                "add": {"kind": "repr", "value": "<function add at 0x1>"}
            }}"#,
        )
        .unwrap();
        let Response::Namespace { bindings } = r else { panic!("expected namespace") };
        assert_eq!(bindings["a"], Binding::Json(json!([1, "x"])));
        assert_eq!(bindings["add"], Binding::Repr("<function add at 0x1>".into()));
    }
}
