use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use serde_json::Value;

#[derive(Parser, Debug, Clone)]
#[command(name = "pyrepl", about = "Run python snippets and capture what they print", version)]
#[command(group(ArgGroup::new("source").args(["code", "file"]).multiple(false)))]
pub struct Cli {
    /// Python code to run. Read from stdin when piped and omitted.
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Run the contents of a file.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Do not strip an enclosing markdown code fence before running.
    #[arg(long)]
    pub raw: bool,

    /// Language tag accepted for ```<lang> fences.
    #[arg(long)]
    pub lang: Option<String>,

    /// Python interpreter program (overrides PYREPL_INTERPRETER).
    #[arg(long)]
    pub interpreter: Option<String>,

    /// Seed a local binding, e.g. --define foo=4 or --define 'names=["a","b"]'.
    /// Values that are not valid JSON are bound as strings.
    #[arg(short = 'D', long = "define", value_name = "NAME=JSON", value_parser = parse_define, action = clap::ArgAction::Append)]
    pub define: Vec<(String, Value)>,

    /// Print the local namespace as JSON after running.
    #[arg(long = "show-locals")]
    pub show_locals: bool,

    /// Start an interactive session (after running CODE, if given).
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

fn parse_define(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    let is_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && name.chars().all(|c| c == '_' || c.is_alphanumeric());
    if !is_identifier {
        return Err(format!("'{}' is not a valid python identifier", name));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_define_json_and_fallback() {
        assert_eq!(parse_define("foo=4").unwrap(), ("foo".into(), json!(4)));
        assert_eq!(parse_define("xs=[1, 2]").unwrap(), ("xs".into(), json!([1, 2])));
        assert_eq!(parse_define("s=hello world").unwrap(), ("s".into(), json!("hello world")));
        assert_eq!(parse_define("eq=a=b").unwrap(), ("eq".into(), json!("a=b")));
    }

    #[test]
    fn test_parse_define_rejects_bad_names() {
        assert!(parse_define("novalue").is_err());
        assert!(parse_define("1x=2").is_err());
        assert!(parse_define("a-b=2").is_err());
        assert!(parse_define("=2").is_err());
    }

    #[test]
    fn test_code_and_file_are_exclusive() {
        assert!(Cli::try_parse_from(["pyrepl", "print(1)", "--file", "x.py"]).is_err());
        let cli = Cli::try_parse_from(["pyrepl", "-D", "foo=4", "-D", "bar=true", "print(foo)"]).unwrap();
        assert_eq!(cli.code.as_deref(), Some("print(foo)"));
        assert_eq!(cli.define.len(), 2);
        assert_eq!(cli.define[1], ("bar".into(), json!(true)));
    }
}
