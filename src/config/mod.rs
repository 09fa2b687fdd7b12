use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::markdown::DEFAULT_LANGUAGE;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    pub fn load_from(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let mut map = default_map();

        // Read .pyreplrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                parse_rc(BufReader::new(file), &mut map);
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn language_tag(&self) -> String {
        self.get("PYREPL_LANGUAGE_TAG")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}

pub fn default_interpreter() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

fn parse_rc(reader: impl BufRead, map: &mut HashMap<String, String>) {
    for line in reader.lines().map_while(Result::ok) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "PYREPL_INTERPRETER",
        "PYREPL_LANGUAGE_TAG",
        "PYREPL_UNWRAP_MARKDOWN",
        "PYREPL_LOG_LEVEL",
        "PYREPL_LOG_JSON",
        "PYREPL_PROMPT_COLOR",
    ];

    KEYS.contains(&k) || k.starts_with("PYREPL_")
}

fn default_config_path() -> PathBuf {
    config_dir().join(".pyreplrc")
}

fn config_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| Path::new("~/.config").to_path_buf());
    base.join("pyrepl")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("PYREPL_INTERPRETER".into(), default_interpreter().into());
    m.insert("PYREPL_LANGUAGE_TAG".into(), DEFAULT_LANGUAGE.into());
    m.insert("PYREPL_LOG_LEVEL".into(), "warn".into());
    m.insert("PYREPL_PROMPT_COLOR".into(), "green".into());

    // Bools as strings
    m.insert("PYREPL_UNWRAP_MARKDOWN".into(), "true".into());
    m.insert("PYREPL_LOG_JSON".into(), "false".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_rc_file() {
        let cfg = Config::load_from("/nonexistent/pyrepl/.pyreplrc");
        assert!(cfg.inner.contains_key("PYREPL_INTERPRETER"));
        assert_eq!(cfg.inner.get("PYREPL_UNWRAP_MARKDOWN").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_rc_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "PYREPL_TEST_ONLY_KEY = some value ").unwrap();
        writeln!(file, "PYREPL_TEST_ONLY_FLAG=TRUE").unwrap();
        writeln!(file, "not a pair").unwrap();

        let cfg = Config::load_from(file.path());
        assert_eq!(cfg.get("PYREPL_TEST_ONLY_KEY").as_deref(), Some("some value"));
        assert!(cfg.get_bool("PYREPL_TEST_ONLY_FLAG"));
        assert!(!cfg.get_bool("PYREPL_TEST_ONLY_MISSING"));
        assert!(!cfg.inner.contains_key("not a pair"));
    }

    #[test]
    fn test_parse_rc_keeps_equals_in_value() {
        let mut map = HashMap::new();
        parse_rc("PYREPL_TEST_ONLY_ARGS=a=b\n".as_bytes(), &mut map);
        assert_eq!(map.get("PYREPL_TEST_ONLY_ARGS").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_config_key_filter() {
        assert!(is_config_key("PYREPL_INTERPRETER"));
        assert!(is_config_key("PYREPL_FUTURE_OPTION"));
        assert!(!is_config_key("PATH"));
    }
}
