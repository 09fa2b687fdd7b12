//! CLI handlers: one-shot execution and the interactive session.

use pyrepl::markdown;

pub mod default;
pub mod repl;

/// Fence stripping applied to every submission before it runs.
#[derive(Debug, Clone)]
pub struct Fencing {
    pub enabled: bool,
    pub language: String,
}

impl Fencing {
    pub fn apply<'a>(&self, code: &'a str) -> &'a str {
        if self.enabled {
            markdown::unwrap_with(code, &self.language)
        } else {
            code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fencing_can_be_disabled() {
        let on = Fencing { enabled: true, language: "python".into() };
        let off = Fencing { enabled: false, ..on.clone() };
        assert_eq!(on.apply("```python\nprint(1)\n```"), "print(1)");
        assert_eq!(off.apply("`print(1)`"), "`print(1)`");
    }
}
