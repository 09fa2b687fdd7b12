//! Strips an enclosing markdown code fence from a code snippet.

/// Language tag recognized by [`unwrap`].
pub const DEFAULT_LANGUAGE: &str = "python";

/// Fence shapes, tried in [`Fence::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    /// `` `code` ``
    Inline,
    /// ```` ```code``` ````
    Block,
    /// ```` ```python\ncode\n``` ````
    Tagged,
}

impl Fence {
    pub const ORDER: [Fence; 3] = [Fence::Inline, Fence::Block, Fence::Tagged];

    /// Return the payload if this fence encloses the whole of `text`.
    pub fn strip<'a>(self, text: &'a str, language: &str) -> Option<&'a str> {
        match self {
            Fence::Inline => {
                if text.starts_with("``") {
                    return None;
                }
                text.strip_prefix('`')?.strip_suffix('`')
            }
            Fence::Block => {
                // A tagged fence is also a valid untagged one; leave it to Tagged.
                if Fence::Tagged.strip(text, language).is_some() {
                    return None;
                }
                text.strip_prefix("```")?.strip_suffix("```")
            }
            Fence::Tagged => text
                .strip_prefix("```")?
                .strip_prefix(language)?
                .strip_prefix('\n')?
                .strip_suffix("\n```"),
        }
    }
}

/// Remove an enclosing python fence, or return `text` unchanged.
pub fn unwrap(text: &str) -> &str {
    unwrap_with(text, DEFAULT_LANGUAGE)
}

/// Like [`unwrap`] with a custom language tag.
pub fn unwrap_with<'a>(text: &'a str, language: &str) -> &'a str {
    Fence::ORDER
        .iter()
        .find_map(|fence| fence.strip(text, language))
        .unwrap_or(text)
}
