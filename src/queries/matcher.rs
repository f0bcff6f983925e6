//! Text Matching - Normalize and compare text against a matcher.
//!
//! A [`TextMatch`] is either a string compared under [`MatchFlags`] or a
//! predicate over the normalized text and the candidate node.

use std::fmt;
use std::rc::Rc;

use crate::dom::Node;
use crate::types::MatchFlags;

/// Predicate matcher: receives the normalized text and the candidate node.
pub type MatchFn = Rc<dyn Fn(&str, &Node) -> bool>;

/// What a query looks for.
#[derive(Clone)]
pub enum TextMatch {
    Str(String, MatchFlags),
    Func(MatchFn),
}

impl TextMatch {
    /// Exact, whitespace-normalized match (the default for `&str`).
    pub fn exact(text: impl Into<String>) -> Self {
        TextMatch::Str(text.into(), MatchFlags::default())
    }

    /// Case-insensitive substring match.
    pub fn loose(text: impl Into<String>) -> Self {
        TextMatch::Str(text.into(), MatchFlags::loose())
    }

    pub fn predicate(f: impl Fn(&str, &Node) -> bool + 'static) -> Self {
        TextMatch::Func(Rc::new(f))
    }

    /// Replace the flags of a string matcher. Predicates are unaffected.
    pub fn with_flags(self, flags: MatchFlags) -> Self {
        match self {
            TextMatch::Str(text, _) => TextMatch::Str(text, flags),
            func => func,
        }
    }

    pub fn flags(&self) -> MatchFlags {
        match self {
            TextMatch::Str(_, flags) => *flags,
            TextMatch::Func(_) => MatchFlags::default(),
        }
    }

    /// Test raw `text` belonging to `node`.
    pub fn matches(&self, text: &str, node: &Node) -> bool {
        let normalized = normalize(text, self.flags());
        match self {
            TextMatch::Str(expected, flags) if flags.contains(MatchFlags::EXACT) => {
                normalized == *expected
            }
            TextMatch::Str(expected, _) => {
                normalized.to_lowercase().contains(&expected.to_lowercase())
            }
            TextMatch::Func(f) => f(&normalized, node),
        }
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TextMatch::Str(text, _) => format!("{text:?}"),
            TextMatch::Func(_) => "<predicate>".to_string(),
        }
    }
}

impl fmt::Debug for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Str(text, flags) => f.debug_tuple("Str").field(text).field(flags).finish(),
            TextMatch::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        TextMatch::exact(text)
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        TextMatch::exact(text)
    }
}

impl From<&String> for TextMatch {
    fn from(text: &String) -> Self {
        TextMatch::exact(text.as_str())
    }
}

/// Apply the normalization part of `flags` to `text`.
pub fn normalize(text: &str, flags: MatchFlags) -> String {
    let text = if flags.contains(MatchFlags::TRIM) { text.trim() } else { text };
    if flags.contains(MatchFlags::COLLAPSE_WHITESPACE) {
        let mut out = String::with_capacity(text.len());
        let mut in_space = false;
        for c in text.chars() {
            if c.is_whitespace() {
                if !in_space {
                    out.push(' ');
                }
                in_space = true;
            } else {
                out.push(c);
                in_space = false;
            }
        }
        out
    } else {
        text.to_string()
    }
}
