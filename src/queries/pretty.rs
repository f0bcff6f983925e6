//! Pretty DOM - Readable, indented serialization for debug output.
//!
//! Each element opens on its own line, attributes are sorted and printed one
//! per line, empty elements self-close, and whitespace-only text is dropped:
//!
//! ```text
//! <div
//!   data-testid="wrapper"
//! >
//!   <div
//!     data-testid="inner"
//!   />
//! </div>
//! ```

use std::io::{self, Write};

use crossterm::style::{style, Stylize};

use crate::dom::Node;
use crate::types::NodeType;
use super::config::get_config;

/// Options for [`pretty_dom_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Output longer than this is cut off and suffixed with `...`.
    pub max_length: usize,
    /// Colorize with ANSI escapes.
    pub highlight: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        let config = get_config();
        Self {
            max_length: config.debug_print_limit,
            highlight: config.highlight,
        }
    }
}

/// Pretty-print `node` using the configured limit and highlighting.
pub fn pretty_dom(node: &Node, max_length: Option<usize>) -> String {
    let mut options = PrettyOptions::default();
    if let Some(max_length) = max_length {
        options.max_length = max_length;
    }
    pretty_dom_with(node, options)
}

pub fn pretty_dom_with(node: &Node, options: PrettyOptions) -> String {
    let mut out = String::new();
    print_node(node, 0, options.highlight, &mut out);

    if out.chars().count() > options.max_length {
        let mut truncated: String = out.chars().take(options.max_length).collect();
        truncated.push_str("...");
        truncated
    } else {
        out
    }
}

/// Write the pretty-printed `node` and a newline to `out`.
pub fn write_dom<W: Write>(out: &mut W, node: &Node, max_length: Option<usize>) -> io::Result<()> {
    writeln!(out, "{}", pretty_dom(node, max_length))
}

/// Print the pretty-printed `node` to stdout.
pub fn log_dom(node: &Node, max_length: Option<usize>) {
    println!("{}", pretty_dom(node, max_length));
}

// =============================================================================
// Printer
// =============================================================================

/// Children worth printing: everything but whitespace-only text.
fn visible_children(node: &Node) -> Vec<Node> {
    let children = match node.template_content() {
        Some(content) => content.child_nodes(),
        None => node.child_nodes(),
    };
    children
        .into_iter()
        .filter(|child| match child.data() {
            Some(text) => !text.trim().is_empty(),
            None => true,
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn paint_tag(text: &str, highlight: bool) -> String {
    if highlight { style(text).cyan().to_string() } else { text.to_string() }
}

fn paint_prop(text: &str, highlight: bool) -> String {
    if highlight { style(text).yellow().to_string() } else { text.to_string() }
}

fn paint_value(text: &str, highlight: bool) -> String {
    if highlight { style(text).green().to_string() } else { text.to_string() }
}

fn print_node(node: &Node, depth: usize, highlight: bool, out: &mut String) {
    let pad = "  ".repeat(depth);
    match node.node_type() {
        NodeType::Text => {
            out.push_str(&pad);
            out.push_str(&escape(&node.data().unwrap_or_default()));
        }
        NodeType::Document => {
            let children = visible_children(node);
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                print_node(child, depth, highlight, out);
            }
        }
        NodeType::Fragment => print_element("DocumentFragment", &[], node, depth, highlight, out),
        NodeType::Element => {
            let mut attrs = node.attributes();
            attrs.sort_by(|a, b| a.0.cmp(&b.0));
            let tag = node.tag_name().unwrap_or_default().to_string();
            print_element(&tag, &attrs, node, depth, highlight, out);
        }
    }
}

fn print_element(
    tag: &str,
    attrs: &[(String, String)],
    node: &Node,
    depth: usize,
    highlight: bool,
    out: &mut String,
) {
    let pad = "  ".repeat(depth);
    let children = visible_children(node);

    out.push_str(&pad);
    out.push_str(&paint_tag(&format!("<{tag}"), highlight));

    for (name, value) in attrs {
        out.push('\n');
        out.push_str(&pad);
        out.push_str("  ");
        out.push_str(&paint_prop(name, highlight));
        out.push('=');
        out.push_str(&paint_value(&format!("\"{}\"", escape(value)), highlight));
    }
    if !attrs.is_empty() {
        out.push('\n');
        out.push_str(&pad);
    }

    if children.is_empty() {
        if attrs.is_empty() {
            out.push(' ');
        }
        out.push_str(&paint_tag("/>", highlight));
        return;
    }

    out.push_str(&paint_tag(">", highlight));
    for child in &children {
        out.push('\n');
        print_node(child, depth + 1, highlight, out);
    }
    out.push('\n');
    out.push_str(&pad);
    out.push_str(&paint_tag(&format!("</{tag}>"), highlight));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::markup::parse_fragment;

    fn plain(max_length: usize) -> PrettyOptions {
        PrettyOptions {
            max_length,
            highlight: false,
        }
    }

    fn element(html: &str) -> Node {
        parse_fragment(html).unwrap().first_child().unwrap()
    }

    #[test]
    fn test_nested_with_attributes() {
        let node = element(r#"<div data-testid="wrapper"><div data-testid="inner"></div></div>"#);
        let expected = "<div\n  data-testid=\"wrapper\"\n>\n  <div\n    data-testid=\"inner\"\n  />\n</div>";
        assert_eq!(pretty_dom_with(&node, plain(7000)), expected);
    }

    #[test]
    fn test_text_and_sorted_attributes() {
        let node = element("<p title=\"t\" class=\"c\">\n  Hello <b>you</b>  \n</p>");
        let expected = "<p\n  class=\"c\"\n  title=\"t\"\n>\n  \n  Hello \n  <b>\n    you\n  </b>\n</p>";
        assert_eq!(pretty_dom_with(&node, plain(7000)), expected);
    }

    #[test]
    fn test_empty_element_self_closes() {
        assert_eq!(pretty_dom_with(&element("<span></span>"), plain(7000)), "<span />");
    }

    #[test]
    fn test_fragment() {
        let fragment = parse_fragment("<i>x</i>").unwrap();
        assert_eq!(
            pretty_dom_with(&fragment, plain(7000)),
            "<DocumentFragment>\n  <i>\n    x\n  </i>\n</DocumentFragment>"
        );
    }

    #[test]
    fn test_truncation() {
        let node = element("<div>abcdefghij</div>");
        assert_eq!(pretty_dom_with(&node, plain(5)), "<div>...");
    }

    #[test]
    fn test_highlight_adds_escapes() {
        // crossterm honours NO_COLOR.
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        let node = element("<div id=\"a\"></div>");
        let colored = pretty_dom_with(&node, PrettyOptions { max_length: 7000, highlight: true });
        assert!(colored.contains('\u{1b}'));
    }

    #[test]
    fn test_write_dom() {
        let node = element("<hr>");
        let mut out = Vec::new();
        write_dom(&mut out, &node, Some(7000)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<hr />\n");
    }
}
