//! Markup - HTML serialization and a small fragment parser.
//!
//! The parser understands the subset the serializer produces plus what a
//! test author writes by hand: elements, quoted/unquoted/boolean attributes,
//! character references, void elements and comments (which are dropped).

use crate::error::DomError;
use super::node::Node;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// =============================================================================
// Serialization
// =============================================================================

/// Serialize a node, including itself.
pub fn serialize(node: &Node) -> String {
    let mut out = String::new();
    serialize_into(node, &mut out);
    out
}

/// Serialize only the children of a node.
pub fn serialize_children(node: &Node) -> String {
    let mut out = String::new();
    for child in node.child_nodes() {
        serialize_into(&child, &mut out);
    }
    out
}

fn serialize_into(node: &Node, out: &mut String) {
    if let Some(data) = node.data() {
        out.push_str(&escape_text(&data));
        return;
    }

    let Some(tag) = node.tag_name() else {
        for child in node.child_nodes() {
            serialize_into(&child, out);
        }
        return;
    };

    out.push('<');
    out.push_str(tag);
    for (name, value) in node.attributes() {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&value));
        out.push('"');
    }
    out.push('>');

    if is_void_element(tag) {
        return;
    }

    let children = match node.template_content() {
        Some(content) => content.child_nodes(),
        None => node.child_nodes(),
    };
    for child in children {
        serialize_into(&child, out);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse `html` into a fresh, detached document fragment.
pub fn parse_fragment(html: &str) -> Result<Node, DomError> {
    let fragment = Node::new_fragment();
    let mut parser = Parser {
        input: html,
        pos: 0,
        stack: vec![fragment.clone()],
    };
    parser.run()?;
    Ok(fragment)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Open elements; the bottom entry is the fragment being built.
    stack: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, message: &str) -> DomError {
        DomError::Parse {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    /// Node that receives the next child; template children go to content.
    fn insertion_point(&self) -> Node {
        let top = &self.stack[self.stack.len() - 1];
        top.template_content().unwrap_or_else(|| top.clone())
    }

    fn run(&mut self) -> Result<(), DomError> {
        while self.pos < self.input.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_comment()?;
            } else if rest.starts_with("</") {
                self.end_tag()?;
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag()?;
            } else {
                self.text();
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), DomError> {
        match self.rest()[4..].find("-->") {
            Some(end) => {
                self.pos += 4 + end + 3;
                Ok(())
            }
            None => Err(self.error("unterminated comment")),
        }
    }

    fn text(&mut self) {
        // A lone '<' that does not open a tag is plain text.
        let rest = self.rest();
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let len = rest[first..].find('<').map(|i| i + first).unwrap_or(rest.len());
        let raw = &rest[..len];
        self.pos += len;
        self.insertion_point().push_child(Node::new_text(&decode_entities(raw)));
    }

    fn read_name(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let len = rest.len() - rest.trim_start().len();
        self.pos += len;
    }

    fn end_tag(&mut self) -> Result<(), DomError> {
        self.pos += 2;
        let name = self.read_name().to_ascii_lowercase();
        match self.rest().find('>') {
            Some(end) => self.pos += end + 1,
            None => return Err(self.error("unterminated end tag")),
        }
        // Close up to the matching open element; stray end tags are ignored.
        if let Some(index) = self.stack.iter().rposition(|n| n.tag_name() == Some(name.as_str())) {
            if index > 0 {
                self.stack.truncate(index);
            }
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), DomError> {
        self.pos += 1;
        let name = self.read_name().to_string();
        let element = Node::new_element(&name)?;
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unterminated start tag")),
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some('/') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let (attr, value) = self.attribute()?;
                    element.set_attribute(&attr, &value)?;
                }
            }
        }

        self.insertion_point().push_child(element.clone());
        let void = element.tag_name().is_some_and(is_void_element);
        if !self_closing && !void {
            self.stack.push(element);
        }
        Ok(())
    }

    fn attribute(&mut self) -> Result<(String, String), DomError> {
        let name = self.read_name().to_string();
        if name.is_empty() {
            return Err(self.error("expected attribute name"));
        }
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let Some(end) = self.rest().find(quote) else {
                    return Err(self.error("unterminated attribute value"));
                };
                let raw = &self.rest()[..end];
                let value = decode_entities(raw);
                self.pos += end + 1;
                value
            }
            _ => {
                let rest = self.rest();
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                let value = decode_entities(&rest[..len]);
                self.pos += len;
                value
            }
        };
        Ok((name, value))
    }
}

/// Decode the character references we serialize plus numeric ones.
/// Unknown references are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            c.map(|c| (c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
