//! Built-in Queries - "Query all" functions for the default query set.
//!
//! Each function returns every element under `container` (not the container
//! itself) that matches, in tree order. The single/multiple variants are
//! derived from these by [`BoundQueries`](super::BoundQueries).

use crate::dom::Node;
use super::config::get_config;
use super::matcher::TextMatch;

/// Elements whose text is never matched by text queries.
const IGNORED_TAGS: &[&str] = &["script", "style"];

/// Text of an element's own text children, joined.
pub fn node_text(node: &Node) -> String {
    node.child_nodes()
        .iter()
        .filter_map(Node::data)
        .collect()
}

pub fn query_all_by_text(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    container
        .descendant_elements()
        .into_iter()
        .filter(|el| !el.tag_name().is_some_and(|tag| IGNORED_TAGS.contains(&tag)))
        .filter(|el| matcher.matches(&node_text(el), el))
        .collect()
}

/// Elements whose `attribute` value matches.
pub fn query_all_by_attribute(attribute: &str, container: &Node, matcher: &TextMatch) -> Vec<Node> {
    container
        .descendant_elements()
        .into_iter()
        .filter(|el| {
            el.get_attribute(attribute)
                .is_some_and(|value| matcher.matches(&value, el))
        })
        .collect()
}

pub fn query_all_by_test_id(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    let attribute = get_config().test_id_attribute;
    query_all_by_attribute(&attribute, container, matcher)
}

pub fn query_all_by_title(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    query_all_by_attribute("title", container, matcher)
}

pub fn query_all_by_placeholder(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    query_all_by_attribute("placeholder", container, matcher)
}

pub fn query_all_by_alt_text(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    container
        .descendant_elements()
        .into_iter()
        .filter(|el| matches!(el.tag_name(), Some("img" | "input" | "area")))
        .filter(|el| {
            el.get_attribute("alt")
                .is_some_and(|value| matcher.matches(&value, el))
        })
        .collect()
}

// =============================================================================
// Roles
// =============================================================================

/// Role an element exposes without an explicit `role` attribute.
pub fn implicit_role(node: &Node) -> Option<&'static str> {
    let role = match node.tag_name()? {
        "a" | "area" if node.has_attribute("href") => "link",
        "article" => "article",
        "aside" => "complementary",
        "button" => "button",
        "dialog" => "dialog",
        "footer" => "contentinfo",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "header" => "banner",
        "hr" => "separator",
        "img" if node.get_attribute("alt").as_deref() != Some("") => "img",
        "input" => match node.get_attribute("type").as_deref().unwrap_or("text") {
            "button" | "image" | "reset" | "submit" => "button",
            "checkbox" => "checkbox",
            "number" => "spinbutton",
            "radio" => "radio",
            "range" => "slider",
            "search" => "searchbox",
            "email" | "tel" | "text" | "url" => "textbox",
            _ => return None,
        },
        "li" => "listitem",
        "main" => "main",
        "nav" => "navigation",
        "ol" | "ul" => "list",
        "option" => "option",
        "p" => "paragraph",
        "select" if node.has_attribute("multiple") => "listbox",
        "select" => "combobox",
        "table" => "table",
        "td" => "cell",
        "textarea" => "textbox",
        "th" => "columnheader",
        "tr" => "row",
        _ => return None,
    };
    Some(role)
}

/// Explicit role (first token of `role`) or the implicit one.
pub fn role_of(node: &Node) -> Option<String> {
    node.get_attribute("role")
        .and_then(|roles| roles.split_whitespace().next().map(str::to_string))
        .or_else(|| implicit_role(node).map(str::to_string))
}

/// Hidden by `hidden` or `aria-hidden="true"` on itself or an ancestor.
pub fn is_inaccessible(node: &Node) -> bool {
    let mut current = Some(node.clone());
    while let Some(el) = current {
        if el.has_attribute("hidden") || el.get_attribute("aria-hidden").as_deref() == Some("true") {
            return true;
        }
        current = el.parent_node();
    }
    false
}

pub fn query_all_by_role(container: &Node, matcher: &TextMatch) -> Vec<Node> {
    container
        .descendant_elements()
        .into_iter()
        .filter(|el| !is_inaccessible(el))
        .filter(|el| role_of(el).is_some_and(|role| matcher.matches(&role, el)))
        .collect()
}
