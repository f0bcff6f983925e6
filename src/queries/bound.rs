//! Bound Queries - Query sets bound to a scope element.
//!
//! A [`QuerySet`] maps a query kind ("text", "test_id", ...) to a "query
//! all" function. Binding it to an element yields [`BoundQueries`], which
//! derives the four lookup variants for every kind:
//!
//! | variant        | 0 matches  | 1 match     | 2+ matches   |
//! |----------------|------------|-------------|--------------|
//! | `get_by`       | `NotFound` | node        | `Multiple`   |
//! | `get_all_by`   | `NotFound` | `[node]`    | all nodes    |
//! | `query_by`     | `None`     | `Some(node)`| `Multiple`   |
//! | `query_all_by` | `[]`       | `[node]`    | all nodes    |

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::{document, Node};
use crate::error::QueryError;
use super::builtins;
use super::matcher::TextMatch;
use super::pretty::{pretty_dom_with, PrettyOptions};

/// A "query all" function: every matching element under the scope.
pub type QueryFn = Rc<dyn Fn(&Node, &TextMatch) -> Vec<Node>>;

// =============================================================================
// Query Set
// =============================================================================

/// Named query functions.
///
/// `QuerySet::default()` holds the built-in kinds: `text`, `test_id`,
/// `role`, `title`, `placeholder` and `alt_text`.
#[derive(Clone)]
pub struct QuerySet {
    queries: BTreeMap<String, QueryFn>,
}

impl QuerySet {
    /// A set with no queries at all.
    pub fn empty() -> Self {
        Self {
            queries: BTreeMap::new(),
        }
    }

    /// Add or replace a kind (builder style).
    pub fn with(mut self, kind: &str, query: impl Fn(&Node, &TextMatch) -> Vec<Node> + 'static) -> Self {
        self.insert(kind, query);
        self
    }

    pub fn insert(&mut self, kind: &str, query: impl Fn(&Node, &TextMatch) -> Vec<Node> + 'static) {
        self.queries.insert(kind.to_string(), Rc::new(query));
    }

    pub fn get(&self, kind: &str) -> Option<&QueryFn> {
        self.queries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.queries.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }
}

impl Default for QuerySet {
    fn default() -> Self {
        Self::empty()
            .with("text", builtins::query_all_by_text)
            .with("test_id", builtins::query_all_by_test_id)
            .with("role", builtins::query_all_by_role)
            .with("title", builtins::query_all_by_title)
            .with("placeholder", builtins::query_all_by_placeholder)
            .with("alt_text", builtins::query_all_by_alt_text)
    }
}

impl fmt::Debug for QuerySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

// =============================================================================
// Bound Queries
// =============================================================================

/// A query set bound to a scope element.
#[derive(Clone, Debug)]
pub struct BoundQueries {
    container: Node,
    queries: QuerySet,
}

/// Bind `queries` (or the default set) to `container`.
pub fn get_queries_for_element(container: &Node, queries: Option<QuerySet>) -> BoundQueries {
    BoundQueries {
        container: container.clone(),
        queries: queries.unwrap_or_default(),
    }
}

/// Default queries scoped to `node`.
pub fn within(node: &Node) -> BoundQueries {
    get_queries_for_element(node, None)
}

/// Default queries scoped to the document body.
pub fn screen() -> BoundQueries {
    get_queries_for_element(document().body(), None)
}

/// Generate the four typed variants for a query kind.
macro_rules! query_variants {
    ($kind:literal, $get:ident, $get_all:ident, $query:ident, $query_all:ident) => {
        pub fn $get(&self, matcher: impl Into<TextMatch>) -> Result<Node, QueryError> {
            self.get_by($kind, matcher)
        }

        pub fn $get_all(&self, matcher: impl Into<TextMatch>) -> Result<Vec<Node>, QueryError> {
            self.get_all_by($kind, matcher)
        }

        pub fn $query(&self, matcher: impl Into<TextMatch>) -> Result<Option<Node>, QueryError> {
            self.query_by($kind, matcher)
        }

        pub fn $query_all(&self, matcher: impl Into<TextMatch>) -> Result<Vec<Node>, QueryError> {
            self.query_all_by($kind, matcher)
        }
    };
}

impl BoundQueries {
    /// The scope element.
    pub fn container(&self) -> &Node {
        &self.container
    }

    pub fn query_set(&self) -> &QuerySet {
        &self.queries
    }

    fn run(&self, kind: &str, matcher: &TextMatch) -> Result<Vec<Node>, QueryError> {
        let query = self
            .queries
            .get(kind)
            .ok_or_else(|| QueryError::UnknownQuery(kind.to_string()))?;
        let found = query(&self.container, matcher);
        tracing::trace!(kind, matcher = %matcher.describe(), found = found.len(), "query");
        Ok(found)
    }

    fn describe(kind: &str, matcher: &TextMatch) -> String {
        format!("by {}: {}", kind.replace('_', " "), matcher.describe())
    }

    fn scope_dom(&self) -> String {
        pretty_dom_with(
            &self.container,
            PrettyOptions {
                highlight: false,
                ..PrettyOptions::default()
            },
        )
    }

    pub fn query_all_by(&self, kind: &str, matcher: impl Into<TextMatch>) -> Result<Vec<Node>, QueryError> {
        self.run(kind, &matcher.into())
    }

    pub fn query_by(&self, kind: &str, matcher: impl Into<TextMatch>) -> Result<Option<Node>, QueryError> {
        let matcher = matcher.into();
        let mut found = self.run(kind, &matcher)?;
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            count => Err(QueryError::Multiple {
                count,
                description: Self::describe(kind, &matcher),
                dom: self.scope_dom(),
            }),
        }
    }

    pub fn get_all_by(&self, kind: &str, matcher: impl Into<TextMatch>) -> Result<Vec<Node>, QueryError> {
        let matcher = matcher.into();
        let found = self.run(kind, &matcher)?;
        if found.is_empty() {
            return Err(QueryError::NotFound {
                description: Self::describe(kind, &matcher),
                dom: self.scope_dom(),
            });
        }
        Ok(found)
    }

    pub fn get_by(&self, kind: &str, matcher: impl Into<TextMatch>) -> Result<Node, QueryError> {
        let matcher = matcher.into();
        match self.query_by(kind, matcher.clone())? {
            Some(node) => Ok(node),
            None => Err(QueryError::NotFound {
                description: Self::describe(kind, &matcher),
                dom: self.scope_dom(),
            }),
        }
    }

    query_variants!("text", get_by_text, get_all_by_text, query_by_text, query_all_by_text);
    query_variants!("test_id", get_by_test_id, get_all_by_test_id, query_by_test_id, query_all_by_test_id);
    query_variants!("role", get_by_role, get_all_by_role, query_by_role, query_all_by_role);
    query_variants!("title", get_by_title, get_all_by_title, query_by_title, query_all_by_title);
    query_variants!(
        "placeholder",
        get_by_placeholder_text,
        get_all_by_placeholder_text,
        query_by_placeholder_text,
        query_all_by_placeholder_text
    );
    query_variants!("alt_text", get_by_alt_text, get_all_by_alt_text, query_by_alt_text, query_all_by_alt_text);
}
