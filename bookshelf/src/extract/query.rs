//! Namespaced path queries over parsed XML.
//!
//! Supports the subset of XPath the metadata tables use:
//!
//! - `/a:b/c:d` absolute path from the document root
//! - `//a:b/c:d` first step matched anywhere below the document root
//! - `a:b/c:d` relative to the context node
//! - a trailing `@name` or `@p:name` step selecting an attribute
//!
//! Unprefixed element steps match elements in no namespace, as in XPath 1.0.

use roxmltree::{Document, Node};

use crate::config::Namespaces;
use crate::error::{BookshelfError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Anchor {
    Root,
    Descendants,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QName {
    prefix: Option<String>,
    local: String,
}

impl QName {
    fn parse(expression: &str, raw: &str) -> Result<Self> {
        let (prefix, local) = match raw.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, raw),
        };

        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        if !valid(local) || prefix.is_some_and(|p| !valid(p)) {
            return Err(BookshelfError::invalid_query(
                expression,
                format!("invalid name '{raw}'"),
            ));
        }

        Ok(Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
        })
    }

    fn namespace<'a>(&self, expression: &str, namespaces: &'a Namespaces) -> Result<Option<&'a str>> {
        match &self.prefix {
            None => Ok(None),
            Some(prefix) => namespaces.resolve(prefix).map(Some).ok_or_else(|| {
                BookshelfError::invalid_query(expression, format!("unbound prefix '{prefix}'"))
            }),
        }
    }
}

/// A value selected by a query.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a, 'input> {
    /// An element node.
    Element(Node<'a, 'input>),
    /// The value of an attribute.
    Attribute(&'a str),
}

impl<'a, 'input> Selection<'a, 'input> {
    /// Text of the selection: the element's first text child or the attribute value.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Self::Element(node) => node.text(),
            Self::Attribute(value) => Some(value),
        }
    }

    /// The element node, if this selection is one.
    pub fn node(&self) -> Option<Node<'a, 'input>> {
        match self {
            Self::Element(node) => Some(*node),
            Self::Attribute(_) => None,
        }
    }
}

/// A parsed path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    expression: String,
    anchor: Anchor,
    steps: Vec<QName>,
    attribute: Option<QName>,
}

impl Query {
    /// Parse a query expression.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::InvalidQuery`] for empty expressions, empty
    /// steps, malformed names or an attribute step that is not last.
    pub fn parse(expression: &str) -> Result<Self> {
        let (anchor, rest) = if let Some(rest) = expression.strip_prefix("//") {
            (Anchor::Descendants, rest)
        } else if let Some(rest) = expression.strip_prefix('/') {
            (Anchor::Root, rest)
        } else {
            (Anchor::Context, expression)
        };

        if rest.is_empty() {
            return Err(BookshelfError::invalid_query(expression, "empty path"));
        }

        let raw_steps: Vec<&str> = rest.split('/').collect();
        let mut steps = Vec::with_capacity(raw_steps.len());
        let mut attribute = None;

        for (idx, raw) in raw_steps.iter().enumerate() {
            if raw.is_empty() {
                return Err(BookshelfError::invalid_query(expression, "empty step"));
            }

            if let Some(name) = raw.strip_prefix('@') {
                if idx + 1 != raw_steps.len() {
                    return Err(BookshelfError::invalid_query(
                        expression,
                        "attribute step must be last",
                    ));
                }
                attribute = Some(QName::parse(expression, name)?);
            } else {
                steps.push(QName::parse(expression, raw)?);
            }
        }

        if steps.is_empty() && anchor != Anchor::Context {
            return Err(BookshelfError::invalid_query(
                expression,
                "absolute path needs an element step",
            ));
        }

        Ok(Self {
            expression: expression.to_string(),
            anchor,
            steps,
            attribute,
        })
    }

    /// The source expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate against `context`, resolving prefixes through `namespaces`.
    ///
    /// Absolute and descendant queries ignore the context's position and start
    /// from its document root. Results are in document order.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::InvalidQuery`] if a prefix is not bound.
    pub fn select<'a, 'input>(
        &self,
        context: Node<'a, 'input>,
        namespaces: &Namespaces,
    ) -> Result<Vec<Selection<'a, 'input>>> {
        let root = context.document().root();

        let mut steps = self.steps.iter();
        let mut current: Vec<Node<'a, 'input>> = match self.anchor {
            Anchor::Context => vec![context],
            Anchor::Root => vec![root],
            Anchor::Descendants => match steps.next() {
                Some(first) => {
                    let ns = first.namespace(&self.expression, namespaces)?;
                    root.descendants()
                        .filter(|n| matches_element(n, ns, &first.local))
                        .collect()
                }
                None => Vec::new(),
            },
        };

        for step in steps {
            let ns = step.namespace(&self.expression, namespaces)?;
            current = current
                .iter()
                .flat_map(|node| node.children())
                .filter(|n| matches_element(n, ns, &step.local))
                .collect();
        }

        match &self.attribute {
            None => Ok(current.into_iter().map(Selection::Element).collect()),
            Some(attr) => {
                let ns = attr.namespace(&self.expression, namespaces)?;
                Ok(current
                    .into_iter()
                    .filter_map(|node| match ns {
                        Some(ns) => node.attribute((ns, attr.local.as_str())),
                        None => node.attribute(attr.local.as_str()),
                    })
                    .map(Selection::Attribute)
                    .collect())
            }
        }
    }

    /// First selection's text, if the query matched anything.
    pub fn first_text<'a>(
        &self,
        context: Node<'a, '_>,
        namespaces: &Namespaces,
    ) -> Result<Option<&'a str>> {
        Ok(self
            .select(context, namespaces)?
            .first()
            .map(|sel| sel.text().unwrap_or_default()))
    }
}

fn matches_element(node: &Node<'_, '_>, ns: Option<&str>, local: &str) -> bool {
    node.is_element() && node.tag_name().name() == local && node.tag_name().namespace() == ns
}

/// Parse XML text the way every metadata document is parsed.
pub fn parse_document(text: &str) -> std::result::Result<Document<'_>, roxmltree::Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
}
