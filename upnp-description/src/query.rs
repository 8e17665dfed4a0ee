//! Path queries over a parsed description document.
//!
//! The device tree builder only needs four operations from the document
//! model, captured by [`QueryContext`]. [`XmlContext`] implements them over an
//! `xmltree` DOM with a small path subset:
//!
//! - `a/b/c` walks child elements by local name (namespace prefixes ignored)
//! - `name[i]` keeps only the i-th matching child (1-based) of each parent
//! - `count(path)` is accepted by [`QueryContext::get_number`]

use thiserror::Error;
use xml::reader::{EventReader, XmlEvent};
use xmltree::{Element, XMLNode};

use crate::error::{DescriptionError, Result};

/// Errors raised by a query context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The path does not resolve to any element
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// The path is not valid for this query engine
    #[error("invalid path expression: {0}")]
    InvalidPath(String),

    /// The path resolved, but not to a number
    #[error("value at `{path}` is not a number: `{value}`")]
    NotANumber { path: String, value: String },
}

/// Minimal query contract consumed by the device tree builder.
///
/// Every path is evaluated relative to the node the context is scoped to.
pub trait QueryContext: Sized {
    /// Handle to a node, used to scope a new context.
    type Pointer;

    /// Text content of the first node matching `path`.
    fn get_string(&self, path: &str) -> std::result::Result<String, QueryError>;

    /// Numeric value of `path`; used with `count(...)` expressions.
    fn get_number(&self, path: &str) -> std::result::Result<f64, QueryError>;

    /// First node matching `path`, or `PathNotFound`.
    fn get_pointer(&self, path: &str) -> std::result::Result<Self::Pointer, QueryError>;

    /// A context whose queries are relative to `pointer`.
    fn relative_context(&self, pointer: Self::Pointer) -> Self;
}

/// An owned, parsed description document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    /// Parse a document from its text, accepting up to
    /// [`DEFAULT_ELEMENT_DEPTH`] levels of element nesting.
    ///
    /// # Errors
    ///
    /// Returns `DescriptionError::Xml` if the text is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_limit(xml, DEFAULT_ELEMENT_DEPTH)
    }

    /// Parse a document whose element nesting must not exceed `max_depth`.
    ///
    /// The nesting is checked on a streaming pass before the tree is built,
    /// so an oversized document never reaches the recursive DOM builder.
    ///
    /// # Errors
    ///
    /// `DocumentTooDeep` past the limit, `Xml` for malformed text.
    pub fn parse_with_limit(xml: &str, max_depth: usize) -> Result<Self> {
        check_nesting(xml, max_depth)?;
        let root = Element::parse(xml.as_bytes())
            .map_err(|e| DescriptionError::Xml(e.to_string()))?;
        Ok(Self { root })
    }

    /// Context scoped to the document itself, so `root` selects the top element.
    pub fn context(&self) -> XmlContext<'_> {
        XmlContext {
            scope: Scope::Document(&self.root),
        }
    }
}

/// Element nesting accepted by [`XmlDocument::parse`].
pub const DEFAULT_ELEMENT_DEPTH: usize = 64;

fn check_nesting(xml: &str, limit: usize) -> Result<()> {
    let mut depth = 0usize;
    for event in EventReader::new(xml.as_bytes()) {
        match event.map_err(|e| DescriptionError::Xml(e.to_string()))? {
            XmlEvent::StartElement { .. } => {
                depth += 1;
                if depth > limit {
                    return Err(DescriptionError::DocumentTooDeep { limit });
                }
            }
            XmlEvent::EndElement { .. } => depth = depth.saturating_sub(1),
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Document(&'a Element),
    Node(&'a Element),
}

impl<'a> Scope<'a> {
    fn children(self) -> Vec<&'a Element> {
        match self {
            Scope::Document(root) => vec![root],
            Scope::Node(node) => node
                .children
                .iter()
                .filter_map(|child| match child {
                    XMLNode::Element(element) => Some(element),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// [`QueryContext`] over an `xmltree` element tree.
#[derive(Debug, Clone, Copy)]
pub struct XmlContext<'a> {
    scope: Scope<'a>,
}

impl<'a> XmlContext<'a> {
    /// Context scoped beneath `element`.
    pub fn new(element: &'a Element) -> Self {
        Self {
            scope: Scope::Node(element),
        }
    }

    fn select(&self, path: &str) -> std::result::Result<Vec<&'a Element>, QueryError> {
        let steps = parse_path(path)?;
        let mut frontier = vec![self.scope];
        let mut selected = Vec::new();

        for step in &steps {
            selected = Vec::new();
            for scope in &frontier {
                let matching = scope
                    .children()
                    .into_iter()
                    .filter(|element| element.name == step.name);
                match step.position {
                    Some(position) => selected.extend(matching.skip(position - 1).take(1)),
                    None => selected.extend(matching),
                }
            }
            frontier = selected.iter().copied().map(Scope::Node).collect();
        }

        Ok(selected)
    }
}

impl<'a> QueryContext for XmlContext<'a> {
    type Pointer = &'a Element;

    fn get_string(&self, path: &str) -> std::result::Result<String, QueryError> {
        let element = self.get_pointer(path)?;
        Ok(element
            .get_text()
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    fn get_number(&self, path: &str) -> std::result::Result<f64, QueryError> {
        let trimmed = path.trim();
        if let Some(inner) = trimmed
            .strip_prefix("count(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Ok(self.select(inner)?.len() as f64);
        }

        let value = self.get_string(trimmed)?;
        value.parse::<f64>().map_err(|_| QueryError::NotANumber {
            path: trimmed.to_string(),
            value,
        })
    }

    fn get_pointer(&self, path: &str) -> std::result::Result<Self::Pointer, QueryError> {
        self.select(path)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::PathNotFound(path.trim().to_string()))
    }

    fn relative_context(&self, pointer: Self::Pointer) -> Self {
        XmlContext::new(pointer)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Step<'p> {
    name: &'p str,
    position: Option<usize>,
}

fn parse_path(path: &str) -> std::result::Result<Vec<Step<'_>>, QueryError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(QueryError::InvalidPath(path.to_string()));
    }

    trimmed
        .split('/')
        .map(|raw| parse_step(raw).ok_or_else(|| QueryError::InvalidPath(path.to_string())))
        .collect()
}

fn parse_step(raw: &str) -> Option<Step<'_>> {
    let raw = raw.trim();
    let (name, position) = match raw.find('[') {
        Some(open) => {
            let predicate = raw[open + 1..].strip_suffix(']')?;
            let position = predicate.trim().parse::<usize>().ok().filter(|p| *p >= 1)?;
            (raw[..open].trim(), Some(position))
        }
        None => (raw, None),
    };

    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid_name {
        return None;
    }

    Some(Step { name, position })
}
