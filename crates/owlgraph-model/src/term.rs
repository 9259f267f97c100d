//! RDF term model shared between the syntax adapter and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-literal RDF term: an IRI or a document-scoped blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RdfNode {
    Iri(String),
    BlankNode(String),
}

impl RdfNode {
    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(s.into())
    }

    pub fn blank(s: impl Into<String>) -> Self {
        Self::BlankNode(s.into())
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }
}

impl fmt::Display for RdfNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(bn) => write!(f, "_:{bn}"),
        }
    }
}

/// A literal with optional datatype and language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RdfLiteral {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl RdfLiteral {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// True if the literal reads as a boolean `true` (`"true"` or `"1"`).
    pub fn is_true(&self) -> bool {
        matches!(self.lexical.as_str(), "true" | "1")
    }
}

impl fmt::Display for RdfLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")?;
        }
        Ok(())
    }
}

/// Object position of a statement: another node or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(n) => n.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}
