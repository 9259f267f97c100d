//! Diagnostics accumulated during a load.
//!
//! Per-triple and per-entity failures never abort a load; they are
//! recorded here and handed back from `end_of_stream`. The single fatal
//! condition (a ledger invariant violation) is also expressed as a
//! diagnostic, at [`Severity::High`], alongside the halt flag in the
//! report.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Arguments structurally incompatible with the predicate, or a
    /// triple dropped after it could not complete even once its
    /// references resolved.
    MalformedTriple,
    /// A name that still does not resolve after forced materialization.
    /// Engine invariant violation, not an input problem.
    UnresolvableReference,
    /// A generated name collided with an existing entity.
    NamingConflict,
    /// The object of a type assertion does not denote a class.
    TypeMismatch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedTriple => "malformed triple",
            Self::UnresolvableReference => "unresolvable reference",
            Self::NamingConflict => "naming conflict",
            Self::TypeMismatch => "type mismatch",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn high(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::High,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of one load, returned by `end_of_stream`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub triples_seen: u64,
    pub triples_deferred: u64,
    pub triples_dropped: u64,
    pub entities_created: u64,
    pub diagnostics: Vec<Diagnostic>,
    /// True when a ledger invariant violation stopped replay early.
    pub halted: bool,
}

impl LoadReport {
    pub fn has_high_severity(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::High)
    }
}
