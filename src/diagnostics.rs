//! Structured diagnostics reported back to plugin authors.
//!
//! Every violation found anywhere in the pipeline becomes a `Diagnostic`
//! keyed by source location, enclosing symbol, and violation kind. The full
//! list is collected before the pipeline fails, so one submission reports
//! every problem at once.

use serde::{Deserialize, Serialize};

use crate::ast::Span;

/// Symbol used for diagnostics not attached to a named declaration
pub const MODULE_SYMBOL: &str = "<module>";

/// The closed set of violation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Annotation outside the closed type grammar, or wrong container arity
    UnsupportedType,
    /// Record type graph contains a cycle, directly or through containers
    RecursiveRecord,
    /// Two records or two actions share a name
    DuplicateName,
    /// A bare name that looks like a record reference but matches nothing
    AmbiguousReference,
    /// Source cannot be parsed into record/action declarations
    MalformedDeclaration,
}

impl DiagnosticKind {
    /// Stable identifier, also used as the rule id in validation
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedType => "unsupported-type",
            DiagnosticKind::RecursiveRecord => "recursive-record",
            DiagnosticKind::DuplicateName => "duplicate-name",
            DiagnosticKind::AmbiguousReference => "ambiguous-reference",
            DiagnosticKind::MalformedDeclaration => "malformed-declaration",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One violation found during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The source location of the issue
    pub location: Span,
    /// The enclosing declaration (`action`, `record`, `action.param`), or
    /// [`MODULE_SYMBOL`]
    pub symbol: String,
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            symbol: symbol.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported_type(
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DiagnosticKind::UnsupportedType, location, symbol, message)
    }

    pub fn recursive_record(
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DiagnosticKind::RecursiveRecord, location, symbol, message)
    }

    pub fn duplicate_name(
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DiagnosticKind::DuplicateName, location, symbol, message)
    }

    pub fn ambiguous_reference(
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DiagnosticKind::AmbiguousReference, location, symbol, message)
    }

    pub fn malformed_declaration(
        location: Span,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            DiagnosticKind::MalformedDeclaration,
            location,
            symbol,
            message,
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, col {}: {} [{}]",
            self.kind,
            self.location.start_line + 1,
            self.location.start_col + 1,
            self.message,
            self.symbol
        )
    }
}
