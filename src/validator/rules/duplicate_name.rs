//! Rule: Duplicate Name
//!
//! Reports an error when two records or two actions share a name. Records
//! and actions occupy separate namespaces, so a record and an action with
//! the same name do not conflict.
//!
//! # Examples
//!
//! ```plugin
//! // Error: `Foo` is declared twice
//! record Foo { x: int }
//! record Foo { y: str }
//! ```
//!
//! ```plugin
//! // OK: separate namespaces
//! record Report { body: str }
//! action report() -> Report
//! ```

use std::collections::HashMap;

use crate::ast::Span;
use crate::catalog::{ActionDescriptor, RecordDescriptor};
use crate::diagnostics::Diagnostic;

use super::super::SchemaRule;

/// Rule that checks for name collisions within each namespace.
pub struct DuplicateNameRule;

impl SchemaRule for DuplicateNameRule {
    fn id(&self) -> &'static str {
        "duplicate-name"
    }

    fn description(&self) -> &'static str {
        "Records and actions must have unique names within their namespace"
    }

    fn check(&self, records: &[RecordDescriptor], actions: &[ActionDescriptor]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        check_namespace(
            "Record",
            records.iter().map(|r| (r.name.as_str(), r.name_span)),
            &mut diagnostics,
        );
        check_namespace(
            "Action",
            actions.iter().map(|a| (a.name.as_str(), a.name_span)),
            &mut diagnostics,
        );

        diagnostics
    }
}

/// Report each later duplicate at its own location, naming the line of the
/// first declaration so both locations surface in the report.
fn check_namespace<'a>(
    noun: &str,
    named: impl Iterator<Item = (&'a str, Span)>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut seen: HashMap<&str, Span> = HashMap::new();

    for (name, span) in named {
        match seen.get(name) {
            Some(first) => {
                diagnostics.push(Diagnostic::duplicate_name(
                    span,
                    name,
                    format!(
                        "{} `{}` is already declared on line {}",
                        noun,
                        name,
                        first.start_line + 1
                    ),
                ));
            }
            None => {
                seen.insert(name, span);
            }
        }
    }
}
