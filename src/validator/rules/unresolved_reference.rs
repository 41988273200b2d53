//! Rule: Unresolved Reference
//!
//! Reports an error when any resolved type still carries a record reference
//! that no record in the module declares. The resolver only produces
//! `RecordRef` for declared names, so this is the end-to-end confirmation
//! that every reference in the final descriptor set stays resolvable.
//!
//! # Examples
//!
//! ```plugin
//! // Error: nothing declares `Publisher`
//! action lookup(id: str) -> Publisher
//! ```

use std::collections::HashSet;

use crate::ast::Span;
use crate::catalog::{ActionDescriptor, RecordDescriptor};
use crate::diagnostics::Diagnostic;
use crate::types::TypeExpr;

use super::super::SchemaRule;

/// Rule that checks every type against the set of declared record names.
pub struct UnresolvedReferenceRule;

impl SchemaRule for UnresolvedReferenceRule {
    fn id(&self) -> &'static str {
        "unresolved-reference"
    }

    fn description(&self) -> &'static str {
        "Every record reference must name a record declared in the module"
    }

    fn check(&self, records: &[RecordDescriptor], actions: &[ActionDescriptor]) -> Vec<Diagnostic> {
        let declared: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let mut diagnostics = Vec::new();

        for record in records {
            for field in &record.fields {
                check_type(&field.ty, field.span, &record.name, &declared, &mut diagnostics);
            }
        }

        for action in actions {
            for param in &action.parameters {
                check_type(&param.ty, param.span, &action.name, &declared, &mut diagnostics);
            }
            check_type(
                &action.return_type,
                action.name_span,
                &action.name,
                &declared,
                &mut diagnostics,
            );
        }

        diagnostics
    }
}

/// Report every reference in `ty` whose name is not in `declared`.
fn check_type(
    ty: &TypeExpr,
    location: Span,
    symbol: &str,
    declared: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut refs = Vec::new();
    ty.collect_record_refs(&mut refs);

    for name in refs {
        if !declared.contains(name) {
            diagnostics.push(Diagnostic::ambiguous_reference(
                location,
                symbol,
                format!(
                    "Type references record `{}`, which is not declared in this module",
                    name
                ),
            ));
        }
    }
}
