//! Rule: Recursive Record
//!
//! Reports an error when a record's field types (transitively) contain the
//! record itself. Containment through `optional`, `set`, `list`, and `dict`
//! wrappers counts: a cycle anywhere in the structural graph means the
//! schema has no finite materialization depth.
//!
//! # Examples
//!
//! ```plugin
//! // Error: `Cons` contains itself
//! record Cons { car: int, cdr: Cons }
//! ```
//!
//! ```plugin
//! // Error: a list of itself is still a cycle
//! record Tree { children: list[Tree] }
//! ```
//!
//! ```plugin
//! // OK: references without a cycle
//! record Author { name: str }
//! record Article { author: Author }
//! ```

use crate::catalog::{ActionDescriptor, RecordDescriptor};
use crate::diagnostics::Diagnostic;
use crate::graph;

use super::super::SchemaRule;

/// Rule that re-runs containment-cycle detection over the record set.
pub struct RecursiveRecordRule;

impl SchemaRule for RecursiveRecordRule {
    fn id(&self) -> &'static str {
        "recursive-record"
    }

    fn description(&self) -> &'static str {
        "Record types must not contain themselves, directly or through containers"
    }

    fn check(&self, records: &[RecordDescriptor], _actions: &[ActionDescriptor]) -> Vec<Diagnostic> {
        graph::check_cycles(records)
    }
}
