//! Resolved descriptors and the assembled plugin schema.
//!
//! These are the values handed across the library boundary on success. The
//! workflow generator consumes the serialized form; spans and declaration
//! order are extraction bookkeeping and never serialize.

use serde::{Deserialize, Serialize};

use crate::ast::Span;
use crate::types::TypeExpr;

/// One named, typed field of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(skip)]
    pub span: Span,
}

/// A user-defined structured type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// 0-based position among record declarations
    #[serde(skip)]
    pub declaration_order: usize,
    /// Span of the declared name; diagnostics about this record point here
    #[serde(skip)]
    pub name_span: Span,
}

/// One named, typed action parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Raw default value text, when the author declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip)]
    pub span: Span,
}

/// An exported callable with its resolved signature
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeExpr,
    /// True for suspending (async) calling convention
    pub is_suspending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Content of a `@purpose("...")` decorator, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip)]
    pub name_span: Span,
}

/// The immutable catalog of all records and actions for one module.
///
/// Records keep declaration order with validated-unique names, so the
/// sequence doubles as a name-keyed set; actions keep declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSchema {
    pub records: Vec<RecordDescriptor>,
    pub actions: Vec<ActionDescriptor>,
}

impl PluginSchema {
    /// Assemble the final artifact from validated descriptors
    pub fn new(records: Vec<RecordDescriptor>, actions: Vec<ActionDescriptor>) -> Self {
        Self { records, actions }
    }

    /// Look up a record by name
    pub fn record(&self, name: &str) -> Option<&RecordDescriptor> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Look up an action by name
    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.name == name)
    }
}
