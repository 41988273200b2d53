//! The closed type grammar actions and records are allowed to use.
//!
//! Every annotation in a plugin module resolves to a `TypeExpr` or fails
//! extraction. The grammar is deliberately small: primitives, three
//! containers, optionals, record references, and the `Dynamic` escape hatch.

use serde::{Deserialize, Serialize};

/// Resolved type of a field, parameter, or return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum TypeExpr {
    Bool,
    Int,
    Float,
    Complex,
    Str,
    DateTime,
    /// Escape hatch accepting anything; never inferred, only written
    Dynamic,
    /// "No value" marker, valid only as a bare return type
    NoneType,
    Optional { inner: Box<TypeExpr> },
    SetOf { item: Box<TypeExpr> },
    ListOf { item: Box<TypeExpr> },
    DictOf { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// Reference to a record declared in the same module
    RecordRef { name: String },
}

impl TypeExpr {
    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional {
            inner: Box::new(inner),
        }
    }

    pub fn set_of(item: TypeExpr) -> Self {
        TypeExpr::SetOf {
            item: Box::new(item),
        }
    }

    pub fn list_of(item: TypeExpr) -> Self {
        TypeExpr::ListOf {
            item: Box::new(item),
        }
    }

    pub fn dict_of(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::DictOf {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn record_ref(name: impl Into<String>) -> Self {
        TypeExpr::RecordRef { name: name.into() }
    }

    /// Append every record name referenced anywhere in this type to `out`.
    ///
    /// Walks through `Optional`/`SetOf`/`ListOf`/`DictOf` wrappers; the graph
    /// builder and the reference check both treat wrapped references as real
    /// structural dependencies.
    pub fn collect_record_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeExpr::Optional { inner } => inner.collect_record_refs(out),
            TypeExpr::SetOf { item } | TypeExpr::ListOf { item } => item.collect_record_refs(out),
            TypeExpr::DictOf { key, value } => {
                key.collect_record_refs(out);
                value.collect_record_refs(out);
            }
            TypeExpr::RecordRef { name } => out.push(name),
            _ => {}
        }
    }
}

impl std::fmt::Display for TypeExpr {
    /// Canonical annotation spelling, e.g. `list[Newspaper]`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Bool => write!(f, "bool"),
            TypeExpr::Int => write!(f, "int"),
            TypeExpr::Float => write!(f, "float"),
            TypeExpr::Complex => write!(f, "complex"),
            TypeExpr::Str => write!(f, "str"),
            TypeExpr::DateTime => write!(f, "datetime"),
            TypeExpr::Dynamic => write!(f, "any"),
            TypeExpr::NoneType => write!(f, "none"),
            TypeExpr::Optional { inner } => write!(f, "optional[{}]", inner),
            TypeExpr::SetOf { item } => write!(f, "set[{}]", item),
            TypeExpr::ListOf { item } => write!(f, "list[{}]", item),
            TypeExpr::DictOf { key, value } => write!(f, "dict[{}, {}]", key, value),
            TypeExpr::RecordRef { name } => write!(f, "{}", name),
        }
    }
}
