//! Syntax-level representation of a parsed plugin module.
//!
//! These nodes are the Source Parser's output: raw declarations with source
//! spans, before any type resolution has happened. Type annotations stay as
//! the applied-name tree the author wrote (`TypeAnn`) so later stages can
//! report the exact spelling in diagnostics.

use serde::{Deserialize, Serialize};

/// Source location span for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// Start line (0-indexed)
    pub start_line: usize,
    /// Start column (0-indexed)
    pub start_col: usize,
    /// End line (0-indexed)
    pub end_line: usize,
    /// End column (0-indexed)
    pub end_col: usize,
}

impl Span {
    pub fn new(
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

/// A complete parsed plugin module: record and action declarations in
/// source order.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    pub records: Vec<RecordDecl>,
    pub actions: Vec<ActionDecl>,
    /// Span of the entire module
    pub span: Span,
}

/// A `record Name { ... }` declaration
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: String,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

/// One `name: type` field inside a record declaration
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeAnn,
    pub span: Span,
}

/// An `action name(...)` declaration, exported or not
#[derive(Debug, Clone)]
pub struct ActionDecl {
    pub name: String,
    pub name_span: Span,
    pub params: Vec<ParamDecl>,
    /// Raw return annotation; `None` when the arrow clause is absent
    pub return_ann: Option<TypeAnn>,
    /// True when declared `async action`
    pub is_async: bool,
    /// Verbatim content of the leading body string literal, if any
    pub docstring: Option<String>,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

/// One parameter in an action declaration
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    /// Raw annotation; `None` when the author omitted it
    pub ty: Option<TypeAnn>,
    /// Raw default value text, never interpreted by the engine
    pub default: Option<String>,
    pub span: Span,
}

/// A `@name(...)` decorator attached to a declaration.
#[derive(Debug, Clone)]
pub struct Decorator {
    pub name: String,
    pub args: Vec<DecoratorArg>,
    pub span: Span,
}

/// One decorator argument. String literals keep their unquoted content;
/// number, boolean, and identifier arguments keep their raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorArg {
    Str(String),
    Raw(String),
}

/// Raw type annotation: a name optionally applied to bracketed arguments,
/// e.g. `int`, `list[str]`, `dict[str, Newspaper]`.
#[derive(Debug, Clone)]
pub struct TypeAnn {
    pub name: String,
    pub args: Vec<TypeAnn>,
    pub span: Span,
}

impl TypeAnn {
    /// Re-render the annotation as the author spelled it, for diagnostics.
    pub fn render(&self) -> String {
        if self.args.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.args.iter().map(TypeAnn::render).collect();
        format!("{}[{}]", self.name, args.join(", "))
    }
}
