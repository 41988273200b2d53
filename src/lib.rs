pub mod ast;
pub mod catalog;
pub mod diagnostics;
pub mod extractor;
pub mod graph;
pub mod options;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod types;
pub mod validator;

// Re-export main types
pub use catalog::{
    ActionDescriptor, FieldDescriptor, ParameterDescriptor, PluginSchema, RecordDescriptor,
};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use options::{ExtractOptions, TypeKeyword, TypeKeywords};
pub use types::TypeExpr;

// Re-export the pipeline API for convenience
pub use pipeline::{extract_schema, ExtractError, SchemaExtractor, Stage};
