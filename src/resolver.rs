//! Maps raw annotations onto the closed type grammar.
//!
//! Resolution never aborts: a failed annotation pushes a diagnostic and
//! resolves to `Dynamic` so the remaining declarations are still checked.
//! The placeholder stays unobservable, since the pipeline refuses to
//! assemble a schema while any diagnostic exists.

use std::collections::HashMap;

use crate::ast::{RecordDecl, Span, TypeAnn};
use crate::catalog::{FieldDescriptor, RecordDescriptor};
use crate::diagnostics::Diagnostic;
use crate::options::{TypeKeyword, TypeKeywords};
use crate::types::TypeExpr;

/// Where an annotation appears. `none` is only legal as a bare return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Field,
    Parameter,
    Return,
}

/// Record names declared in the module.
///
/// Built in a pre-pass over all declarations so forward references resolve
/// regardless of declaration order. The pre-pass is also where duplicate
/// record names are caught.
pub struct RecordTable {
    names: HashMap<String, Span>,
}

impl RecordTable {
    /// Collect declared record names, reporting each later duplicate at its
    /// own location with a message naming the first declaration's line.
    pub fn build(records: &[RecordDecl], diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut names: HashMap<String, Span> = HashMap::new();

        for record in records {
            match names.get(&record.name) {
                Some(first) => {
                    diagnostics.push(Diagnostic::duplicate_name(
                        record.name_span,
                        record.name.clone(),
                        format!(
                            "Record `{}` is already declared on line {}",
                            record.name,
                            first.start_line + 1
                        ),
                    ));
                }
                None => {
                    names.insert(record.name.clone(), record.name_span);
                }
            }
        }

        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }
}

/// Resolves raw annotations against the keyword table and declared records
pub struct Resolver<'a> {
    keywords: &'a TypeKeywords,
    table: &'a RecordTable,
}

impl<'a> Resolver<'a> {
    pub fn new(keywords: &'a TypeKeywords, table: &'a RecordTable) -> Self {
        Self { keywords, table }
    }

    /// Resolve one annotation, pushing a diagnostic and returning `Dynamic`
    /// on failure. `symbol` names the enclosing declaration for reporting.
    pub fn resolve(
        &self,
        ann: &TypeAnn,
        position: Position,
        symbol: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TypeExpr {
        // The "no value" marker is accepted only as the entire return
        // annotation; everywhere else it falls through to the error below.
        if position == Position::Return
            && ann.args.is_empty()
            && self.keywords.lookup(&ann.name) == Some(TypeKeyword::NoneType)
        {
            return TypeExpr::NoneType;
        }

        self.resolve_expr(ann, symbol, diagnostics)
    }

    fn resolve_expr(
        &self,
        ann: &TypeAnn,
        symbol: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TypeExpr {
        match self.keywords.lookup(&ann.name) {
            Some(TypeKeyword::Bool) => self.plain(ann, TypeExpr::Bool, symbol, diagnostics),
            Some(TypeKeyword::Int) => self.plain(ann, TypeExpr::Int, symbol, diagnostics),
            Some(TypeKeyword::Float) => self.plain(ann, TypeExpr::Float, symbol, diagnostics),
            Some(TypeKeyword::Complex) => self.plain(ann, TypeExpr::Complex, symbol, diagnostics),
            Some(TypeKeyword::Str) => self.plain(ann, TypeExpr::Str, symbol, diagnostics),
            Some(TypeKeyword::DateTime) => self.plain(ann, TypeExpr::DateTime, symbol, diagnostics),
            Some(TypeKeyword::Dynamic) => self.plain(ann, TypeExpr::Dynamic, symbol, diagnostics),
            Some(TypeKeyword::NoneType) => {
                diagnostics.push(Diagnostic::unsupported_type(
                    ann.span,
                    symbol,
                    format!("`{}` is only valid as a bare return type", ann.name),
                ));
                TypeExpr::Dynamic
            }
            Some(TypeKeyword::Optional) => match self.single_arg(ann, symbol, diagnostics) {
                Some(inner) => {
                    let resolved = self.resolve_expr(inner, symbol, diagnostics);
                    match resolved {
                        // optional[optional[T]] collapses to optional[T]
                        TypeExpr::Optional { .. } => resolved,
                        other => TypeExpr::optional(other),
                    }
                }
                None => TypeExpr::Dynamic,
            },
            Some(TypeKeyword::List) => match self.single_arg(ann, symbol, diagnostics) {
                Some(inner) => TypeExpr::list_of(self.resolve_expr(inner, symbol, diagnostics)),
                None => TypeExpr::Dynamic,
            },
            Some(TypeKeyword::Set) => match self.single_arg(ann, symbol, diagnostics) {
                Some(inner) => TypeExpr::set_of(self.resolve_expr(inner, symbol, diagnostics)),
                None => TypeExpr::Dynamic,
            },
            Some(TypeKeyword::Dict) => {
                if ann.args.len() != 2 {
                    diagnostics.push(Diagnostic::unsupported_type(
                        ann.span,
                        symbol,
                        format!(
                            "`{}` takes exactly 2 type parameters, found {} in `{}`",
                            ann.name,
                            ann.args.len(),
                            ann.render()
                        ),
                    ));
                    return TypeExpr::Dynamic;
                }
                let key = self.resolve_expr(&ann.args[0], symbol, diagnostics);
                let value = self.resolve_expr(&ann.args[1], symbol, diagnostics);
                TypeExpr::dict_of(key, value)
            }
            None => {
                if !ann.args.is_empty() {
                    diagnostics.push(Diagnostic::unsupported_type(
                        ann.span,
                        symbol,
                        format!("Type `{}` does not take type parameters", ann.render()),
                    ));
                    TypeExpr::Dynamic
                } else if self.table.contains(&ann.name) {
                    TypeExpr::record_ref(ann.name.clone())
                } else if looks_like_record(&ann.name) {
                    diagnostics.push(Diagnostic::ambiguous_reference(
                        ann.span,
                        symbol,
                        format!(
                            "Unknown record type `{}`; no record with this name is declared in this module",
                            ann.name
                        ),
                    ));
                    TypeExpr::Dynamic
                } else {
                    diagnostics.push(Diagnostic::unsupported_type(
                        ann.span,
                        symbol,
                        format!(
                            "Unknown type `{}`; not a recognized keyword or declared record",
                            ann.render()
                        ),
                    ));
                    TypeExpr::Dynamic
                }
            }
        }
    }

    /// Resolve every record declaration into a descriptor, field by field
    pub fn resolve_records(
        &self,
        records: &[RecordDecl],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<RecordDescriptor> {
        records
            .iter()
            .enumerate()
            .map(|(order, record)| {
                let fields = record
                    .fields
                    .iter()
                    .map(|field| FieldDescriptor {
                        name: field.name.clone(),
                        ty: self.resolve(&field.ty, Position::Field, &record.name, diagnostics),
                        span: field.span,
                    })
                    .collect();

                RecordDescriptor {
                    name: record.name.clone(),
                    fields,
                    declaration_order: order,
                    name_span: record.name_span,
                }
            })
            .collect()
    }

    fn plain(
        &self,
        ann: &TypeAnn,
        ty: TypeExpr,
        symbol: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TypeExpr {
        if ann.args.is_empty() {
            ty
        } else {
            diagnostics.push(Diagnostic::unsupported_type(
                ann.span,
                symbol,
                format!("Type `{}` does not take type parameters", ann.render()),
            ));
            TypeExpr::Dynamic
        }
    }

    fn single_arg<'b>(
        &self,
        ann: &'b TypeAnn,
        symbol: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&'b TypeAnn> {
        if ann.args.len() == 1 {
            Some(&ann.args[0])
        } else {
            diagnostics.push(Diagnostic::unsupported_type(
                ann.span,
                symbol,
                format!(
                    "`{}` takes exactly 1 type parameter, found {} in `{}`",
                    ann.name,
                    ann.args.len(),
                    ann.render()
                ),
            ));
            None
        }
    }
}

/// Record naming convention: an initial uppercase letter. Unresolved names
/// that follow it read as references to a record that was never declared.
fn looks_like_record(name: &str) -> bool {
    name.chars().next().map(char::is_uppercase).unwrap_or(false)
}
