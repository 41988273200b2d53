//! Selects exported actions and assembles their descriptors.
//!
//! Record declarations never reach this stage as action candidates; the
//! parser already separates them. Declarations named with the exclusion
//! prefix are skipped before any of their annotations are resolved, so a
//! hidden helper with exotic types cannot fail the submission.

use std::collections::HashMap;

use tracing::trace;

use crate::ast::{ActionDecl, DecoratorArg, Span};
use crate::catalog::{ActionDescriptor, ParameterDescriptor};
use crate::diagnostics::Diagnostic;
use crate::resolver::{Position, Resolver};
use crate::types::TypeExpr;

/// Build an `ActionDescriptor` for every exported declaration.
///
/// Descriptors are produced even when their annotations failed to resolve
/// (with `Dynamic` placeholders); the pipeline only assembles a schema once
/// the diagnostic list is empty.
pub fn extract_actions(
    actions: &[ActionDecl],
    resolver: &Resolver,
    exclusion_prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ActionDescriptor> {
    let mut seen: HashMap<String, Span> = HashMap::new();
    let mut descriptors = Vec::new();

    for decl in actions {
        // An empty prefix disables exclusion entirely
        if !exclusion_prefix.is_empty() && decl.name.starts_with(exclusion_prefix) {
            trace!(action = %decl.name, "Skipping excluded declaration");
            continue;
        }

        match seen.get(&decl.name) {
            Some(first) => {
                diagnostics.push(Diagnostic::duplicate_name(
                    decl.name_span,
                    decl.name.clone(),
                    format!(
                        "Action `{}` is already declared on line {}",
                        decl.name,
                        first.start_line + 1
                    ),
                ));
            }
            None => {
                seen.insert(decl.name.clone(), decl.name_span);
            }
        }

        descriptors.push(build_descriptor(decl, resolver, diagnostics));
    }

    descriptors
}

fn build_descriptor(
    decl: &ActionDecl,
    resolver: &Resolver,
    diagnostics: &mut Vec<Diagnostic>,
) -> ActionDescriptor {
    let mut param_seen: HashMap<&str, Span> = HashMap::new();
    let mut parameters = Vec::new();

    for param in &decl.params {
        if param_seen.contains_key(param.name.as_str()) {
            diagnostics.push(Diagnostic::duplicate_name(
                param.span,
                format!("{}.{}", decl.name, param.name),
                format!("Parameter `{}` is declared more than once", param.name),
            ));
        } else {
            param_seen.insert(param.name.as_str(), param.span);
        }

        let ty = match &param.ty {
            Some(ann) => resolver.resolve(ann, Position::Parameter, &decl.name, diagnostics),
            None => {
                diagnostics.push(Diagnostic::unsupported_type(
                    param.span,
                    decl.name.clone(),
                    format!("Parameter `{}` has no type annotation", param.name),
                ));
                TypeExpr::Dynamic
            }
        };

        parameters.push(ParameterDescriptor {
            name: param.name.clone(),
            ty,
            default: param.default.clone(),
            span: param.span,
        });
    }

    let return_type = match &decl.return_ann {
        Some(ann) => resolver.resolve(ann, Position::Return, &decl.name, diagnostics),
        None => TypeExpr::NoneType,
    };

    // Verbatim content, trimmed; an all-whitespace literal counts as absent
    let docstring = decl
        .docstring
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    // First string literal wins; non-string arguments are skipped
    let purpose = decl
        .decorators
        .iter()
        .filter(|d| d.name == "purpose")
        .flat_map(|d| d.args.iter())
        .find_map(|arg| match arg {
            DecoratorArg::Str(text) => Some(text.clone()),
            DecoratorArg::Raw(_) => None,
        });

    ActionDescriptor {
        name: decl.name.clone(),
        parameters,
        return_type,
        is_suspending: decl.is_async,
        docstring,
        purpose,
        name_span: decl.name_span,
    }
}
