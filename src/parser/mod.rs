//! PEST-based parser for plugin source modules.
//!
//! Produces the raw declaration AST consumed by the resolver and extractor,
//! with span information for error reporting. Action bodies are treated as
//! opaque text; only the leading string literal survives as the docstring.

use pest::Parser;
use pest_derive::Parser;

use crate::ast::{
    ActionDecl, Decorator, DecoratorArg, FieldDecl, ModuleDef, ParamDecl, RecordDecl, Span, TypeAnn,
};


/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "parser/plugin.pest"]
struct PluginParser;

/* ===================== Error Types ===================== */

#[derive(Debug)]
pub enum ParseError {
    PestError(String, Option<Span>),
    BuildError(String, Option<Span>),
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::PestError(_, span) => *span,
            ParseError::BuildError(_, span) => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::PestError(msg, _) => msg,
            ParseError::BuildError(msg, _) => msg,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::PestError(msg, _) => write!(f, "{}", msg),
            ParseError::BuildError(msg, _) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let span = match err.line_col {
            pest::error::LineColLocation::Pos((line, col)) => Some(Span {
                start: 0,
                end: 0,
                start_line: line.saturating_sub(1),
                start_col: col.saturating_sub(1),
                end_line: line.saturating_sub(1),
                end_col: col,
            }),
            pest::error::LineColLocation::Span((start_line, start_col), (end_line, end_col)) => {
                Some(Span {
                    start: 0,
                    end: 0,
                    start_line: start_line.saturating_sub(1),
                    start_col: start_col.saturating_sub(1),
                    end_line: end_line.saturating_sub(1),
                    end_col: end_col.saturating_sub(1),
                })
            }
        };
        ParseError::PestError(err.to_string(), span)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Span Helpers ===================== */

/// Convert a PEST pair's span to our Span type
fn pair_to_span(pair: &pest::iterators::Pair<Rule>, source: &str) -> Span {
    let pest_span = pair.as_span();
    let start = pest_span.start();
    let end = pest_span.end();

    let (start_line, start_col) = offset_to_line_col(source, start);
    let (end_line, end_col) = offset_to_line_col(source, end);

    Span::new(start, end, start_line, start_col, end_line, end_col)
}

/// Convert byte offset to (line, column) - 0-indexed
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    let mut current_offset = 0;

    for ch in source.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

/* ===================== Public API ===================== */

/// Parse plugin source text into a module of record and action declarations
pub fn parse_module(source: &str) -> ParseResult<ModuleDef> {
    let mut pairs = PluginParser::parse(Rule::module, source)?;

    let module = pairs.next().unwrap();
    let module_span = pair_to_span(&module, source);

    let mut records = Vec::new();
    let mut actions = Vec::new();

    for pair in module.into_inner() {
        match pair.as_rule() {
            Rule::record_decl => records.push(build_record(pair, source)?),
            Rule::action_decl => actions.push(build_action(pair, source)?),
            Rule::EOI => {}
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected module content: {:?}", pair.as_rule()),
                    Some(module_span),
                ))
            }
        }
    }

    Ok(ModuleDef {
        records,
        actions,
        span: module_span,
    })
}

/* ===================== AST Builder ===================== */

fn build_record(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<RecordDecl> {
    let span = pair_to_span(&pair, source);
    let mut decorators = Vec::new();
    let mut name = String::new();
    let mut name_span = Span::default();
    let mut fields = Vec::new();

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::decorator => decorators.push(build_decorator(pair, source)?),
            Rule::kw_record => {}
            Rule::identifier => {
                name_span = pair_to_span(&pair, source);
                name = pair.as_str().to_string();
            }
            Rule::field => fields.push(build_field(pair, source)?),
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected record content: {:?}", pair.as_rule()),
                    Some(span),
                ))
            }
        }
    }

    Ok(RecordDecl {
        name,
        name_span,
        fields,
        decorators,
        span,
    })
}

fn build_field(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<FieldDecl> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().unwrap();
    let ty_pair = inner.next().unwrap();

    Ok(FieldDecl {
        name: name_pair.as_str().to_string(),
        ty: build_type_ann(ty_pair, source)?,
        span,
    })
}

fn build_action(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<ActionDecl> {
    let span = pair_to_span(&pair, source);
    let mut decorators = Vec::new();
    let mut name = String::new();
    let mut name_span = Span::default();
    let mut params = Vec::new();
    let mut return_ann = None;
    let mut is_async = false;
    let mut docstring = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::decorator => decorators.push(build_decorator(pair, source)?),
            Rule::kw_async => is_async = true,
            Rule::kw_action => {}
            Rule::identifier => {
                name_span = pair_to_span(&pair, source);
                name = pair.as_str().to_string();
            }
            Rule::param => params.push(build_param(pair, source)?),
            Rule::type_ann => return_ann = Some(build_type_ann(pair, source)?),
            Rule::body => docstring = build_docstring(pair),
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected action content: {:?}", pair.as_rule()),
                    Some(span),
                ))
            }
        }
    }

    Ok(ActionDecl {
        name,
        name_span,
        params,
        return_ann,
        is_async,
        docstring,
        decorators,
        span,
    })
}

fn build_param(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<ParamDecl> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().unwrap();
    let name = name_pair.as_str().to_string();

    let mut ty = None;
    let mut default = None;
    for pair in inner {
        match pair.as_rule() {
            Rule::type_ann => ty = Some(build_type_ann(pair, source)?),
            Rule::default_value => default = Some(pair.as_str().trim().to_string()),
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected parameter content: {:?}", pair.as_rule()),
                    Some(span),
                ))
            }
        }
    }

    Ok(ParamDecl {
        name,
        ty,
        default,
        span,
    })
}

fn build_decorator(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<Decorator> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().unwrap();
    let name = name_pair.as_str().to_string();

    let mut args = Vec::new();
    for pair in inner {
        match pair.as_rule() {
            Rule::triple_string | Rule::quoted_string | Rule::single_quoted => {
                args.push(DecoratorArg::Str(string_content(pair)));
            }
            Rule::number | Rule::boolean | Rule::identifier => {
                args.push(DecoratorArg::Raw(pair.as_str().to_string()));
            }
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected decorator content: {:?}", pair.as_rule()),
                    Some(span),
                ))
            }
        }
    }

    Ok(Decorator { name, args, span })
}

fn build_type_ann(pair: pest::iterators::Pair<Rule>, source: &str) -> ParseResult<TypeAnn> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().unwrap();
    let name = name_pair.as_str().to_string();

    let args: Result<Vec<TypeAnn>, ParseError> =
        inner.map(|arg| build_type_ann(arg, source)).collect();

    Ok(TypeAnn {
        name,
        args: args?,
        span,
    })
}

/// Pull the leading string literal out of an action body, if present
fn build_docstring(pair: pest::iterators::Pair<Rule>) -> Option<String> {
    let inner = pair.into_inner().next()?;
    match inner.as_rule() {
        Rule::triple_string | Rule::quoted_string | Rule::single_quoted => {
            Some(string_content(inner))
        }
        _ => None,
    }
}

/// Content of a string literal pair, without the surrounding quotes
fn string_content(pair: pest::iterators::Pair<Rule>) -> String {
    match pair.into_inner().next() {
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    }
}
