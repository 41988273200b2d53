//! Static configuration for schema extraction.
//!
//! Both knobs are supplied up front when the extractor is built, never per
//! call: the exclusion-marker prefix that hides a declaration from export,
//! and the closed table of recognized type keywords.
//!
//! # Example
//!
//! ```rust
//! use callsheet_core::options::{ExtractOptions, TypeKeyword, TypeKeywords};
//!
//! let options = ExtractOptions::new()
//!     .exclusion_prefix("__")
//!     .keywords(TypeKeywords::default().alias("Optional", TypeKeyword::Optional));
//! ```

use std::collections::HashMap;

/// Role a recognized keyword plays in the type grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Bool,
    Int,
    Float,
    Complex,
    Str,
    DateTime,
    Dynamic,
    NoneType,
    List,
    Set,
    Dict,
    Optional,
}

/// The closed keyword table consulted by the type resolver.
///
/// Defaults cover the canonical spellings; `alias` admits alternate ones for
/// hosts that accept, say, `List` next to `list`.
#[derive(Debug, Clone)]
pub struct TypeKeywords {
    map: HashMap<String, TypeKeyword>,
}

impl Default for TypeKeywords {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("bool".to_string(), TypeKeyword::Bool);
        map.insert("int".to_string(), TypeKeyword::Int);
        map.insert("float".to_string(), TypeKeyword::Float);
        map.insert("complex".to_string(), TypeKeyword::Complex);
        map.insert("str".to_string(), TypeKeyword::Str);
        map.insert("datetime".to_string(), TypeKeyword::DateTime);
        map.insert("any".to_string(), TypeKeyword::Dynamic);
        map.insert("none".to_string(), TypeKeyword::NoneType);
        map.insert("list".to_string(), TypeKeyword::List);
        map.insert("set".to_string(), TypeKeyword::Set);
        map.insert("dict".to_string(), TypeKeyword::Dict);
        map.insert("optional".to_string(), TypeKeyword::Optional);
        Self { map }
    }
}

impl TypeKeywords {
    /// Create the default keyword table
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an alternate spelling for a keyword role
    pub fn alias(mut self, name: impl Into<String>, role: TypeKeyword) -> Self {
        self.map.insert(name.into(), role);
        self
    }

    /// Look up the role of a name, if it is a recognized keyword
    pub fn lookup(&self, name: &str) -> Option<TypeKeyword> {
        self.map.get(name).copied()
    }
}

/// Options for schema extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Prefix hiding a top-level declaration from export
    pub exclusion_prefix: String,

    /// The closed set of recognized type keywords
    pub keywords: TypeKeywords,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            exclusion_prefix: "_".to_string(),
            keywords: TypeKeywords::default(),
        }
    }
}

impl ExtractOptions {
    /// Create options with the default marker (`_`) and keyword table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion-marker prefix
    pub fn exclusion_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclusion_prefix = prefix.into();
        self
    }

    /// Replace the keyword table
    pub fn keywords(mut self, keywords: TypeKeywords) -> Self {
        self.keywords = keywords;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keyword_roles() {
        let keywords = TypeKeywords::default();

        assert_eq!(keywords.lookup("str"), Some(TypeKeyword::Str));
        assert_eq!(keywords.lookup("datetime"), Some(TypeKeyword::DateTime));
        assert_eq!(keywords.lookup("any"), Some(TypeKeyword::Dynamic));
        assert_eq!(keywords.lookup("optional"), Some(TypeKeyword::Optional));
        assert_eq!(keywords.lookup("Newspaper"), None);
    }

    #[test]
    fn test_alias_admits_alternate_spelling() {
        let keywords = TypeKeywords::default()
            .alias("List", TypeKeyword::List)
            .alias("Any", TypeKeyword::Dynamic);

        assert_eq!(keywords.lookup("List"), Some(TypeKeyword::List));
        assert_eq!(keywords.lookup("Any"), Some(TypeKeyword::Dynamic));
        // Canonical spellings stay recognized
        assert_eq!(keywords.lookup("list"), Some(TypeKeyword::List));
    }

    #[test]
    fn test_options_builder_setters() {
        let options = ExtractOptions::new().exclusion_prefix("__");

        assert_eq!(options.exclusion_prefix, "__");
        assert!(options.keywords.lookup("int").is_some());
    }
}
