//! Language-specific entity extraction.
//!
//! One extractor per recognized source kind:
//!
//! | Kind | Extension | Strategy | Entities |
//! |------|-----------|----------|----------|
//! | Python | `.py` | full syntactic parse (tree-sitter) | functions, classes, imports, variables |
//! | JavaScript | `.js` | regex heuristics | functions, classes, imports, variables |
//! | Stylesheet | `.css` | regex heuristics | class selectors, id selectors |
//!
//! Files with any other extension are still recorded as File nodes by the
//! build pipeline but contribute no further entities.
//!
//! The JavaScript and stylesheet extractors are deliberately approximate:
//! they tolerate syntactic variation at the cost of some false positives
//! and negatives, and make no attempt at destructuring, arrow functions, or
//! dynamic imports.

use std::path::Path;

use thiserror::Error;

pub mod javascript;
pub mod python;
pub mod stylesheet;

// ============================================================================
// SourceKind
// ============================================================================

/// The closed set of recognized source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Python source, parsed with a full grammar.
    Python,
    /// JavaScript source, pattern-matched.
    JavaScript,
    /// CSS stylesheet, pattern-matched.
    Stylesheet,
    /// Anything else; contributes no entities.
    Unknown,
}

impl SourceKind {
    /// Human-readable name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Python => "Python",
            SourceKind::JavaScript => "JavaScript",
            SourceKind::Stylesheet => "Stylesheet",
            SourceKind::Unknown => "Unknown",
        }
    }
}

/// Classify a file by its extension.
pub fn kind_for_path(path: &str) -> SourceKind {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("py") => SourceKind::Python,
        Some(ext) if ext.eq_ignore_ascii_case("js") => SourceKind::JavaScript,
        Some(ext) if ext.eq_ignore_ascii_case("css") => SourceKind::Stylesheet,
        _ => SourceKind::Unknown,
    }
}

// ============================================================================
// Extraction results
// ============================================================================

/// Entity names extracted from a code file.
///
/// Lists preserve occurrence order and may contain duplicates; the graph
/// store collapses them on upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEntities {
    /// Function definition names.
    pub functions: Vec<String>,
    /// Class definition names.
    pub classes: Vec<String>,
    /// Imported module names.
    pub imports: Vec<String>,
    /// Variable binding names.
    pub variables: Vec<String>,
}

/// Selector names extracted from a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleEntities {
    /// Class selector names, without the leading `.`.
    pub classes: Vec<String>,
    /// Id selector names, without the leading `#`.
    pub ids: Vec<String>,
}

/// The outcome of extracting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Entities from a code file.
    Code(CodeEntities),
    /// Selectors from a stylesheet.
    Style(StyleEntities),
    /// Unrecognized kind; nothing extracted.
    None,
}

// ============================================================================
// ExtractError
// ============================================================================

/// A file-scoped extraction failure.
///
/// Extraction errors never abort the repository walk; the build pipeline
/// records them as warnings and keeps the File node.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source does not parse under the language grammar.
    #[error("syntax error: {message}")]
    Syntax {
        /// Description of the first problem found.
        message: String,
    },

    /// The parser itself could not run.
    #[error("parser failure: {message}")]
    Parser {
        /// Description of the failure.
        message: String,
    },
}

// ============================================================================
// Dispatch
// ============================================================================

/// Extract entities from file content according to its kind.
///
/// A parse failure is returned as an error with no partial lists.
pub fn extract(kind: SourceKind, text: &str) -> Result<Extraction, ExtractError> {
    match kind {
        SourceKind::Python => Ok(Extraction::Code(python::extract(text)?)),
        SourceKind::JavaScript => Ok(Extraction::Code(javascript::extract(text))),
        SourceKind::Stylesheet => Ok(Extraction::Style(stylesheet::extract(text))),
        SourceKind::Unknown => Ok(Extraction::None),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_path() {
        assert_eq!(kind_for_path("src/util.py"), SourceKind::Python);
        assert_eq!(kind_for_path("app/main.js"), SourceKind::JavaScript);
        assert_eq!(kind_for_path("styles/site.css"), SourceKind::Stylesheet);
        assert_eq!(kind_for_path("README.md"), SourceKind::Unknown);
        assert_eq!(kind_for_path("noextension"), SourceKind::Unknown);
        assert_eq!(kind_for_path("shouty.PY"), SourceKind::Python);
    }

    #[test]
    fn test_unknown_kind_extracts_nothing() {
        let result = extract(SourceKind::Unknown, "def foo(): pass").unwrap();
        assert_eq!(result, Extraction::None);
    }

    #[test]
    fn test_dispatch_python() {
        let result = extract(SourceKind::Python, "def foo(): pass\n").unwrap();
        match result {
            Extraction::Code(code) => assert_eq!(code.functions, vec!["foo"]),
            other => panic!("expected code extraction, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_stylesheet() {
        let result = extract(SourceKind::Stylesheet, ".btn { color: red; }").unwrap();
        match result {
            Extraction::Style(style) => assert_eq!(style.classes, vec!["btn"]),
            other => panic!("expected style extraction, got {:?}", other),
        }
    }
}
