//! JavaScript entity extraction via regex heuristics.
//!
//! Pattern-based, not a parse: `function <name>(`, `class <name>`,
//! `import ... from '<module>'`, and `var|let|const <name>` declarations.
//! Destructuring, arrow functions, and dynamic imports are out of scope.

use regex::Regex;

use super::CodeEntities;

/// Extract functions, classes, imports, and variables from JavaScript source.
pub fn extract(text: &str) -> CodeEntities {
    let function_re = Regex::new(r"function\s+(\w+)\s*\(").expect("Invalid regex");
    let class_re = Regex::new(r"class\s+(\w+)").expect("Invalid regex");
    let import_re =
        Regex::new(r#"import\s+.*\s+from\s+['"]([\w\-/]+)['"]"#).expect("Invalid regex");
    let variable_re = Regex::new(r"\b(?:var|let|const)\s+(\w+)").expect("Invalid regex");

    let capture_all = |re: &Regex| -> Vec<String> {
        re.captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    };

    CodeEntities {
        functions: capture_all(&function_re),
        classes: capture_all(&class_re),
        imports: capture_all(&import_re),
        variables: capture_all(&variable_re),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_functions() {
        let code = r#"
function renderPage(props) {}
function  handleClick (event) {}
"#;
        let entities = extract(code);
        assert_eq!(entities.functions, vec!["renderPage", "handleClick"]);
    }

    #[test]
    fn test_extract_classes() {
        let code = "class ApiClient extends Base {}\nclass Widget {}";
        let entities = extract(code);
        assert_eq!(entities.classes, vec!["ApiClient", "Widget"]);
    }

    #[test]
    fn test_extract_imports() {
        let code = r#"
import React from 'react';
import { render } from "react-dom/client";
"#;
        let entities = extract(code);
        assert_eq!(entities.imports, vec!["react", "react-dom/client"]);
    }

    #[test]
    fn test_extract_variable_declarations() {
        let code = "var a = 1;\nlet count = 2;\nconst NAME = 'x';";
        let entities = extract(code);
        assert_eq!(entities.variables, vec!["a", "count", "NAME"]);
    }

    #[test]
    fn test_arrow_functions_are_not_functions() {
        // Deliberate approximation: arrow functions only surface as the
        // variable they are bound to.
        let code = "const add = (a, b) => a + b;";
        let entities = extract(code);
        assert!(entities.functions.is_empty());
        assert_eq!(entities.variables, vec!["add"]);
    }

    #[test]
    fn test_malformed_source_still_extracts() {
        let code = "function ok() { class Broken \n let x = ;;;";
        let entities = extract(code);
        assert_eq!(entities.functions, vec!["ok"]);
        assert_eq!(entities.classes, vec!["Broken"]);
        assert_eq!(entities.variables, vec!["x"]);
    }
}
