//! Python entity extraction via a full syntactic parse.
//!
//! Walks the entire tree-sitter parse tree (nested scopes included) and
//! collects:
//! - `def` names, including `async def` and methods
//! - `class` names
//! - imported module names: each dotted name of a plain `import`, and the
//!   source module of a `from ... import ...`
//! - simple-assignment targets, including every identifier bound by a
//!   tuple-unpacking left side; annotated assignments are treated like
//!   plain ones (the annotation is ignored); augmented assignments are not
//!   bindings and are skipped
//!
//! A file whose parse tree contains any syntax error contributes nothing:
//! the caller records the failure and keeps only the File node.

use tree_sitter::{Node, Parser};

use super::{CodeEntities, ExtractError};

/// Extract functions, classes, imports, and variables from Python source.
pub fn extract(text: &str) -> Result<CodeEntities, ExtractError> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ExtractError::Parser {
            message: e.to_string(),
        })?;

    let tree = parser.parse(text, None).ok_or_else(|| ExtractError::Parser {
        message: "parser produced no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ExtractError::Syntax {
            message: first_error_location(root),
        });
    }

    let mut entities = CodeEntities::default();
    visit(root, text, &mut entities);
    Ok(entities)
}

/// Recursive walk over every named node, like an AST visitor.
fn visit(node: Node, src: &str, out: &mut CodeEntities) {
    match node.kind() {
        "function_definition" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.functions.push(node_text(src, name));
            }
        }
        "class_definition" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.classes.push(node_text(src, name));
            }
        }
        "import_statement" => collect_plain_imports(node, src, out),
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                out.imports.push(node_text(src, module));
            }
        }
        "assignment" => collect_assignment_targets(node, src, out),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, src, out);
    }
}

/// `import a.b, c as d` contributes "a.b" and "c".
fn collect_plain_imports(node: Node, src: &str, out: &mut CodeEntities) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => out.imports.push(node_text(src, child)),
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    out.imports.push(node_text(src, name));
                }
            }
            _ => {}
        }
    }
}

/// Simple and annotated assignments; each bound identifier is one variable.
fn collect_assignment_targets(node: Node, src: &str, out: &mut CodeEntities) {
    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    match left.kind() {
        "identifier" => out.variables.push(node_text(src, left)),
        "pattern_list" | "tuple_pattern" => {
            let mut cursor = left.walk();
            for target in left.named_children(&mut cursor) {
                if target.kind() == "identifier" {
                    out.variables.push(node_text(src, target));
                }
            }
        }
        _ => {}
    }
}

fn node_text(src: &str, node: Node) -> String {
    src[node.byte_range()].to_string()
}

/// Describe where the first error node sits, for the warning message.
fn first_error_location(root: Node) -> String {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return format!("line {}, column {}", pos.row + 1, pos.column + 1);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push(child);
        }
    }
    "unknown location".to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_functions_and_variables() {
        let code = "def foo(): pass\nx = 1\n";
        let entities = extract(code).unwrap();

        assert_eq!(entities.functions, vec!["foo"]);
        assert_eq!(entities.variables, vec!["x"]);
        assert!(entities.classes.is_empty());
        assert!(entities.imports.is_empty());
    }

    #[test]
    fn test_extract_classes_and_methods() {
        let code = r#"
class UserService:
    def get_user(self, user_id):
        return self.db.get(user_id)

async def fetch(url):
    pass
"#;
        let entities = extract(code).unwrap();

        assert_eq!(entities.classes, vec!["UserService"]);
        assert_eq!(entities.functions, vec!["get_user", "fetch"]);
    }

    #[test]
    fn test_plain_import_flattens_multi_names() {
        let code = "import os, sys\nimport a.b\nimport numpy as np\n";
        let entities = extract(code).unwrap();

        assert_eq!(entities.imports, vec!["os", "sys", "a.b", "numpy"]);
    }

    #[test]
    fn test_from_import_contributes_module_name() {
        let code = "import util\nfrom util import helper\n";
        let entities = extract(code).unwrap();

        // Both forms name the module; the graph collapses them to one node.
        assert_eq!(entities.imports, vec!["util", "util"]);
    }

    #[test]
    fn test_tuple_unpacking_targets() {
        let code = "a, b = 1, 2\n";
        let entities = extract(code).unwrap();
        assert_eq!(entities.variables, vec!["a", "b"]);
    }

    #[test]
    fn test_annotated_assignment() {
        let code = "y: int = 3\n";
        let entities = extract(code).unwrap();
        assert_eq!(entities.variables, vec!["y"]);
    }

    #[test]
    fn test_augmented_assignment_is_not_a_binding() {
        let code = "x = 1\nx += 2\n";
        let entities = extract(code).unwrap();
        assert_eq!(entities.variables, vec!["x"]);
    }

    #[test]
    fn test_nested_assignments_are_collected() {
        let code = r#"
def configure():
    retries = 3
    host, port = "localhost", 8080
"#;
        let entities = extract(code).unwrap();
        assert_eq!(entities.variables, vec!["retries", "host", "port"]);
    }

    #[test]
    fn test_attribute_targets_are_skipped() {
        let code = "self.x = 1\nobj.attr = 2\nplain = 3\n";
        let entities = extract(code).unwrap();
        assert_eq!(entities.variables, vec!["plain"]);
    }

    #[test]
    fn test_syntax_error_is_rejected_whole() {
        let code = "def broken(:\n    pass\n";
        let err = extract(code).unwrap_err();
        assert!(matches!(err, ExtractError::Syntax { .. }));
    }
}
