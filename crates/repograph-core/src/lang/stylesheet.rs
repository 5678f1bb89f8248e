//! Stylesheet selector extraction via regex heuristics.
//!
//! Collects `.<identifier>` class selectors and `#<identifier>` id
//! selectors anywhere in the text, without distinguishing declaration from
//! usage.

use regex::Regex;

use super::StyleEntities;

/// Extract class and id selector names from CSS text.
pub fn extract(text: &str) -> StyleEntities {
    let class_re = Regex::new(r"\.(\w+)").expect("Invalid regex");
    let id_re = Regex::new(r"#(\w+)").expect("Invalid regex");

    let capture_all = |re: &Regex| -> Vec<String> {
        re.captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    };

    StyleEntities {
        classes: capture_all(&class_re),
        ids: capture_all(&id_re),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_classes_and_ids() {
        let css = r#"
.btn { padding: 1rem; }
.sidebar { width: 240px; }
#header { height: 60px; }
"#;
        let entities = extract(css);
        assert_eq!(entities.classes, vec!["btn", "sidebar"]);
        assert_eq!(entities.ids, vec!["header"]);
    }

    #[test]
    fn test_word_boundary_stops_at_hyphen() {
        // `\w` excludes `-`, so a hyphenated selector contributes its
        // leading word only.
        let entities = extract(".btn-primary { }");
        assert_eq!(entities.classes, vec!["btn"]);
    }

    #[test]
    fn test_selectors_inside_rules_are_also_matched() {
        // Usage vs declaration is not distinguished.
        let css = ".a .b { } div#main > .c { }";
        let entities = extract(css);
        assert_eq!(entities.classes, vec!["a", "b", "c"]);
        assert_eq!(entities.ids, vec!["main"]);
    }

    #[test]
    fn test_empty_stylesheet() {
        let entities = extract("");
        assert!(entities.classes.is_empty());
        assert!(entities.ids.is_empty());
    }
}
