//! Engine filter XML emission.
//!
//! The dialect is small: a `<filter>` root whose direct children are ANDed,
//! `<and>`/`<or>`/`<not>` combinators, and the four leaf tags from the
//! property registry (`<test>`, `<cat>`, `<name>`, `<prop name='…'>`), each
//! optionally carrying `re='1'` for regex matching.

use crate::ast::FilterNode;

/// The empty filter document: selects every test.
pub const EMPTY_FILTER: &str = "<filter/>";

/// Serialize a filter tree into a complete `<filter>` document.
pub fn to_filter_xml(node: &FilterNode) -> String {
    format!("<filter>{}</filter>", node.to_fragment())
}

impl FilterNode {
    /// Serialize this tree as a filter fragment (no `<filter>` wrapper).
    pub fn to_fragment(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            FilterNode::And(children) => write_group(out, "and", children),
            FilterNode::Or(children) => write_group(out, "or", children),
            FilterNode::Not(child) => {
                out.push_str("<not>");
                child.write(out);
                out.push_str("</not>");
            }
            FilterNode::Category { value, regex } => write_leaf(out, "cat", None, *regex, value),
            FilterNode::Property { name, value, regex } => {
                write_leaf(out, "prop", Some(name), *regex, value)
            }
            FilterNode::Name { value, regex } => write_leaf(out, "name", None, *regex, value),
            FilterNode::FullName { value, regex } => write_leaf(out, "test", None, *regex, value),
        }
    }
}

/// A lone child is emitted unwrapped; only real conjunctions/disjunctions
/// get a combinator element.
fn write_group(out: &mut String, tag: &str, children: &[FilterNode]) {
    match children {
        [] => {}
        [only] => only.write(out),
        _ => {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            for child in children {
                child.write(out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn write_leaf(out: &mut String, tag: &str, name_attr: Option<&str>, regex: bool, value: &str) {
    out.push('<');
    out.push_str(tag);
    if let Some(name) = name_attr {
        out.push_str(" name='");
        out.push_str(&xml_escape(name));
        out.push('\'');
    }
    if regex {
        out.push_str(" re='1'");
    }
    out.push('>');
    out.push_str(&xml_escape(value));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Escape the five XML-special characters. `&` must go first.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Backslash-escape regex metacharacters so a literal value can be embedded
/// in a regex leaf. Applied before entity escaping.
pub fn regex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '.' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '|' | '^' | '$' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(value: &str) -> FilterNode {
        FilterNode::Category {
            value: value.into(),
            regex: false,
        }
    }

    #[test]
    fn test_single_leaf_unwrapped() {
        assert_eq!(to_filter_xml(&cat("Urgent")), "<filter><cat>Urgent</cat></filter>");
    }

    #[test]
    fn test_or_wrapping() {
        let node = FilterNode::Or(vec![cat("Urgent"), cat("High")]);
        assert_eq!(
            to_filter_xml(&node),
            "<filter><or><cat>Urgent</cat><cat>High</cat></or></filter>"
        );
    }

    #[test]
    fn test_single_child_group_collapses() {
        let node = FilterNode::And(vec![cat("Only")]);
        assert_eq!(node.to_fragment(), "<cat>Only</cat>");
    }

    #[test]
    fn test_prop_leaf_with_regex() {
        let node = FilterNode::Property {
            name: "Priority".into(),
            value: "2".into(),
            regex: true,
        };
        assert_eq!(node.to_fragment(), "<prop name='Priority' re='1'>2</prop>");
    }

    #[test]
    fn test_not_wrapping() {
        let node = FilterNode::Not(Box::new(FilterNode::FullName {
            value: "My.Tests".into(),
            regex: false,
        }));
        assert_eq!(node.to_fragment(), "<not><test>My.Tests</test></not>");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape(r#"a&b<c>d"e'f"#),
            "a&amp;b&lt;c&gt;d&quot;e&apos;f"
        );
        // No double escaping of the introduced ampersands.
        assert_eq!(xml_escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape("Method(42)"), r"Method\(42\)");
        assert_eq!(regex_escape(r"a.b[c]{d}*+?|^$\e"), r"a\.b\[c\]\{d\}\*\+\?\|\^\$\\e");
    }

    #[test]
    fn test_escaped_value_in_leaf() {
        let node = FilterNode::FullName {
            value: r#"Test("x & y")"#.into(),
            regex: false,
        };
        assert_eq!(
            node.to_fragment(),
            "<test>Test(&quot;x &amp; y&quot;)</test>"
        );
    }
}
