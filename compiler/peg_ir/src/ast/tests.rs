use super::*;
use pretty_assertions::assert_eq;

fn sample() -> AstNode {
    AstNode::nodes(
        "doc",
        vec![
            AstNode::text("head1", "# Title"),
            AstNode::nodes(
                "parag",
                vec![
                    AstNode::text("strings", "Sample"),
                    AstNode::text("breakline", "\n"),
                ],
            ),
        ],
    )
}

#[test]
fn test_leaf_accessors() {
    let node = AstNode::text("number", "42");
    assert_eq!(node.name(), "number");
    assert_eq!(node.as_text(), Some("42"));
    assert!(node.children().is_empty());
    assert!(!node.is_empty());
}

#[test]
fn test_structured_accessors() {
    let node = sample();
    assert_eq!(node.as_text(), None);
    assert_eq!(node.children().len(), 2);
    assert_eq!(node.children()[1].name(), "parag");
}

#[test]
fn test_flatten_concatenates_in_order() {
    assert_eq!(sample().flatten(), "# TitleSample\n");
}

#[test]
fn test_flatten_is_idempotent() {
    let once = AstNode::text("doc", sample().flatten());
    let twice = AstNode::text("doc", once.flatten());
    assert_eq!(once, twice);
}

#[test]
fn test_empty_values() {
    assert!(AstNode::text("opt", "").is_empty());
    assert!(AstNode::nodes("opt", vec![]).is_empty());
    assert_eq!(AstNode::nodes("opt", vec![]).flatten(), "");
}

#[test]
fn test_descendants_pre_order() {
    let node = sample();
    let names: Vec<&str> = node.descendants().map(AstNode::name).collect();
    assert_eq!(names, ["doc", "head1", "parag", "strings", "breakline"]);
}

#[test]
fn test_find_by_name() {
    let node = sample();
    assert_eq!(
        node.find("breakline").and_then(AstNode::as_text),
        Some("\n")
    );
    assert!(node.find("missing").is_none());
    assert_eq!(node.find_all("strings").count(), 1);
}

#[test]
fn test_display() {
    let node = AstNode::nodes(
        "add",
        vec![AstNode::text("number", "1"), AstNode::text("op", "+")],
    );
    assert_eq!(node.to_string(), r#"add[number("1"), op("+")]"#);
}
