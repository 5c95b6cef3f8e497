use super::*;
use pretty_assertions::assert_eq;

fn text<'s>(name: &str, text: &'s str) -> Fragment<'s> {
    Fragment::Text {
        name: Arc::from(name),
        text,
    }
}

fn name(s: &str) -> Arc<str> {
    Arc::from(s)
}

#[test]
fn test_flatten_concatenates_in_order() {
    let fragments = vec![
        text("digit", "12"),
        Fragment::Node(AstNode::nodes(
            "pair",
            vec![AstNode::text("a", "3"), AstNode::text("b", "4")],
        )),
        text("dash", "-"),
    ];
    assert_eq!(flatten(&fragments), "1234-");

    let node = reduce(&name("number"), Fidelity::Flatten, fragments);
    assert_eq!(node, AstNode::text("number", "1234-"));
}

#[test]
fn test_flatten_empty() {
    let node = reduce(&name("nothing"), Fidelity::Flatten, Vec::new());
    assert_eq!(node, AstNode::text("nothing", ""));
    assert!(node.is_empty());
}

#[test]
fn test_structure_joins_runs_of_one_terminal() {
    let fragments = vec![
        text("[a-z]", "a"),
        text("[a-z]", "b"),
        text("[a-z]", "c"),
        text(".", "."),
    ];
    assert_eq!(
        structure(fragments),
        vec![AstNode::text("[a-z]", "abc"), AstNode::text(".", ".")]
    );
}

#[test]
fn test_structure_keeps_different_terminals_apart() {
    let fragments = vec![text("key", "ab"), text("=", "="), text("=", "="), text("key", "c")];
    assert_eq!(
        structure(fragments),
        vec![
            AstNode::text("key", "ab"),
            AstNode::text("=", "=="),
            AstNode::text("key", "c"),
        ]
    );
}

#[test]
fn test_structure_keeps_nodes_distinct() {
    let item = AstNode::text("item", "x");
    let fragments = vec![
        text("-", "-"),
        Fragment::Node(item.clone()),
        Fragment::Node(item.clone()),
        text("-", "-"),
    ];
    assert_eq!(
        structure(fragments),
        vec![
            AstNode::text("-", "-"),
            item.clone(),
            item,
            AstNode::text("-", "-"),
        ]
    );
}

#[test]
fn test_structure_node_breaks_run() {
    let fragments = vec![
        text("a", "1"),
        Fragment::Node(AstNode::text("sep", ",")),
        text("a", "2"),
    ];
    let node = reduce(&name("list"), Fidelity::Structured, fragments);
    assert_eq!(node.children().len(), 3);
    assert_eq!(node.flatten(), "1,2");
}

#[test]
fn test_structured_flatten_agrees_with_flatten() {
    let fragments = vec![
        text("a", "x"),
        text("b", "y"),
        Fragment::Node(AstNode::text("c", "z")),
    ];
    let flat = flatten(&fragments);
    let structured = reduce(&name("r"), Fidelity::Structured, fragments);
    assert_eq!(structured.flatten(), flat);
}
