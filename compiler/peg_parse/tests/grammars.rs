//! Whole grammars: recursion, AST shape, whitespace handling, diagnostics,
//! options, batch parsing and sharing a grammar across threads.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use peg_ir::builtins::{breakline, number, strings};
use peg_ir::{
    AstNode, CombinatorKind, Expr, Fidelity, Grammar, GrammarBuilder, NodeName, Terminal,
};
use peg_parse::{parse, parse_each, parse_with, ParseOptions};
use pretty_assertions::assert_eq;

/// `nested <- "(" nested* ")"`
fn nested_parens(fidelity: Fidelity) -> Grammar {
    let g = GrammarBuilder::new();
    let nested = g.declare("nested").unwrap();
    let inner = g
        .zero_or_more(NodeName::Anonymous, Fidelity::Flatten, nested)
        .unwrap();
    g.sequence(
        "nested",
        fidelity,
        [g.literal("("), inner, g.literal(")")],
    )
    .unwrap();
    g.finish().unwrap()
}

/// `list <- number ("," number)*`, skipping whitespace before each token.
fn number_list(g: &GrammarBuilder) -> Expr {
    let comma = Expr::from(Terminal::literal(",").skipping_whitespace());
    let item = Expr::from(number().skipping_whitespace());
    let tail = g
        .sequence(NodeName::Anonymous, Fidelity::Structured, [comma, item.clone()])
        .unwrap();
    let tails = g
        .zero_or_more(NodeName::Anonymous, Fidelity::Structured, tail)
        .unwrap();
    g.sequence("list", Fidelity::Structured, [item, tails])
        .unwrap()
}

// -- Recursion --

#[test]
fn test_recursive_rule_through_forward_reference() {
    let grammar = nested_parens(Fidelity::Structured);
    let nested = grammar.rule("nested").unwrap();

    let output = parse("(()())x", &nested);
    assert_eq!(output.remaining, "x");

    let pair = AstNode::nodes(
        "nested",
        vec![AstNode::text("(", "("), AstNode::text(")", ")")],
    );
    assert_eq!(
        output.ast().unwrap(),
        &AstNode::nodes(
            "nested",
            vec![
                AstNode::text("(", "("),
                pair.clone(),
                pair,
                AstNode::text(")", ")"),
            ],
        )
    );
}

/// `doc <- item+` with `item <- "a"` declared before it is defined.
fn document() -> Expr {
    let g = GrammarBuilder::new();
    let item = g.declare("item").unwrap();
    let doc = g
        .one_or_more("doc", Fidelity::Structured, item)
        .unwrap();
    g.sequence("item", Fidelity::Flatten, [g.literal("a")])
        .unwrap();
    let grammar = g.finish().unwrap();
    let doc = grammar.rule("doc").unwrap();
    drop(grammar);
    doc
}

#[test]
fn test_rule_outlives_its_grammar() {
    let doc = document();
    let item = AstNode::text("item", "a");

    for _ in 0..2 {
        let output = parse("aaa", &doc);
        assert!(output.is_complete());
        assert_eq!(
            output.ast().unwrap(),
            &AstNode::nodes("doc", vec![item.clone(), item.clone(), item.clone()])
        );
    }
}

#[test]
fn test_recursive_rule_outlives_its_grammar() {
    let nested = nested_parens(Fidelity::Flatten).rule("nested").unwrap();

    let output = parse("(())", &nested);
    assert!(output.is_complete());
    assert_eq!(output.ast().unwrap(), &AstNode::text("nested", "(())"));
}

#[test]
fn test_recursive_rule_rejects_unbalanced() {
    let grammar = nested_parens(Fidelity::Flatten);
    let nested = grammar.rule("nested").unwrap();

    let output = parse("(()", &nested);
    assert!(output.failure().is_some());
    assert_eq!(output.remaining, "(()");
}

#[test]
fn test_deep_nesting_grows_the_stack() {
    let grammar = nested_parens(Fidelity::Flatten);
    let nested = grammar.rule("nested").unwrap();

    let depth = 10_000;
    let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let output = parse(&source, &nested);
    assert!(output.is_complete());
    assert_eq!(output.ast().unwrap().as_text(), Some(source.as_str()));
}

// -- AST shape --

#[test]
fn test_structured_rule_joins_repeated_terminal() {
    let g = GrammarBuilder::new();
    let letters = g
        .one_or_more(NodeName::Anonymous, Fidelity::Flatten, g.pattern("[a-z]").unwrap())
        .unwrap();
    let word = g
        .sequence("word", Fidelity::Structured, [letters, g.literal(";")])
        .unwrap();

    let output = parse("abc;", &word);
    assert_eq!(
        output.ast().unwrap(),
        &AstNode::nodes(
            "word",
            vec![AstNode::text("[a-z]", "abc"), AstNode::text(";", ";")],
        )
    );
}

#[test]
fn test_flatten_rule_hides_inner_structure() {
    let g = GrammarBuilder::new();
    let digits = g
        .one_or_more("digits", Fidelity::Structured, g.pattern("[0-9]").unwrap())
        .unwrap();
    let decimal = g
        .sequence(
            "decimal",
            Fidelity::Flatten,
            [digits.clone(), g.literal("."), digits],
        )
        .unwrap();

    let output = parse("3.14", &decimal);
    assert_eq!(output.ast().unwrap(), &AstNode::text("decimal", "3.14"));
}

#[test]
fn test_named_rules_are_findable() {
    let g = GrammarBuilder::new();
    let list = number_list(&g);

    let ast = parse("1,2,3", &list).into_result().unwrap();
    let numbers: Vec<_> = ast
        .find_all("number")
        .filter_map(AstNode::as_text)
        .collect();
    assert_eq!(numbers, ["1", "2", "3"]);
    assert_eq!(ast.find(",").and_then(AstNode::as_text), Some(","));
}

// -- Whitespace and builtins --

#[test]
fn test_whitespace_skipping_list() {
    let g = GrammarBuilder::new();
    let list = number_list(&g);

    let output = parse(" 1 , 22,  -3.5 rest", &list);
    assert_eq!(output.remaining, " rest");
    assert_eq!(
        output.ast().unwrap(),
        &AstNode::nodes(
            "list",
            vec![
                AstNode::text("number", "1"),
                AstNode::text(",", ","),
                AstNode::text("number", "22"),
                AstNode::text(",", ","),
                AstNode::text("number", "-3.5"),
            ],
        )
    );
}

#[test]
fn test_skipping_sequence_over_literals() {
    let g = GrammarBuilder::new();
    let pair = g
        .skipping(
            "pair",
            CombinatorKind::Sequence,
            Fidelity::Structured,
            [g.literal("a"), g.literal("b")],
        )
        .unwrap();

    let output = parse("a  b", &pair);
    assert!(output.is_complete());
    assert_eq!(
        output.ast().unwrap(),
        &AstNode::nodes("pair", vec![AstNode::text("a", "a"), AstNode::text("b", "b")])
    );

    let plain = g
        .sequence("plain", Fidelity::Structured, [g.literal("a"), g.literal("b")])
        .unwrap();
    assert!(parse("a  b", &plain).failure().is_some());
}

#[test]
fn test_skipping_is_inherited_through_forward_references() {
    let g = GrammarBuilder::new();
    let word = g.declare("word").unwrap();
    let words = g
        .skipping(
            "words",
            CombinatorKind::OneOrMore,
            Fidelity::Structured,
            [word],
        )
        .unwrap();
    g.sequence("word", Fidelity::Flatten, [g.pattern("[a-z]+").unwrap()])
        .unwrap();

    let output = parse("ab  cd\nef", &words);
    assert!(output.is_complete());
    let found: Vec<_> = output
        .ast()
        .unwrap()
        .find_all("word")
        .filter_map(AstNode::as_text)
        .collect();
    assert_eq!(found, ["ab", "cd", "ef"]);
}

#[test]
fn test_heading_with_builtins() {
    let g = GrammarBuilder::new();
    let heading = g
        .sequence(
            "heading",
            Fidelity::Structured,
            [
                g.literal("#"),
                Expr::from(strings().skipping_whitespace()),
                Expr::from(breakline()),
            ],
        )
        .unwrap();

    let output = parse("# テスト文書\nbody", &heading);
    assert_eq!(output.remaining, "body");
    assert_eq!(
        output.ast().unwrap(),
        &AstNode::nodes(
            "heading",
            vec![
                AstNode::text("#", "#"),
                AstNode::text("strings", "テスト文書"),
                AstNode::text("breakline", "\n"),
            ],
        )
    );
}

// -- Diagnostics --

#[test]
fn test_failure_reports_furthest_position() {
    let g = GrammarBuilder::new();
    let pair = g
        .sequence(
            "pair",
            Fidelity::Flatten,
            [
                Expr::from(Terminal::regex("[a-z]+").unwrap().named("key")),
                g.literal("="),
                Expr::from(number()),
            ],
        )
        .unwrap();

    let output = parse("key=;", &pair);
    let failure = output.failure().unwrap();
    assert_eq!(failure.furthest(), 4);
    assert_eq!(failure.location().to_string(), "1:5");
    assert_eq!(failure.found(), Some(";"));
    assert_eq!(
        failure.to_string(),
        "1:5: unexpected `;`, expecting `number`."
    );
}

#[test]
fn test_failure_merges_alternatives_at_same_position() {
    let g = GrammarBuilder::new();
    let ab = g
        .sequence(NodeName::Anonymous, Fidelity::Flatten, [g.literal("a"), g.literal("b")])
        .unwrap();
    let ac = g
        .sequence(NodeName::Anonymous, Fidelity::Flatten, [g.literal("a"), g.literal("c")])
        .unwrap();
    let either = g
        .ordered_choice("either", Fidelity::Flatten, [ab, ac])
        .unwrap();

    let output = parse("first\nad", &either);
    assert_eq!(output.remaining, "first\nad");
    assert_eq!(
        output.failure().unwrap().to_string(),
        "1:1: unexpected `first\nad`, expecting `a`."
    );

    let output = parse("ad", &either);
    assert_eq!(
        output.failure().unwrap().to_string(),
        "1:2: unexpected `d`, expecting `b` or `c`."
    );
}

#[test]
fn test_failure_location_spans_lines() {
    let g = GrammarBuilder::new();
    let line = g
        .sequence(
            NodeName::Anonymous,
            Fidelity::Flatten,
            [g.pattern("[a-z]+").unwrap(), Expr::from(breakline())],
        )
        .unwrap();
    let lines = g.one_or_more("lines", Fidelity::Flatten, line).unwrap();
    let options = ParseOptions::new().requiring_complete();

    let output = parse_with("one\ntwo\nthree", &lines, &options);
    let failure = output.failure().unwrap();
    assert_eq!(failure.location().to_string(), "3:6");
    assert_eq!(failure.found(), None);
    assert_eq!(failure.expected(), ["breakline".to_string()]);
}

// -- Options --

#[test]
fn test_require_complete_rejects_leftovers() {
    let g = GrammarBuilder::new();
    let digits = g
        .one_or_more("digits", Fidelity::Flatten, g.pattern("[0-9]").unwrap())
        .unwrap();
    let options = ParseOptions::new().requiring_complete();

    let output = parse_with("12ab", &digits, &options);
    assert_eq!(output.remaining, "12ab");
    let failure = output.failure().unwrap();
    assert_eq!(failure.furthest(), 2);
    assert_eq!(
        failure.expected(),
        ["[0-9]".to_string(), "end of input".to_string()]
    );

    let output = parse_with("12", &digits, &options);
    assert!(output.is_complete());
    assert_eq!(output.ast().unwrap(), &AstNode::text("digits", "12"));
}

#[test]
fn test_diagnostics_can_be_disabled() {
    let g = GrammarBuilder::new();
    let list = number_list(&g);
    let options = ParseOptions::new().without_diagnostics();

    let output = parse_with("x", &list, &options);
    let failure = output.failure().unwrap();
    assert_eq!(failure.furthest(), 0);
    assert!(failure.expected().is_empty());
    assert_eq!(failure.to_string(), "1:1: unexpected `x`.");
}

// -- Batch --

#[test]
fn test_parse_each_threads_remaining_input() {
    let word = Expr::from(strings().skipping_whitespace());
    let value = Expr::from(number().skipping_whitespace());
    let grammars = [word.clone(), value, word];

    let output = parse_each("abc 12 def", &grammars);
    assert!(output.is_complete());
    assert_eq!(
        output.nodes,
        vec![
            AstNode::text("strings", "abc"),
            AstNode::text("number", "12"),
            AstNode::text("strings", "def"),
        ]
    );
}

#[test]
fn test_parse_each_stops_when_input_is_used_up() {
    let word = Expr::from(strings());
    let grammars = [word.clone(), word];

    let output = parse_each("abc", &grammars);
    assert!(output.is_complete());
    assert_eq!(output.nodes.len(), 1);
}

#[test]
fn test_parse_each_stops_at_first_failure() {
    let word = Expr::from(strings());
    let value = Expr::from(number().skipping_whitespace());
    let grammars = [word.clone(), value, word];

    let output = parse_each("abc !", &grammars);
    assert!(!output.is_complete());
    assert_eq!(output.remaining, " !");
    assert_eq!(output.nodes, vec![AstNode::text("strings", "abc")]);
    let failure = output.failure.unwrap();
    assert_eq!(failure.furthest(), 4);
    assert_eq!(failure.expected(), ["number".to_string()]);
}

// -- Sharing --

#[test]
fn test_grammar_is_shared_across_threads() {
    peg_parse::init_tracing();

    let g = GrammarBuilder::new();
    let list = number_list(&g);
    let inputs = ["1,2,3", " 4 , 5", "6,x", "nope"];
    let expected: Vec<_> = inputs.iter().map(|input| parse(input, &list)).collect();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    inputs
                        .iter()
                        .map(|input| parse(input, &list))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), expected);
        }
    });
}
