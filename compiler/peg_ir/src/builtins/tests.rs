use super::*;

fn probe(terminal: &Terminal, text: &str) -> Option<usize> {
    terminal.pattern().match_prefix(text)
}

#[test]
fn test_names() {
    assert_eq!(&**breakline().name(), "breakline");
    assert_eq!(&**space().name(), "space");
    assert_eq!(&**number().name(), "number");
    assert_eq!(&**strings().name(), "strings");
    assert_eq!(&**symbols().name(), "symbols");
}

#[test]
fn test_breakline_and_space() {
    assert_eq!(probe(&breakline(), "\nnext"), Some(1));
    assert_eq!(probe(&breakline(), " \n"), None);
    assert_eq!(probe(&space(), "\tx"), Some(1));
    assert_eq!(probe(&space(), "x"), None);
}

#[test]
fn test_number() {
    let number = number();
    assert_eq!(probe(&number, "42 apples"), Some(2));
    assert_eq!(probe(&number, "-7"), Some(2));
    assert_eq!(probe(&number, "+3.14)"), Some(5));
    assert_eq!(probe(&number, "1."), Some(2));
    assert_eq!(probe(&number, ".5"), None);
}

#[test]
fn test_strings() {
    let strings = strings();
    assert_eq!(probe(&strings, "qwerty1uiop"), Some(6));
    assert_eq!(probe(&strings, "テスト文書 x"), Some(15));
    assert_eq!(probe(&strings, "1abc"), None);
}

#[test]
fn test_symbols() {
    let symbols = symbols();
    for symbol in ["!", "/", ":", "@", "[", "`", "{", "~", "#"] {
        assert_eq!(probe(&symbols, symbol), Some(1), "symbol {symbol}");
    }
    assert_eq!(probe(&symbols, "a"), None);
    assert_eq!(probe(&symbols, "0"), None);
}

#[test]
fn test_builtins_stay_configurable() {
    let number = number().skipping_whitespace().named("operand");
    assert!(number.skips_whitespace());
    assert_eq!(&**number.name(), "operand");
}
