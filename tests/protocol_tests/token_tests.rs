//! Token Reader Tests
//!
//! Tests for tokenization, text coalescing and pushback.

use xmlrpc_codec::protocol::{Token, TokenReader};
use xmlrpc_codec::FaultCode;

fn start(name: &str) -> Token {
    Token::Start(name.to_string())
}

fn end(name: &str) -> Token {
    Token::End(name.to_string())
}

fn text(body: &str) -> Token {
    Token::Text(body.to_string())
}

fn collect(input: &str) -> Vec<Token> {
    let mut reader = TokenReader::new(input.as_bytes());
    let mut tokens = Vec::new();
    while let Some(token) = reader.read().unwrap() {
        tokens.push(token);
    }
    tokens
}

// =============================================================================
// Tokenization Tests
// =============================================================================

#[test]
fn test_tokens_in_document_order() {
    let tokens = collect("<value><int>7</int></value>");
    assert_eq!(tokens, vec![start("value"), start("int"), text("7"), end("int"), end("value")]);
}

#[test]
fn test_declaration_token() {
    let tokens = collect("<?xml version=\"1.0\"?><value></value>");
    assert_eq!(tokens, vec![Token::Declaration, start("value"), end("value")]);
}

#[test]
fn test_empty_element_expanded() {
    let tokens = collect("<value/>");
    assert_eq!(tokens, vec![start("value"), end("value")]);
}

#[test]
fn test_whitespace_preserved_as_text() {
    let tokens = collect("<a>\n  <b></b>\n</a>");
    assert_eq!(
        tokens,
        vec![start("a"), text("\n  "), start("b"), end("b"), text("\n"), end("a")]
    );
    assert!(tokens[1].is_blank());
}

// =============================================================================
// Character Data Tests
// =============================================================================

#[test]
fn test_entities_coalesced_into_one_text() {
    let tokens = collect("<string>a &lt;b&gt; &amp; &quot;c&apos;</string>");
    assert_eq!(tokens, vec![start("string"), text("a <b> & \"c'"), end("string")]);
}

#[test]
fn test_numeric_character_references() {
    let tokens = collect("<string>&#65;&#x42;C</string>");
    assert_eq!(tokens[1], text("ABC"));
}

#[test]
fn test_cdata_joins_surrounding_text() {
    let tokens = collect("<string>x<![CDATA[<raw>]]>y</string>");
    assert_eq!(tokens, vec![start("string"), text("x<raw>y"), end("string")]);
}

#[test]
fn test_unknown_entity_is_malformed() {
    let mut reader = TokenReader::new("<string>&bogus;</string>".as_bytes());
    assert_eq!(reader.read().unwrap(), Some(start("string")));

    let err = reader.read().unwrap_err();
    assert!(err.fault().unwrap().is(FaultCode::MalformedInput));
}

#[test]
fn test_comment_rejected() {
    let mut reader = TokenReader::new("<!-- hi --><value></value>".as_bytes());
    let err = reader.read().unwrap_err();
    assert!(err.fault().unwrap().is(FaultCode::InvalidRequest));
}

#[test]
fn test_mismatched_end_tag_is_malformed() {
    let mut reader = TokenReader::new("<a></b>".as_bytes());
    assert_eq!(reader.read().unwrap(), Some(start("a")));

    let err = reader.read().unwrap_err();
    assert!(err.fault().unwrap().is(FaultCode::MalformedInput));
}

// =============================================================================
// Pushback Tests
// =============================================================================

#[test]
fn test_unread_returns_same_token() {
    let mut reader = TokenReader::new("<a>hi</a>".as_bytes());

    let first = reader.read().unwrap().unwrap();
    reader.unread(first.clone());
    assert_eq!(reader.read().unwrap(), Some(first));
    assert_eq!(reader.read().unwrap(), Some(text("hi")));
}

#[test]
fn test_unread_before_pending_markup() {
    // reading the text leaves </a> buffered internally; pushback still wins
    let mut reader = TokenReader::new("<a>hi</a>".as_bytes());
    reader.read().unwrap();

    let body = reader.read().unwrap().unwrap();
    reader.unread(body.clone());
    assert_eq!(reader.read().unwrap(), Some(body));
    assert_eq!(reader.read().unwrap(), Some(end("a")));
    assert_eq!(reader.read().unwrap(), None);
}

#[test]
#[should_panic(expected = "single token of pushback")]
fn test_double_unread_panics() {
    let mut reader = TokenReader::new("<a></a>".as_bytes());
    reader.unread(start("x"));
    reader.unread(start("y"));
}

#[test]
fn test_trim_skips_blank_text() {
    let mut reader = TokenReader::new("  \n\t<a></a>".as_bytes());
    reader.trim().unwrap();
    assert_eq!(reader.read().unwrap(), Some(start("a")));
}
