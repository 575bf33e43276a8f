#![allow(clippy::unwrap_used)]

use rstest::rstest;

use super::super::lexer::{LexErrorKind, TokenKind, tokenize};

fn kinds(source: &str) -> Vec<TokenKind<'_>> {
    tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_plain_text_is_one_token() {
    assert_eq!(kinds("hello world"), vec![TokenKind::Text("hello world")]);
}

#[test]
fn test_empty_input_has_no_tokens() {
    let lexed = tokenize("");
    assert!(lexed.tokens.is_empty());
    assert!(lexed.errors.is_empty());
}

#[test]
fn test_command_between_text() {
    assert_eq!(
        kinds("Intro {h1:Welcome} outro"),
        vec![
            TokenKind::Text("Intro "),
            TokenKind::Command {
                inner: "h1:Welcome",
                terminated: true
            },
            TokenKind::Text(" outro"),
        ]
    );
}

#[rstest]
#[case("{{{abc}}}", 3, "abc")]
#[case("{{x}}", 2, "x")]
#[case("{{{{ {a} }}}}", 4, " {a} ")]
#[case("{{}}", 2, "")]
fn test_literal_block_fences(#[case] source: &str, #[case] width: usize, #[case] content: &str) {
    assert_eq!(
        kinds(source),
        vec![TokenKind::LiteralBlock {
            fence_width: width,
            content,
            terminated: true
        }]
    );
}

#[test]
fn test_literal_content_is_verbatim() {
    let source = "{{ // not a comment /* nor this */ {cmd:x} \\n }}";
    assert_eq!(
        kinds(source),
        vec![TokenKind::LiteralBlock {
            fence_width: 2,
            content: " // not a comment /* nor this */ {cmd:x} \\n ",
            terminated: true
        }]
    );
}

#[test]
fn test_mismatched_fence_never_closes_early() {
    let lexed = tokenize("{{{x}} tail");
    assert_eq!(
        lexed.tokens[0].kind,
        TokenKind::LiteralBlock {
            fence_width: 3,
            content: "x}} tail",
            terminated: false
        }
    );
    assert_eq!(lexed.tokens.len(), 1);
    assert_eq!(
        lexed.errors[0].kind,
        LexErrorKind::UnterminatedLiteral { fence_width: 3 }
    );
}

#[test]
fn test_literal_closes_on_first_matching_run() {
    assert_eq!(
        kinds("{{a}}}b"),
        vec![
            TokenKind::LiteralBlock {
                fence_width: 2,
                content: "a",
                terminated: true
            },
            TokenKind::Text("}b"),
        ]
    );
}

#[test]
fn test_first_closing_brace_ends_command() {
    assert_eq!(
        kinds("{a{b}c}"),
        vec![
            TokenKind::Command {
                inner: "a{b",
                terminated: true
            },
            TokenKind::Text("c}"),
        ]
    );
}

#[test]
fn test_line_comment_keeps_newline() {
    assert_eq!(
        kinds("a // note\nb"),
        vec![TokenKind::Text("a "), TokenKind::Text("\nb")]
    );
}

#[test]
fn test_block_comment_emits_nothing() {
    assert_eq!(
        kinds("a/* x {y} */b"),
        vec![TokenKind::Text("a"), TokenKind::Text("b")]
    );
}

#[test]
fn test_single_slash_is_text() {
    assert_eq!(kinds("a/b / c"), vec![TokenKind::Text("a/b / c")]);
}

#[test]
fn test_unterminated_comment_consumes_to_end() {
    let lexed = tokenize("x /* {never:seen}");
    assert_eq!(lexed.tokens.len(), 1);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);
}

#[test]
fn test_unterminated_command_consumes_to_end() {
    let lexed = tokenize("x {h1:Title\nmore");
    assert_eq!(
        lexed.tokens[1].kind,
        TokenKind::Command {
            inner: "h1:Title\nmore",
            terminated: false
        }
    );
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedCommand);
    assert_eq!(u32::from(lexed.errors[0].range.start()), 2);
}

#[test]
fn test_token_ranges_are_contiguous_without_comments() {
    let source = "one {a:b} two {{lit}} three";
    let lexed = tokenize(source);
    let mut expected_start = 0u32;
    for token in &lexed.tokens {
        assert_eq!(u32::from(token.range.start()), expected_start);
        expected_start = u32::from(token.range.end());
    }
    assert_eq!(expected_start as usize, source.len());
}
