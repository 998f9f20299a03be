//! Lexer-level tests: token kinds, string scanning, interpolation splitting.

use crate::scanner::tokens::{CastTok, LexedPart, StringKind, Token, TokenKind};
use crate::scanner::Lexer;

fn lex(src: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(src);
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next_token().expect("lexes cleanly");
        let done = token.kind == TokenKind::Eof;
        kinds.push(token.kind);
        if done {
            return kinds;
        }
    }
}

fn lex_tokens(src: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().expect("lexes cleanly");
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[test]
fn html_before_and_after_php_regions() {
    let kinds = lex("<html><?php $a; ?>tail");
    assert_eq!(
        kinds,
        vec![
            TokenKind::InlineHtml("<html>".to_string()),
            TokenKind::Variable("a".to_string()),
            TokenKind::Semicolon,
            TokenKind::CloseTag,
            TokenKind::InlineHtml("tail".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn file_without_php_region_is_all_html() {
    let kinds = lex("plain text\n");
    assert_eq!(
        kinds,
        vec![
            TokenKind::InlineHtml("plain text\n".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn operators_use_longest_match() {
    let kinds = lex("<?php 1 <=> 2 === 3 ?? 4;");
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntLiteral("1".to_string()),
            TokenKind::Spaceship,
            TokenKind::IntLiteral("2".to_string()),
            TokenKind::EqEqEq,
            TokenKind::IntLiteral("3".to_string()),
            TokenKind::QuestionQuestion,
            TokenKind::IntLiteral("4".to_string()),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_attach_to_the_following_token() {
    let tokens = lex_tokens("<?php // note\n/* block */ $a;");
    assert_eq!(tokens[0].kind, TokenKind::Variable("a".to_string()));
    assert_eq!(
        tokens[0].comments,
        vec!["// note".to_string(), "/* block */".to_string()]
    );
}

#[test]
fn single_quoted_resolves_only_quote_and_backslash() {
    let kinds = lex(r"<?php 'a\'b\\c\nd';");
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral {
            value: r"a'b\c\nd".to_string(),
            kind: StringKind::SingleQuoted,
        }
    );
}

#[test]
fn double_quoted_resolves_escapes() {
    let kinds = lex(r#"<?php "a\n\t\x41\u{2665}\377\$";"#);
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral {
            value: "a\n\tA♥\u{FF}$".to_string(),
            kind: StringKind::DoubleQuoted,
        }
    );
}

#[test]
fn double_quoted_splits_interpolations() {
    let kinds = lex(r#"<?php "a $b c {$d->e} ${f}";"#);
    assert_eq!(
        kinds[0],
        TokenKind::InterpolatedString {
            parts: vec![
                LexedPart::Literal("a ".to_string()),
                LexedPart::Var("b".to_string()),
                LexedPart::Literal(" c ".to_string()),
                LexedPart::Expr("$d->e".to_string()),
                LexedPart::Literal(" ".to_string()),
                LexedPart::Var("f".to_string()),
            ],
            kind: StringKind::DoubleQuoted,
        }
    );
}

#[test]
fn simple_syntax_index_becomes_an_expression_part() {
    let kinds = lex(r#"<?php "x $a[0] y";"#);
    assert_eq!(
        kinds[0],
        TokenKind::InterpolatedString {
            parts: vec![
                LexedPart::Literal("x ".to_string()),
                LexedPart::Expr("$a[0]".to_string()),
                LexedPart::Literal(" y".to_string()),
            ],
            kind: StringKind::DoubleQuoted,
        }
    );
}

#[test]
fn heredoc_strips_closing_indentation() {
    let src = "<?php <<<EOT\n    line1\n    line2\n    EOT;";
    let kinds = lex(src);
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral {
            value: "line1\nline2".to_string(),
            kind: StringKind::Heredoc,
        }
    );
    assert_eq!(kinds[1], TokenKind::Semicolon);
}

#[test]
fn nowdoc_keeps_content_raw() {
    let src = "<?php <<<'EOD'\n$a \\n\nEOD;";
    let kinds = lex(src);
    assert_eq!(
        kinds[0],
        TokenKind::StringLiteral {
            value: "$a \\n".to_string(),
            kind: StringKind::Nowdoc,
        }
    );
}

#[test]
fn heredoc_interpolates() {
    let src = "<?php <<<EOT\nhi $name\nEOT;";
    let kinds = lex(src);
    assert_eq!(
        kinds[0],
        TokenKind::InterpolatedString {
            parts: vec![
                LexedPart::Literal("hi ".to_string()),
                LexedPart::Var("name".to_string()),
            ],
            kind: StringKind::Heredoc,
        }
    );
}

#[test]
fn casts_lex_as_single_tokens() {
    assert_eq!(lex("<?php (int) $a;")[0], TokenKind::Cast(CastTok::Int));
    assert_eq!(lex("<?php ( integer ) $a;")[0], TokenKind::Cast(CastTok::Int));
    // Not a cast keyword: plain parenthesis.
    assert_eq!(lex("<?php (foo) ;")[0], TokenKind::LParen);
}

#[test]
fn numbers_keep_raw_text() {
    let kinds = lex("<?php 0x1F; 1_000; 1.5e3; .5;");
    assert_eq!(kinds[0], TokenKind::IntLiteral("0x1F".to_string()));
    assert_eq!(kinds[2], TokenKind::IntLiteral("1_000".to_string()));
    assert_eq!(kinds[4], TokenKind::FloatLiteral("1.5e3".to_string()));
    assert_eq!(kinds[6], TokenKind::FloatLiteral(".5".to_string()));
}

#[test]
fn fully_qualified_names_drop_the_separator() {
    let kinds = lex("<?php \\strlen($a);");
    assert_eq!(kinds[0], TokenKind::Identifier("strlen".to_string()));
}

#[test]
fn unterminated_string_is_a_syntax_error() {
    let mut lexer = Lexer::new("<?php 'oops");
    let err = lexer.next_token().unwrap_err();
    assert!(err.message.contains("unterminated string"));
}
