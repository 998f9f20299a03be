//! Syntax error reporting for the scanner and parser.

use thiserror::Error;

/// A syntax error with a 1-based source position. One bad file never aborts a
/// submission; the representer logs this error and falls back to the
/// original text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("syntax error on line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    /// Build an error at a byte offset of `src`.
    pub fn at(src: &str, offset: usize, message: impl Into<String>) -> ParseError {
        let (line, column) = line_col(src, offset);
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}

/// 1-based line and column for a byte offset.
fn line_col(src: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(src.len());
    let mut line = 1u32;
    let mut column = 1u32;
    for ch in src[..offset].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_one_based() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("abc", 2), (1, 3));
    }

    #[test]
    fn position_tracks_newlines() {
        assert_eq!(line_col("a\nbc\nd", 5), (3, 1));
        assert_eq!(line_col("a\nbc", 3), (2, 2));
    }

    #[test]
    fn display_names_the_position() {
        let err = ParseError::at("<?php $", 6, "unexpected `$`");
        assert_eq!(
            err.to_string(),
            "syntax error on line 1, column 7: unexpected `$`"
        );
    }
}
