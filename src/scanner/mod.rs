//! PHP scanner: token definitions and the hand-written lexer.
//!
//! The lexer starts in HTML mode and switches into PHP mode at `<?php`,
//! mirroring the host language's tag handling. Comments are collected as
//! trivia on the following token so the parser can attach them to statements.

pub mod lexer;
pub mod tokens;

pub use lexer::Lexer;
pub use tokens::{CastTok, LexedPart, StringKind, Token, TokenKind};
