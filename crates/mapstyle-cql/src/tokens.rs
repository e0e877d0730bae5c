//! Tokens produced by the lexer.

use mapstyle_core::color::Color;

use crate::span::Span;

/// A lexical token.
///
/// Keywords are not separate tokens: they lex as [`Token::Identifier`] and
/// the parser matches them case-insensitively, since which words are
/// reserved depends on the grammar.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Identifier(&'a str),
    /// `"quoted name"`, extended grammar only
    QuotedIdentifier(String),
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    /// `#RRGGBB[AA]`, classic grammar only
    Color(Color),
    /// `DOES-NOT-EXIST`, classic grammar only
    DoesNotExist,
    LeftParen,
    RightParen,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, span: Span) -> Self {
        Self { token, span }
    }
}
