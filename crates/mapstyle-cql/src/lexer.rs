//! Lexical analyzer for CQL text.
//!
//! The lexer converts source text into [`PositionedToken`]s. Whitespace
//! separates tokens and is dropped. Which tokens exist depends on the
//! [`Grammar`]: `#` colors and `DOES-NOT-EXIST` are classic only, `"quoted"`
//! names extended only. Lexing stops at the first error.

use winnow::{
    Parser as _,
    ascii::{Caseless, digit0, digit1, multispace0},
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use mapstyle_core::color::Color;

use crate::{
    Grammar,
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
    /// Secondary label placed on the character at `start`.
    opened: Option<&'static str>,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | ':')
}

fn cut<O>(input: &Input<'_>, diagnostic: LexerDiagnostic) -> IResult<O> {
    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        diagnostic,
    )))
}

/// Parse text between `quote` characters, where a doubled quote stands for
/// one quote character.
fn quoted(
    input: &mut Input<'_>,
    quote: char,
    message: &'static str,
    help: &'static str,
    opened: &'static str,
) -> IResult<String> {
    let start = input.current_token_start();
    let content = repeat(0.., alt(((quote, quote).value(quote), none_of(quote)))).fold(
        String::new,
        |mut acc, ch| {
            acc.push(ch);
            acc
        },
    );

    preceded(
        quote,
        cut_err(terminated(content, quote)).context(LexerDiagnostic {
            code: ErrorCode::E002,
            message,
            help: Some(help),
            start,
            opened: Some(opened),
        }),
    )
    .parse_next(input)
}

/// Parse a `'single quoted'` string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    quoted(
        input,
        '\'',
        "unterminated string literal",
        "add a closing `'`; write `''` for a quote inside the string",
        "string starts here",
    )
    .map(Token::StringLiteral)
}

/// Parse a `"double quoted"` property name.
fn quoted_identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    quoted(
        input,
        '"',
        "unterminated quoted name",
        "add a closing `\"`; write `\"\"` for a quote inside the name",
        "name starts here",
    )
    .map(Token::QuotedIdentifier)
}

/// Parse an integer or float literal.
///
/// A number running straight into identifier characters (`12abc`, `1.2.3`,
/// `1e`) is an error rather than two tokens.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let mantissa = alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void()));
    let exponent = (one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1);
    let parsed: IResult<&str> = (mantissa, opt(exponent)).take().parse_next(input);
    let text = parsed?;

    let invalid = LexerDiagnostic {
        code: ErrorCode::E003,
        message: "invalid number",
        help: Some("numbers look like `42`, `-0.5` or `1.5e3`"),
        start,
        opened: None,
    };

    if input.peek_token().is_some_and(is_identifier_char) {
        let _: IResult<&str> = take_while(0.., is_identifier_char).parse_next(input);
        return cut(input, invalid);
    }

    if text.contains(['.', 'e', 'E']) {
        return match text.parse::<f64>() {
            Ok(value) => Ok(Token::Float(value)),
            Err(_) => cut(input, invalid),
        };
    }
    match text.parse::<i64>() {
        Ok(value) => Ok(Token::Integer(value)),
        // Too large for an integer
        Err(_) => match text.parse::<f64>() {
            Ok(value) => Ok(Token::Float(value)),
            Err(_) => cut(input, invalid),
        },
    }
}

/// Parse a `#RRGGBB` or `#RRGGBBAA` color literal.
fn color_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let parsed: IResult<&str> =
        preceded('#', take_while(0.., is_identifier_char)).parse_next(input);
    let digits = parsed?;

    let well_formed =
        matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if well_formed {
        if let Ok(color) = Color::from_hex(digits) {
            return Ok(Token::Color(color));
        }
    }

    cut(
        input,
        LexerDiagnostic {
            code: ErrorCode::E004,
            message: "invalid color literal",
            help: Some("colors are `#` followed by 6 or 8 hex digits, e.g. `#FF8800`"),
            start,
            opened: None,
        },
    )
}

/// Parse the classic `DOES-NOT-EXIST` operator.
fn does_not_exist<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        literal(Caseless("DOES-NOT-EXIST")),
        peek(not(one_of(is_identifier_char))),
    )
    .value(Token::DoesNotExist)
    .parse_next(input)
}

/// Parse an identifier: a property name, function name or keyword.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., is_identifier_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse operators and punctuation (longest first).
fn operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("<=").value(Token::LessOrEqual),
        literal(">=").value(Token::GreaterOrEqual),
        literal("<>").value(Token::NotEqual),
        literal("!=").value(Token::NotEqual),
        '<'.value(Token::Less),
        '>'.value(Token::Greater),
        '='.value(Token::Equal),
        '+'.value(Token::Plus),
        '-'.value(Token::Minus),
        '*'.value(Token::Star),
        '/'.value(Token::Slash),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>, grammar: Grammar) -> IResult<Token<'a>> {
    match grammar {
        Grammar::Extended => {
            alt((string_literal, quoted_identifier, number, identifier, operator)).parse_next(input)
        }
        Grammar::Classic => alt((
            string_literal,
            color_literal,
            does_not_exist,
            number,
            identifier,
            operator,
        ))
        .parse_next(input),
    }
}

fn whitespace(input: &mut Input<'_>) -> IResult<()> {
    multispace0.void().parse_next(input)
}

/// Convert a lexer error into a diagnostic.
///
/// Falls back to E001 (unexpected character at `start`) when no diagnostic
/// context is attached.
fn convert_err_mode(
    err: ErrMode<ContextError<LexerDiagnostic>>,
    source: &str,
    grammar: Grammar,
    start: usize,
    error_pos: usize,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(LexerDiagnostic {
        code,
        message,
        help,
        start,
        opened,
    }) = context_error.context().next()
    {
        let end = error_pos.max(*start + 1).min(source.len());
        let mut diag = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(*start..end), code.description());
        if let Some(opened) = opened {
            diag = diag.with_secondary_label(Span::new(*start..*start + 1), *opened);
        }
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        return diag;
    }

    let ch = source[start..].chars().next().unwrap_or(' ');
    let span = Span::new(start..start + ch.len_utf8());
    let diag = Diagnostic::error(format!("unexpected character `{ch}`"))
        .with_code(ErrorCode::E001)
        .with_label(span, ErrorCode::E001.description());

    match (grammar, ch) {
        (Grammar::Extended, '#') => {
            diag.with_help("write colors as strings in this grammar, e.g. '#FF0000'")
        }
        (Grammar::Classic, '"') => {
            diag.with_help("quoted property names are only supported by the extended grammar")
        }
        _ => diag,
    }
}

/// Tokenize CQL text in the given grammar.
///
/// # Returns
///
/// - `Ok(tokens)` - the whole input was tokenized
/// - `Err(diagnostic)` - the first lexical error
pub(crate) fn tokenize(source: &str, grammar: Grammar) -> Result<Vec<PositionedToken<'_>>, Diagnostic> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    loop {
        whitespace(&mut input)
            .map_err(|e| convert_err_mode(e, source, grammar, 0, 0))?;
        if input.is_empty() {
            break;
        }

        let start = input.current_token_start();
        match token(&mut input, grammar) {
            Ok(token) => {
                let end = input.current_token_start();
                tokens.push(PositionedToken::new(token, Span::new(start..end)));
            }
            Err(e) => {
                let error_pos = input.current_token_start();
                return Err(convert_err_mode(e, source, grammar, start, error_pos));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str, grammar: Grammar) -> Vec<Token<'_>> {
        tokenize(input, grammar)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn error_code(input: &str, grammar: Grammar) -> ErrorCode {
        tokenize(input, grammar)
            .expect_err("input should fail")
            .code()
            .expect("lexer diagnostics carry a code")
    }

    #[test]
    fn test_comparison_tokens() {
        assert_eq!(
            kinds("pop >= 10.5", Grammar::Extended),
            vec![
                Token::Identifier("pop"),
                Token::GreaterOrEqual,
                Token::Float(10.5)
            ]
        );
        assert_eq!(
            kinds("a<>b != c", Grammar::Classic),
            vec![
                Token::Identifier("a"),
                Token::NotEqual,
                Token::Identifier("b"),
                Token::NotEqual,
                Token::Identifier("c"),
            ]
        );
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(
            kinds("'O''Brien'", Grammar::Extended),
            vec![Token::StringLiteral("O'Brien".to_string())]
        );
        assert_eq!(
            kinds("''", Grammar::Classic),
            vec![Token::StringLiteral(String::new())]
        );
    }

    #[test]
    fn test_quoted_identifier_only_in_extended() {
        assert_eq!(
            kinds("\"road class\"", Grammar::Extended),
            vec![Token::QuotedIdentifier("road class".to_string())]
        );
        assert_eq!(error_code("\"road class\"", Grammar::Classic), ErrorCode::E001);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42", Grammar::Extended), vec![Token::Integer(42)]);
        assert_eq!(kinds(".5", Grammar::Extended), vec![Token::Float(0.5)]);
        assert_eq!(kinds("1.5e3", Grammar::Extended), vec![Token::Float(1500.0)]);
        assert_eq!(
            kinds("99999999999999999999", Grammar::Extended),
            vec![Token::Float(1e20)]
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(error_code("12abc", Grammar::Extended), ErrorCode::E003);
        assert_eq!(error_code("1.2.3", Grammar::Extended), ErrorCode::E003);
        assert_eq!(error_code("1e", Grammar::Classic), ErrorCode::E003);

        let diag = tokenize("x = 12abc", Grammar::Extended).unwrap_err();
        assert_eq!(diag.primary_span(), Some(Span::new(4..9)));
    }

    #[test]
    fn test_color_literal_only_in_classic() {
        let tokens = kinds("#FF0000", Grammar::Classic);
        assert_eq!(tokens, vec![Token::Color(Color::from_hex("#FF0000").unwrap())]);

        let diag = tokenize("#FF0000", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert!(diag.help().is_some());
    }

    #[test]
    fn test_invalid_color_literal() {
        assert_eq!(error_code("#FF00", Grammar::Classic), ErrorCode::E004);
        assert_eq!(error_code("#GG0000", Grammar::Classic), ErrorCode::E004);
    }

    #[test]
    fn test_unterminated_string() {
        let diag = tokenize("name = 'abc", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.primary_span(), Some(Span::new(7..11)));

        let opening = diag
            .labels()
            .iter()
            .find(|label| label.is_secondary())
            .expect("opening quote is labeled");
        assert_eq!(opening.span(), Span::new(7..8));
        assert_eq!(opening.message(), "string starts here");
    }

    #[test]
    fn test_unterminated_quoted_name() {
        let diag = tokenize("\"road class = 1", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.message(), "unterminated quoted name");
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.labels()[1].span(), Span::new(0..1));
    }

    #[test]
    fn test_other_errors_have_no_secondary_label() {
        let diag = tokenize("12abc", Grammar::Extended).unwrap_err();
        assert!(diag.labels().iter().all(|label| label.is_primary()));
    }

    #[test]
    fn test_does_not_exist() {
        assert_eq!(
            kinds("name does-not-exist", Grammar::Classic),
            vec![Token::Identifier("name"), Token::DoesNotExist]
        );
        // Extended reads it as subtraction
        assert_eq!(
            kinds("DOES-NOT-EXIST", Grammar::Extended),
            vec![
                Token::Identifier("DOES"),
                Token::Minus,
                Token::Identifier("NOT"),
                Token::Minus,
                Token::Identifier("EXIST"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("  area  * 2", Grammar::Extended).unwrap();
        assert_eq!(tokens[0].span, Span::new(2..6));
        assert_eq!(tokens[1].span, Span::new(8..9));
        assert_eq!(tokens[2].span, Span::new(10..11));
    }

    #[test]
    fn test_unexpected_character() {
        let diag = tokenize("a ; b", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.message(), "unexpected character `;`");
        assert_eq!(diag.primary_span(), Some(Span::new(2..3)));
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(
            kinds("é = 'x'", Grammar::Extended),
            vec![
                Token::Identifier("é"),
                Token::Equal,
                Token::StringLiteral("x".to_string()),
            ]
        );
        let tokens = tokenize("名前 = 1", Grammar::Classic).unwrap();
        assert_eq!(tokens[0].token, Token::Identifier("名前"));
        assert_eq!(tokens[0].span, Span::new(0..6));
        assert_eq!(tokens[1].span, Span::new(7..8));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("   ", Grammar::Extended).unwrap().is_empty());
    }
}
