//! Parser for CQL tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into an
//! [`Expression`] or a [`Filter`]. The public entry points are
//! [`parse_expression`] and [`parse_filter`], each parsing in one
//! [`Grammar`].
//!
//! Precedence, loosest first:
//!
//! ```text
//! filter     := or
//! or         := and (OR and)*
//! and        := not (AND not)*
//! not        := NOT not | INCLUDE | EXCLUDE | predicate | '(' filter ')'
//! predicate  := left (cmp expr | [NOT] BETWEEN expr AND expr | [NOT] LIKE string
//!                    | IS [NOT] NULL | [NOT] IN '(' expr, .. ')' | EXISTS | DOES-NOT-EXIST)
//!                    (IN lists hold at least one expression)
//! expr       := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := '-' unary | primary
//! primary    := number | string | color | TRUE | FALSE | name | name '(' expr, .. ')' | '(' expr ')'
//! ```
//!
//! `left` is any expression in the extended grammar and a property name in
//! the classic one.

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use mapstyle_core::expr::{ArithmeticOp, ComparisonOp, Expression, Filter, Value};

use crate::{
    Grammar,
    error::{Diagnostic, ErrorCode},
    lexer::tokenize,
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    /// What the parser expected at the failure point
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at the failure point
    Remaining(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = Result<O, ErrMode<ContextError<Context>>>;

/// Create a Backtrack error recording what was expected at the current position.
fn expected(input: &Input<'_>, label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Remaining(input.eof_offset()));
    e.push(Context::Label(label));
    ErrMode::Backtrack(e)
}

/// Commit to the current branch: a failure inside `f` is not retried.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    match f(input) {
        Err(ErrMode::Backtrack(e)) => Err(ErrMode::Cut(e)),
        other => other,
    }
}

fn remaining_of(error: &ContextError<Context>) -> Option<usize> {
    error.context().find_map(|ctx| match ctx {
        Context::Remaining(n) => Some(*n),
        Context::Label(_) => None,
    })
}

/// Of two failed alternatives, keep the one that got further.
fn furthest(
    first: ContextError<Context>,
    second: ContextError<Context>,
) -> ErrMode<ContextError<Context>> {
    let first_remaining = remaining_of(&first).unwrap_or(usize::MAX);
    let second_remaining = remaining_of(&second).unwrap_or(usize::MAX);
    if second_remaining <= first_remaining {
        ErrMode::Backtrack(second)
    } else {
        ErrMode::Backtrack(first)
    }
}

fn peek<'src>(input: &Input<'src>) -> Option<&'src Token<'src>> {
    input.peek_token().map(|t| &t.token)
}

fn is_keyword(token: &Token<'_>, keyword: &str) -> bool {
    matches!(token, Token::Identifier(word) if word.eq_ignore_ascii_case(keyword))
}

fn peek_keyword(input: &Input<'_>, keyword: &str) -> bool {
    peek(input).is_some_and(|token| is_keyword(token, keyword))
}

/// Parse a specific keyword, case-insensitively.
fn keyword<'src>(input: &mut Input<'src>, keyword: &'static str) -> IResult<Span> {
    if !peek_keyword(input, keyword) {
        return Err(expected(input, keyword));
    }
    any.map(|token: &PositionedToken<'_>| token.span)
        .parse_next(input)
}

/// Parse a specific punctuation token.
fn punct<'src>(input: &mut Input<'src>, kind: &Token<'_>, label: &'static str) -> IResult<Span> {
    if peek(input) != Some(kind) {
        return Err(expected(input, label));
    }
    any.map(|token: &PositionedToken<'_>| token.span)
        .parse_next(input)
}

/// Parse a string literal token.
fn string_literal(input: &mut Input<'_>) -> IResult<String> {
    let error = expected(input, "a quoted string");
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(s.clone()),
        _ => None,
    })
    .parse_next(input)
    .map_err(|_: ErrMode<ContextError<Context>>| error)
}

/// Parse a property name: a non-keyword identifier, or a quoted name.
fn property_name(input: &mut Input<'_>, grammar: Grammar) -> IResult<String> {
    let error = expected(input, "a property name");
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) if !grammar.is_keyword(name) => Some((*name).to_string()),
        Token::QuotedIdentifier(name) => Some(name.clone()),
        _ => None,
    })
    .parse_next(input)
    .map_err(|_: ErrMode<ContextError<Context>>| error)
}

/// Parse a comma separated, parenthesized list of expressions.
///
/// `()` is accepted only when `allow_empty` is set.
fn expression_list(
    input: &mut Input<'_>,
    grammar: Grammar,
    allow_empty: bool,
) -> IResult<Vec<Expression>> {
    punct(input, &Token::LeftParen, "`(`")?;
    let mut items = Vec::new();
    if allow_empty && peek(input) == Some(&Token::RightParen) {
        punct(input, &Token::RightParen, "`)`")?;
        return Ok(items);
    }
    loop {
        items.push(cut_err(input, |i| expression(i, grammar))?);
        match peek(input) {
            Some(Token::Comma) => {
                punct(input, &Token::Comma, "`,`")?;
            }
            _ => {
                cut_err(input, |i| punct(i, &Token::RightParen, "`,` or `)`"))?;
                return Ok(items);
            }
        }
    }
}

fn primary(input: &mut Input<'_>, grammar: Grammar) -> IResult<Expression> {
    let Some(token) = peek(input) else {
        return Err(expected(input, "an expression"));
    };

    let literal = match token {
        Token::Integer(n) => Some(Value::Integer(*n)),
        Token::Float(f) => Some(Value::Float(*f)),
        Token::StringLiteral(s) => Some(Value::Text(s.clone())),
        Token::Color(c) => Some(Value::Color(*c)),
        token if is_keyword(token, "TRUE") => Some(Value::Bool(true)),
        token if is_keyword(token, "FALSE") => Some(Value::Bool(false)),
        _ => None,
    };
    if let Some(value) = literal {
        input.next_token();
        return Ok(Expression::Literal(value));
    }

    match token {
        Token::LeftParen => {
            punct(input, &Token::LeftParen, "`(`")?;
            let inner = expression(input, grammar)?;
            punct(input, &Token::RightParen, "`)`")?;
            Ok(inner)
        }
        Token::QuotedIdentifier(_) => property_name(input, grammar).map(Expression::Property),
        Token::Identifier(name) if !grammar.is_keyword(name) => {
            let name = property_name(input, grammar)?;
            if peek(input) == Some(&Token::LeftParen) {
                let args = expression_list(input, grammar, true)?;
                Ok(Expression::function(name, args))
            } else {
                Ok(Expression::Property(name))
            }
        }
        _ => Err(expected(input, "an expression")),
    }
}

/// Parse unary minus, folding it into numeric literals.
fn unary(input: &mut Input<'_>, grammar: Grammar) -> IResult<Expression> {
    if peek(input) != Some(&Token::Minus) {
        return primary(input, grammar);
    }
    punct(input, &Token::Minus, "`-`")?;
    let operand = cut_err(input, |i| unary(i, grammar))?;
    Ok(match operand {
        Expression::Literal(Value::Integer(n)) if n.checked_neg().is_some() => {
            Expression::Literal(Value::Integer(-n))
        }
        Expression::Literal(Value::Float(f)) => Expression::Literal(Value::Float(-f)),
        other => -other,
    })
}

fn binary_level(
    input: &mut Input<'_>,
    grammar: Grammar,
    operand: fn(&mut Input<'_>, Grammar) -> IResult<Expression>,
    operator: fn(&Token<'_>) -> Option<ArithmeticOp>,
) -> IResult<Expression> {
    let mut left = operand(input, grammar)?;
    while let Some(op) = peek(input).and_then(operator) {
        input.next_token();
        let right = cut_err(input, |i| operand(i, grammar))?;
        left = Expression::binary(op, left, right);
    }
    Ok(left)
}

fn term(input: &mut Input<'_>, grammar: Grammar) -> IResult<Expression> {
    binary_level(input, grammar, unary, |token| match token {
        Token::Star => Some(ArithmeticOp::Multiply),
        Token::Slash => Some(ArithmeticOp::Divide),
        _ => None,
    })
}

fn expression(input: &mut Input<'_>, grammar: Grammar) -> IResult<Expression> {
    binary_level(input, grammar, term, |token| match token {
        Token::Plus => Some(ArithmeticOp::Add),
        Token::Minus => Some(ArithmeticOp::Subtract),
        _ => None,
    })
}

fn comparison_op(token: &Token<'_>) -> Option<ComparisonOp> {
    match token {
        Token::Equal => Some(ComparisonOp::Equal),
        Token::NotEqual => Some(ComparisonOp::NotEqual),
        Token::Less => Some(ComparisonOp::Less),
        Token::LessOrEqual => Some(ComparisonOp::LessOrEqual),
        Token::Greater => Some(ComparisonOp::Greater),
        Token::GreaterOrEqual => Some(ComparisonOp::GreaterOrEqual),
        _ => None,
    }
}

/// Parse the part of a predicate that follows `[NOT]`: BETWEEN, LIKE, ILIKE or IN.
fn negatable_predicate(
    input: &mut Input<'_>,
    grammar: Grammar,
    left: Expression,
) -> IResult<Filter> {
    if peek_keyword(input, "BETWEEN") {
        keyword(input, "BETWEEN")?;
        let lower = cut_err(input, |i| expression(i, grammar))?;
        cut_err(input, |i| keyword(i, "AND"))?;
        let upper = cut_err(input, |i| expression(i, grammar))?;
        return Ok(Filter::Between {
            expr: left,
            lower,
            upper,
        });
    }

    let case_insensitive = grammar == Grammar::Extended && peek_keyword(input, "ILIKE");
    if case_insensitive || peek_keyword(input, "LIKE") {
        input.next_token();
        let pattern = cut_err(input, string_literal)?;
        return Ok(Filter::Like {
            expr: left,
            pattern,
            case_insensitive,
        });
    }

    if grammar == Grammar::Extended && peek_keyword(input, "IN") {
        keyword(input, "IN")?;
        let list = cut_err(input, |i| expression_list(i, grammar, false))?;
        return Ok(Filter::In { expr: left, list });
    }

    let label = match grammar {
        Grammar::Extended => "BETWEEN, LIKE, ILIKE or IN",
        Grammar::Classic => "BETWEEN or LIKE",
    };
    Err(expected(input, label))
}

fn predicate(input: &mut Input<'_>, grammar: Grammar) -> IResult<Filter> {
    let left = match grammar {
        Grammar::Extended => expression(input, grammar)?,
        Grammar::Classic => Expression::Property(property_name(input, grammar)?),
    };

    let Some(token) = peek(input) else {
        return Err(expected(input, "a comparison operator"));
    };

    if let Some(op) = comparison_op(token) {
        input.next_token();
        let right = cut_err(input, |i| expression(i, grammar))?;
        return Ok(Filter::Compare { op, left, right });
    }

    if is_keyword(token, "NOT") {
        keyword(input, "NOT")?;
        return cut_err(input, |i| negatable_predicate(i, grammar, left)).map(Filter::negate);
    }

    if is_keyword(token, "IS") {
        keyword(input, "IS")?;
        let negated = peek_keyword(input, "NOT");
        if negated {
            keyword(input, "NOT")?;
        }
        cut_err(input, |i| keyword(i, "NULL"))?;
        let filter = Filter::IsNull(left);
        return Ok(if negated { filter.negate() } else { filter });
    }

    if grammar == Grammar::Classic {
        if let Expression::Property(name) = &left {
            if is_keyword(token, "EXISTS") {
                input.next_token();
                return Ok(Filter::Exists(name.clone()));
            }
            if *token == Token::DoesNotExist {
                input.next_token();
                return Ok(Filter::Exists(name.clone()).negate());
            }
        }
    }

    let starts_negatable = ["BETWEEN", "LIKE", "ILIKE", "IN"]
        .iter()
        .any(|word| is_keyword(token, word));
    if starts_negatable {
        let checkpoint = input.checkpoint();
        match negatable_predicate(input, grammar, left) {
            Err(ErrMode::Backtrack(e)) => {
                input.reset(&checkpoint);
                Err(ErrMode::Backtrack(e))
            }
            other => other,
        }
    } else {
        Err(expected(input, "a comparison operator"))
    }
}

/// Parse INCLUDE, EXCLUDE, a predicate, or a parenthesized filter.
fn atom(input: &mut Input<'_>, grammar: Grammar) -> IResult<Filter> {
    if peek_keyword(input, "INCLUDE") {
        keyword(input, "INCLUDE")?;
        return Ok(Filter::Include);
    }
    if peek_keyword(input, "EXCLUDE") {
        keyword(input, "EXCLUDE")?;
        return Ok(Filter::Exclude);
    }
    if peek(input) != Some(&Token::LeftParen) {
        return predicate(input, grammar);
    }

    // `(` opens either a grouped filter or the left expression of a predicate
    let checkpoint = input.checkpoint();
    let as_predicate = match predicate(input, grammar) {
        Err(ErrMode::Backtrack(e)) => e,
        other => return other,
    };
    input.reset(&checkpoint);

    punct(input, &Token::LeftParen, "`(`")?;
    let grouped = filter(input, grammar).and_then(|inner| {
        cut_err(input, |i| punct(i, &Token::RightParen, "`)`"))?;
        Ok(inner)
    });
    match grouped {
        Err(ErrMode::Backtrack(as_group)) => Err(furthest(as_predicate, as_group)),
        other => other,
    }
}

fn not_filter(input: &mut Input<'_>, grammar: Grammar) -> IResult<Filter> {
    if peek_keyword(input, "NOT") {
        keyword(input, "NOT")?;
        return cut_err(input, |i| not_filter(i, grammar)).map(Filter::negate);
    }
    atom(input, grammar)
}

fn logical_level(
    input: &mut Input<'_>,
    grammar: Grammar,
    word: &'static str,
    operand: fn(&mut Input<'_>, Grammar) -> IResult<Filter>,
    combine: fn(Vec<Filter>) -> Filter,
) -> IResult<Filter> {
    let mut parts = vec![operand(input, grammar)?];
    while peek_keyword(input, word) {
        keyword(input, word)?;
        parts.push(cut_err(input, |i| operand(i, grammar))?);
    }
    if parts.len() == 1 {
        Ok(parts.remove(0))
    } else {
        Ok(combine(parts))
    }
}

fn and_filter(input: &mut Input<'_>, grammar: Grammar) -> IResult<Filter> {
    logical_level(input, grammar, "AND", not_filter, Filter::And)
}

fn filter(input: &mut Input<'_>, grammar: Grammar) -> IResult<Filter> {
    logical_level(input, grammar, "OR", and_filter, Filter::Or)
}

/// Convert a winnow error into a diagnostic.
///
/// The failure position comes from the `Remaining` context. A failure past
/// the last token is reported as incomplete input (E101), anything else as
/// unexpected input (E100).
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    source: &str,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let index = remaining_of(&context)
        .map(|remaining| tokens.len().saturating_sub(remaining))
        .unwrap_or(tokens.len());
    let label = context.context().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        Context::Remaining(_) => None,
    });

    match tokens.get(index) {
        Some(token) => {
            let text = &source[token.span.range()];
            let message = match label {
                Some(label) => format!("unexpected `{text}`, expected {label}"),
                None => format!("unexpected `{text}`"),
            };
            Diagnostic::error(message)
                .with_code(ErrorCode::E100)
                .with_label(token.span, ErrorCode::E100.description())
                .with_help("check the syntax around this token")
        }
        None => {
            let end = source.trim_end().len();
            let message = match label {
                Some(label) => format!("incomplete input, expected {label}"),
                None => "incomplete input".to_string(),
            };
            Diagnostic::error(message)
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), "input ends here")
                .with_help("complete the text after the last token")
        }
    }
}

fn parse_all<O>(
    source: &str,
    grammar: Grammar,
    what: &'static str,
    parser: fn(&mut Input<'_>, Grammar) -> IResult<O>,
) -> Result<O, Diagnostic> {
    let tokens = tokenize(source, grammar)?;
    let mut slice = TokenSlice::new(&tokens);

    match parser(&mut slice, grammar) {
        Ok(value) => match slice.peek_token() {
            None => Ok(value),
            Some(token) => {
                let last = tokens.last().map_or(token.span, |t| t.span);
                let text = &source[token.span.range()];
                Err(
                    Diagnostic::error(format!("unexpected `{text}` after a complete {what}"))
                        .with_code(ErrorCode::E102)
                        .with_label(token.span.union(last), ErrorCode::E102.description())
                        .with_help("remove the trailing text or join it with an operator"),
                )
            }
        },
        Err(e) => Err(convert_error(e, &tokens, source)),
    }
}

/// Parse `source` as an expression in one grammar.
pub fn parse_expression(source: &str, grammar: Grammar) -> Result<Expression, Diagnostic> {
    parse_all(source, grammar, "expression", expression)
}

/// Parse `source` as a filter in one grammar.
pub fn parse_filter(source: &str, grammar: Grammar) -> Result<Filter, Diagnostic> {
    parse_all(source, grammar, "filter", filter)
}

#[cfg(test)]
mod tests {
    use mapstyle_core::color::Color;

    use super::*;

    fn expr(source: &str, grammar: Grammar) -> Expression {
        parse_expression(source, grammar)
            .unwrap_or_else(|d| panic!("`{source}` should parse: {d}"))
    }

    fn filt(source: &str, grammar: Grammar) -> Filter {
        parse_filter(source, grammar).unwrap_or_else(|d| panic!("`{source}` should parse: {d}"))
    }

    fn code(result: Result<impl std::fmt::Debug, Diagnostic>) -> ErrorCode {
        result
            .expect_err("should fail")
            .code()
            .expect("parser diagnostics carry a code")
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("42", Grammar::Extended), Expression::from(42i64));
        assert_eq!(expr("-2.5", Grammar::Extended), Expression::from(-2.5));
        assert_eq!(expr("'abc'", Grammar::Classic), Expression::from("abc"));
        assert_eq!(expr("TRUE", Grammar::Extended), Expression::from(true));
        assert_eq!(expr("false", Grammar::Classic), Expression::from(false));
        assert_eq!(
            expr("#00FF00", Grammar::Classic),
            Expression::from(Color::from_hex("#00FF00").unwrap())
        );
    }

    #[test]
    fn test_arithmetic_precedence() {
        let parsed = expr("a + b * 2", Grammar::Extended);
        let expected = Expression::property("a")
            + Expression::property("b") * Expression::from(2i64);
        assert_eq!(parsed, expected);

        let grouped = expr("(a + b) * 2", Grammar::Extended);
        assert_eq!(grouped.to_string(), "(a + b) * 2");
    }

    #[test]
    fn test_left_associative() {
        let parsed = expr("10 - 4 - 3", Grammar::Extended);
        assert_eq!(parsed.to_string(), "10 - 4 - 3");
        let expected = Expression::binary(
            ArithmeticOp::Subtract,
            Expression::binary(
                ArithmeticOp::Subtract,
                Expression::from(10i64),
                Expression::from(4i64),
            ),
            Expression::from(3i64),
        );
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_negated_property() {
        assert_eq!(
            expr("-width", Grammar::Extended),
            -Expression::property("width")
        );
    }

    #[test]
    fn test_function_calls() {
        let parsed = expr("Concatenate(name, ' ', ref)", Grammar::Extended);
        assert_eq!(
            parsed,
            Expression::function(
                "Concatenate",
                vec![
                    Expression::property("name"),
                    Expression::from(" "),
                    Expression::property("ref"),
                ]
            )
        );
        assert_eq!(
            expr("random()", Grammar::Classic),
            Expression::function("random", vec![])
        );
    }

    #[test]
    fn test_quoted_property() {
        assert_eq!(
            expr("\"road class\"", Grammar::Extended),
            Expression::property("road class")
        );
    }

    #[test]
    fn test_comparison_filters() {
        assert_eq!(
            filt("pop > 1000", Grammar::Extended),
            Filter::compare(ComparisonOp::Greater, Expression::property("pop"), 1000i64)
        );
        assert_eq!(
            filt("name <> 'x'", Grammar::Classic),
            Filter::compare(ComparisonOp::NotEqual, Expression::property("name"), "x")
        );
    }

    #[test]
    fn test_logical_precedence() {
        let parsed = filt("a = 1 OR b = 2 AND NOT c = 3", Grammar::Extended);
        let expected = Filter::Or(vec![
            Filter::equal(Expression::property("a"), 1i64),
            Filter::And(vec![
                Filter::equal(Expression::property("b"), 2i64),
                Filter::equal(Expression::property("c"), 3i64).negate(),
            ]),
        ]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_grouped_filter() {
        let parsed = filt("(a = 1 OR b = 2) AND c = 3", Grammar::Classic);
        assert_eq!(parsed.to_string(), "(a = 1 OR b = 2) AND c = 3");
    }

    #[test]
    fn test_parenthesized_left_expression() {
        let parsed = filt("(a + 1) * 2 > 10", Grammar::Extended);
        assert!(matches!(
            parsed,
            Filter::Compare {
                op: ComparisonOp::Greater,
                ..
            }
        ));
    }

    #[test]
    fn test_between_and_like() {
        assert_eq!(
            filt("depth BETWEEN 10 AND 20", Grammar::Classic),
            Filter::Between {
                expr: Expression::property("depth"),
                lower: 10i64.into(),
                upper: 20i64.into(),
            }
        );
        assert_eq!(
            filt("name NOT LIKE 'A%'", Grammar::Classic),
            Filter::Like {
                expr: Expression::property("name"),
                pattern: "A%".to_string(),
                case_insensitive: false,
            }
            .negate()
        );
        assert_eq!(
            filt("name ILIKE 'a%'", Grammar::Extended),
            Filter::Like {
                expr: Expression::property("name"),
                pattern: "a%".to_string(),
                case_insensitive: true,
            }
        );
    }

    #[test]
    fn test_between_binds_tighter_than_and() {
        let parsed = filt("x BETWEEN 1 AND 3 AND y = 2", Grammar::Extended);
        let Filter::And(parts) = parsed else {
            panic!("expected AND");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[0], Filter::Between { .. }));
    }

    #[test]
    fn test_is_null() {
        assert_eq!(
            filt("name IS NULL", Grammar::Classic),
            Filter::IsNull(Expression::property("name"))
        );
        assert_eq!(
            filt("name is not null", Grammar::Extended),
            Filter::IsNull(Expression::property("name")).negate()
        );
    }

    #[test]
    fn test_in_list_extended_only() {
        assert_eq!(
            filt("type IN ('a', 'b')", Grammar::Extended),
            Filter::In {
                expr: Expression::property("type"),
                list: vec!["a".into(), "b".into()],
            }
        );
        assert!(parse_filter("type IN ('a', 'b')", Grammar::Classic).is_err());

        let diag = parse_filter("a IN ()", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(6..7)));
        assert_eq!(diag.message(), "unexpected `)`, expected an expression");
        // `in` is an ordinary name in the classic grammar
        assert_eq!(
            filt("in = 1", Grammar::Classic),
            Filter::equal(Expression::property("in"), 1i64)
        );
    }

    #[test]
    fn test_exists_classic_only() {
        assert_eq!(
            filt("name EXISTS", Grammar::Classic),
            Filter::Exists("name".to_string())
        );
        assert_eq!(
            filt("name DOES-NOT-EXIST", Grammar::Classic),
            Filter::Exists("name".to_string()).negate()
        );
        assert!(parse_filter("name EXISTS", Grammar::Extended).is_err());
    }

    #[test]
    fn test_classic_requires_property_on_left() {
        assert!(parse_filter("1 = a", Grammar::Classic).is_err());
        assert!(parse_filter("1 = a", Grammar::Extended).is_ok());
        assert!(parse_filter("strLength(name) > 3", Grammar::Classic).is_err());
        assert!(parse_filter("strLength(name) > 3", Grammar::Extended).is_ok());
    }

    #[test]
    fn test_include_exclude() {
        assert_eq!(filt("INCLUDE", Grammar::Extended), Filter::Include);
        assert_eq!(filt("exclude", Grammar::Classic), Filter::Exclude);
    }

    #[test]
    fn test_incomplete_input() {
        let diag = parse_expression("1 +", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.primary_span(), Some(Span::new(3..3)));
        assert_eq!(diag.message(), "incomplete input, expected an expression");

        assert_eq!(code(parse_filter("a =", Grammar::Extended)), ErrorCode::E101);
        assert_eq!(code(parse_expression("", Grammar::Classic)), ErrorCode::E101);
        assert_eq!(code(parse_filter("a BETWEEN 1", Grammar::Classic)), ErrorCode::E101);
    }

    #[test]
    fn test_unexpected_input() {
        let diag = parse_filter("a = = 1", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(4..5)));
        assert_eq!(diag.message(), "unexpected `=`, expected an expression");
    }

    #[test]
    fn test_trailing_input() {
        let diag = parse_expression("a b c", Grammar::Extended).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.primary_span(), Some(Span::new(2..5)));
    }

    #[test]
    fn test_lexer_error_passes_through() {
        assert_eq!(code(parse_expression("'open", Grammar::Classic)), ErrorCode::E002);
    }

    #[test]
    fn test_display_reparses() {
        for source in [
            "a + b * 2",
            "NOT (a = 1 OR b < 2)",
            "name NOT ILIKE 'x%'",
            "\"my field\" IN (1, 2, 3)",
            "x IS NOT NULL AND y NOT BETWEEN 1 AND 2",
        ] {
            let parsed = filt_or_expr(source);
            assert_eq!(filt_or_expr(&parsed), filt_or_expr(source), "{source}");
        }
    }

    fn filt_or_expr(source: &str) -> String {
        match parse_filter(source, Grammar::Extended) {
            Ok(f) => f.to_string(),
            Err(_) => expr(source, Grammar::Extended).to_string(),
        }
    }
}
