//! Tokenization of substitution syntax inside recipe command lines
//!
//! A raw command line is split into a flat sequence of tagged tokens:
//! literal text, variable references (`$VAR`, `${VAR}`), and command
//! substitutions (`$(cmd)`, `` `cmd` ``). The lexer does one pass and
//! never re-scans expanded text, so substitution stays auditable and
//! free of injection loops.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{map, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Plain text, passed through verbatim
    Literal(String),
    /// Variable reference: $VAR or ${VAR}
    VariableRef(String),
    /// Command substitution: $(cmd) or `cmd`
    CommandSub(String),
}

#[derive(Error, Debug)]
pub enum LexError {
    #[error("unterminated command substitution: {0}")]
    UnterminatedCommandSub(String),
    #[error("bad variable reference: {0}")]
    BadVariableRef(String),
    #[error("lex error: {0}")]
    ParseError(String),
}

/// Variable names follow the shell rule: alpha or underscore first,
/// alphanumeric or underscore after.
fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse $$ as an escaped literal dollar
fn dollar_escape(input: &str) -> IResult<&str, Token> {
    value(Token::Literal("$".to_string()), tag("$$"))(input)
}

/// Parse ${VAR}
fn braced_variable(input: &str) -> IResult<&str, Token> {
    map(delimited(tag("${"), name, char('}')), |s: &str| {
        Token::VariableRef(s.to_string())
    })(input)
}

/// Parse $VAR
fn bare_variable(input: &str) -> IResult<&str, Token> {
    map(preceded(char('$'), name), |s: &str| {
        Token::VariableRef(s.to_string())
    })(input)
}

/// Parse $(cmd), tracking paren depth so the body may itself contain
/// parentheses. Nested substitutions are not expanded (single pass);
/// the body is handed to the embedded shell as-is.
fn command_sub(input: &str) -> IResult<&str, Token> {
    let (rest, _) = tag("$(")(input)?;
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&rest[i + 1..], Token::CommandSub(rest[..i].to_string())));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TakeUntil,
    )))
}

/// Parse `cmd` (backtick form)
fn backtick_sub(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('`'), take_while(|c| c != '`'), char('`')),
        |s: &str| Token::CommandSub(s.to_string()),
    )(input)
}

/// A $ that does not open any substitution form is a literal dollar
/// (e.g. "$5", "$ "). Forms that *should* open one fail here so the
/// leftover-input check can report them.
fn lone_dollar(input: &str) -> IResult<&str, Token> {
    let (rest, _) = char('$')(input)?;
    match rest.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '{' || c == '(' || c == '$' => {
            Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )))
        }
        _ => Ok((rest, Token::Literal("$".to_string()))),
    }
}

/// Parse a run of plain text
fn literal(input: &str) -> IResult<&str, Token> {
    map(take_while1(|c| c != '$' && c != '`'), |s: &str| {
        Token::Literal(s.to_string())
    })(input)
}

/// Parse any single token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        dollar_escape,
        braced_variable,
        command_sub,
        bare_variable,
        backtick_sub,
        lone_dollar,
        literal,
    ))(input)
}

/// Tokenize one raw command line
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let (remaining, raw) =
        many0(token)(input).map_err(|e| LexError::ParseError(format!("{:?}", e)))?;

    // Anything left over is a malformed substitution
    if !remaining.is_empty() {
        if remaining.starts_with("$(") || remaining.starts_with('`') {
            return Err(LexError::UnterminatedCommandSub(remaining.to_string()));
        }
        if remaining.starts_with("${") {
            return Err(LexError::BadVariableRef(remaining.to_string()));
        }
        return Err(LexError::ParseError(remaining.to_string()));
    }

    // Merge adjacent literals (escapes and lone dollars come out as
    // separate one-char tokens)
    let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
    for tok in raw {
        match (tokens.last_mut(), tok) {
            (Some(Token::Literal(prev)), Token::Literal(s)) => prev.push_str(&s),
            (_, tok) => tokens.push(tok),
        }
    }

    Ok(tokens)
}
