use nom::IResult;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, char, digit1},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::pair,
};

use crate::ast::{Operator, Sign};

/// A lexical unit of an arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// The literal digits, with an optional fractional part
    Number(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Token::Plus => Some(Operator::Add),
            Token::Minus => Some(Operator::Sub),
            Token::Star => Some(Operator::Mul),
            Token::Slash => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn sign(&self) -> Option<Sign> {
        match self {
            Token::Plus => Some(Sign::Plus),
            Token::Minus => Some(Sign::Minus),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator().is_some()
    }
}

fn parse_number(i: &str) -> IResult<&str, Token> {
    let decimal = recognize(pair(digit1, opt(pair(char('.'), digit1))));
    map(decimal, |digits: &str| Token::Number(digits.to_string()))(i)
}

fn parse_symbol(i: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Star, char('*')),
        value(Token::Slash, char('/')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
    ))(i)
}

/// Matches `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn parse_identifier(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(i)
}

fn parse_lexeme(i: &str) -> IResult<&str, Option<Token>> {
    alt((
        map(parse_number, Some),
        map(parse_symbol, Some),
        value(None, parse_identifier),
        value(None, anychar),
    ))(i)
}

/// Splits `input` into tokens, left to right
///
/// Lexing is lenient: whitespace, unresolved identifiers and any other
/// character that cannot start a token are skipped rather than reported.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        match parse_lexeme(remaining) {
            Ok((rest, lexeme)) => {
                tokens.extend(lexeme);
                remaining = rest;
            }
            // anychar only fails on empty input
            Err(_) => break,
        }
    }
    tokens
}
