//! Recursive-descent parser for the filter predicate language.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expression  := conjunction ( 'or' conjunction )*
//! conjunction := negation ( 'and' negation )*
//! negation    := 'not' negation | primary
//! primary     := '(' expression ')' | comparison
//! comparison  := field operator literal
//! ```

use query_engine_metadata::metadata::ComparisonOperator;

use super::error::ParseError;
use super::lexer::{Lexer, Token, TokenKind};
use super::{Expression, Literal};

/// Parse a filter string into an expression tree.
///
/// All-or-nothing: trailing input after a complete expression is an error and
/// no partial tree is returned.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(input)?;
    let expression = parser.parse_expression()?;
    let trailing = parser.bump()?;
    match trailing.kind {
        TokenKind::Eof => Ok(expression),
        kind => Err(ParseError::new(
            trailing.offset,
            format!("expected end of input, found {}", kind.describe()),
        )),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Consume the current token and advance.
    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Whether the current token is the given bare keyword.
    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Ident(name) if name == keyword)
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_conjunction()?;
        while self.at_keyword("or") {
            self.bump()?;
            let right = self.parse_conjunction()?;
            left = Expression::Or {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_conjunction(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_negation()?;
        while self.at_keyword("and") {
            self.bump()?;
            let right = self.parse_negation()?;
            left = Expression::And {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_negation(&mut self) -> Result<Expression, ParseError> {
        if self.at_keyword("not") {
            self.bump()?;
            let inner = self.parse_negation()?;
            return Ok(Expression::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        if self.current.kind == TokenKind::LParen {
            self.bump()?;
            let expression = self.parse_expression()?;
            let close = self.bump()?;
            return match close.kind {
                TokenKind::RParen => Ok(expression),
                kind => Err(ParseError::new(
                    close.offset,
                    format!("expected ')', found {}", kind.describe()),
                )),
            };
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let field_token = self.bump()?;
        let field = match field_token.kind {
            TokenKind::Ident(name) => name,
            kind => {
                return Err(ParseError::new(
                    field_token.offset,
                    format!("expected a field name, found {}", kind.describe()),
                ))
            }
        };

        let operator_token = self.bump()?;
        let operator = match &operator_token.kind {
            TokenKind::Ident(name) => ComparisonOperator::from_name(name).ok_or_else(|| {
                ParseError::new(
                    operator_token.offset,
                    format!("expected a comparison operator, found '{}'", name),
                )
            })?,
            kind => {
                return Err(ParseError::new(
                    operator_token.offset,
                    format!("expected a comparison operator, found {}", kind.describe()),
                ))
            }
        };

        let literal_token = self.bump()?;
        let literal = match literal_token.kind {
            TokenKind::StringLit(value) => Literal::String(value),
            TokenKind::NumberLit(raw) => Literal::Number(raw),
            TokenKind::Ident(name) if name == "true" => Literal::Boolean(true),
            TokenKind::Ident(name) if name == "false" => Literal::Boolean(false),
            kind => {
                return Err(ParseError::new(
                    literal_token.offset,
                    format!("expected a literal value, found {}", kind.describe()),
                ))
            }
        };

        Ok(Expression::Comparison {
            field,
            operator,
            literal,
        })
    }
}
