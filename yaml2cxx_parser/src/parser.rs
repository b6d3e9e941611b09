//! Recursive descent parser for Python fixture expressions
//!
//! Produces `ast::Expr` trees directly. The grammar is the expression
//! subset the fixture corpus uses; statements do not exist here.

use crate::ast::{BinOpKind, BoolOpKind, CmpOp, Comprehension, Expr, Index, Keyword, NumLit,
                 UnaryOpKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

/// Python expression parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current token (one-token lookahead)
    current: Option<SpannedToken<'a>>,
}

impl<'a> std::fmt::Debug for Parser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser").field("current", &self.current).finish()
    }
}

/// Parse a single Python expression
pub fn parse_expr(source: &str) -> ParseResult<Expr> {
    let mut parser = Parser::new(source)?;
    let expr = parser.parse_expression()?;
    if let Some(tok) = &parser.current {
        return Err(ParseError::unexpected_token(
            tok.text,
            "end of input",
            tok.span,
        ));
    }
    Ok(expr)
}

impl<'a> Parser<'a> {
    /// Create a parser primed with the first token
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: None,
        };
        parser.advance()?;
        Ok(parser)
    }

    // ==================== Token management ====================

    /// Advance to the next token, returning the previous one
    fn advance(&mut self) -> ParseResult<Option<SpannedToken<'a>>> {
        let prev = self.current.take();
        match self.lexer.next_token() {
            Some(Ok(token)) => self.current = Some(token),
            Some(Err(e)) => return Err(e),
            None => self.current = None,
        }
        Ok(prev)
    }

    /// Check if the current token matches
    fn check(&self, expected: Token) -> bool {
        self.current
            .as_ref()
            .map(|t| t.token == expected)
            .unwrap_or(false)
    }

    /// Consume the current token if it matches
    fn eat(&mut self, expected: Token) -> ParseResult<bool> {
        if self.check(expected) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the current token, failing if it does not match
    fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        match &self.current {
            Some(tok) if tok.token == expected => {
                Ok(self.advance()?.unwrap_or_else(|| unreachable!()))
            }
            Some(tok) => Err(ParseError::unexpected_token(
                tok.text,
                expected.describe(),
                tok.span,
            )),
            None => Err(ParseError::unexpected_eof(expected.describe())),
        }
    }

    /// Peek one token past the current one
    fn peek_next(&mut self) -> Option<Token> {
        match self.lexer.peek() {
            Some(Ok(tok)) => Some(tok.token),
            _ => None,
        }
    }

    fn current_span(&self) -> Span {
        self.current.as_ref().map(|t| t.span).unwrap_or_default()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current {
            Some(tok) => ParseError::unexpected_token(tok.text, expected, tok.span),
            None => ParseError::unexpected_eof(expected),
        }
    }

    // ==================== Grammar ====================

    /// Full expression: lambda or boolean-or chain
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        if self.check(Token::KwLambda) {
            return self.parse_lambda();
        }
        let expr = self.parse_or()?;
        if self.check(Token::KwIf) {
            // conditional expressions (x if c else y) are outside the subset
            return Err(ParseError::invalid_syntax(
                "conditional expression not supported",
                self.current_span(),
            ));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut values = vec![self.parse_and()?];
        while self.eat(Token::KwOr)? {
            values.push(self.parse_and()?);
        }
        if values.len() == 1 {
            Ok(values.pop().unwrap_or_else(|| unreachable!()))
        } else {
            Ok(Expr::BoolOp {
                op: BoolOpKind::Or,
                values,
            })
        }
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut values = vec![self.parse_not()?];
        while self.eat(Token::KwAnd)? {
            values.push(self.parse_not()?);
        }
        if values.len() == 1 {
            Ok(values.pop().unwrap_or_else(|| unreachable!()))
        } else {
            Ok(Expr::BoolOp {
                op: BoolOpKind::And,
                values,
            })
        }
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.eat(Token::KwNot)? {
            let operand = self.parse_not()?;
            return Ok(Expr::UnaryOp {
                op: UnaryOpKind::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    /// Comparisons chain the Python way: `a < b < c` keeps one left operand
    /// and parallel op/comparator lists.
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_bit_or()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(tok) = self.current.as_ref().map(|t| t.token) {
            let op = match tok {
                Token::EqEq => CmpOp::Eq,
                Token::NotEq => CmpOp::NotEq,
                Token::Lt => CmpOp::Lt,
                Token::LtEq => CmpOp::LtEq,
                Token::Gt => CmpOp::Gt,
                Token::GtEq => CmpOp::GtEq,
                _ => break,
            };
            self.advance()?;
            ops.push(op);
            comparators.push(self.parse_bit_or()?);
        }
        if ops.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                ops,
                comparators,
            })
        }
    }

    fn parse_bit_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bit_xor()?;
        while self.eat(Token::Pipe)? {
            let right = self.parse_bit_xor()?;
            left = binop(left, BinOpKind::BitOr, right);
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.eat(Token::Caret)? {
            let right = self.parse_bit_and()?;
            left = binop(left, BinOpKind::BitXor, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_shift()?;
        while self.eat(Token::Amp)? {
            let right = self.parse_shift()?;
            left = binop(left, BinOpKind::BitAnd, right);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = if self.check(Token::LtLt) {
                BinOpKind::LShift
            } else if self.check(Token::GtGt) {
                BinOpKind::RShift
            } else {
                break;
            };
            self.advance()?;
            let right = self.parse_additive()?;
            left = binop(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.check(Token::Plus) {
                BinOpKind::Add
            } else if self.check(Token::Minus) {
                BinOpKind::Sub
            } else {
                break;
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = binop(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.check(Token::Star) {
                BinOpKind::Mul
            } else if self.check(Token::Slash) {
                BinOpKind::Div
            } else if self.check(Token::SlashSlash) {
                BinOpKind::FloorDiv
            } else if self.check(Token::Percent) {
                BinOpKind::Mod
            } else {
                break;
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = binop(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = if self.check(Token::Minus) {
            Some(UnaryOpKind::Neg)
        } else if self.check(Token::Plus) {
            Some(UnaryOpKind::Pos)
        } else if self.check(Token::Tilde) {
            Some(UnaryOpKind::Invert)
        } else {
            None
        };
        if let Some(op) = op {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_power()
    }

    /// `**` binds tighter than unary on its left and looser on its right
    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_postfix()?;
        if self.eat(Token::StarStar)? {
            let right = self.parse_unary()?;
            return Ok(binop(base, BinOpKind::Pow, right));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(Token::Dot)? {
                let name = self.expect(Token::Identifier)?;
                expr = Expr::Attribute {
                    value: Box::new(expr),
                    attr: name.text.to_string(),
                };
            } else if self.check(Token::LParen) {
                expr = self.parse_call(expr)?;
            } else if self.check(Token::LBracket) {
                expr = self.parse_subscript(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_call(&mut self, func: Expr) -> ParseResult<Expr> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        while !self.check(Token::RParen) {
            if self.eat(Token::StarStar)? {
                let value = self.parse_expression()?;
                keywords.push(Keyword { name: None, value });
            } else if self.eat(Token::Star)? {
                let value = self.parse_expression()?;
                args.push(Expr::Starred(Box::new(value)));
            } else if self.check(Token::Identifier) && self.peek_next() == Some(Token::Eq) {
                let name = self.expect(Token::Identifier)?.text.to_string();
                self.expect(Token::Eq)?;
                let value = self.parse_expression()?;
                keywords.push(Keyword {
                    name: Some(name),
                    value,
                });
            } else {
                args.push(self.parse_expression()?);
            }
            if !self.eat(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
        })
    }

    fn parse_subscript(&mut self, value: Expr) -> ParseResult<Expr> {
        self.expect(Token::LBracket)?;
        let lower = if self.check(Token::Colon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        let index = if self.eat(Token::Colon)? {
            let upper = if self.check(Token::Colon) || self.check(Token::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expression()?))
            };
            let step = if self.eat(Token::Colon)? {
                if self.check(Token::RBracket) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                }
            } else {
                None
            };
            Index::Slice { lower, upper, step }
        } else {
            match lower {
                Some(item) => Index::Item(item),
                None => return Err(self.unexpected("subscript expression")),
            }
        };
        self.expect(Token::RBracket)?;
        Ok(Expr::Subscript {
            value: Box::new(value),
            index,
        })
    }

    fn parse_lambda(&mut self) -> ParseResult<Expr> {
        self.expect(Token::KwLambda)?;
        let mut params = Vec::new();
        let mut vararg = None;
        let mut kwarg = None;
        while !self.check(Token::Colon) {
            if self.eat(Token::Star)? {
                let name = self.expect(Token::Identifier)?;
                vararg = Some(name.text.to_string());
            } else if self.eat(Token::StarStar)? {
                let name = self.expect(Token::Identifier)?;
                kwarg = Some(name.text.to_string());
            } else {
                let name = self.expect(Token::Identifier)?;
                if self.check(Token::Eq) {
                    return Err(ParseError::invalid_syntax(
                        "default parameter values not supported",
                        self.current_span(),
                    ));
                }
                params.push(name.text.to_string());
            }
            if !self.eat(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::Colon)?;
        let body = self.parse_expression()?;
        Ok(Expr::Lambda {
            params,
            vararg,
            kwarg,
            body: Box::new(body),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(tok) = self.current.clone() else {
            return Err(ParseError::unexpected_eof("expression"));
        };
        match tok.token {
            Token::DecimalLiteral | Token::HexLiteral => {
                self.advance()?;
                Ok(Expr::Num(NumLit::Int {
                    text: tok.text.replace('_', ""),
                }))
            }
            Token::FloatLiteral => {
                self.advance()?;
                Ok(Expr::Num(NumLit::Float {
                    text: tok.text.replace('_', ""),
                }))
            }
            Token::DoubleQuote | Token::SingleQuote => {
                self.advance()?;
                decode_string(tok.text, tok.span)
            }
            Token::True => {
                self.advance()?;
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.advance()?;
                Ok(Expr::Bool(false))
            }
            Token::KwNone => {
                self.advance()?;
                Ok(Expr::NoneLit)
            }
            Token::Identifier => {
                self.advance()?;
                Ok(Expr::Name(tok.text.to_string()))
            }
            Token::KwLambda => self.parse_lambda(),
            Token::LParen => self.parse_paren(),
            Token::LBracket => self.parse_list_or_comprehension(),
            Token::LBrace => self.parse_dict_or_set(),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_paren(&mut self) -> ParseResult<Expr> {
        self.expect(Token::LParen)?;
        if self.eat(Token::RParen)? {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.parse_expression()?;
        if self.check(Token::Comma) {
            let mut elts = vec![first];
            while self.eat(Token::Comma)? {
                if self.check(Token::RParen) {
                    break;
                }
                elts.push(self.parse_expression()?);
            }
            self.expect(Token::RParen)?;
            return Ok(Expr::Tuple(elts));
        }
        self.expect(Token::RParen)?;
        Ok(first)
    }

    fn parse_list_or_comprehension(&mut self) -> ParseResult<Expr> {
        self.expect(Token::LBracket)?;
        if self.eat(Token::RBracket)? {
            return Ok(Expr::List(Vec::new()));
        }
        let first = self.parse_expression()?;
        if self.check(Token::KwFor) {
            let generators = self.parse_generators()?;
            self.expect(Token::RBracket)?;
            return Ok(Expr::ListComp {
                element: Box::new(first),
                generators,
            });
        }
        let mut elts = vec![first];
        while self.eat(Token::Comma)? {
            if self.check(Token::RBracket) {
                break;
            }
            elts.push(self.parse_expression()?);
        }
        self.expect(Token::RBracket)?;
        Ok(Expr::List(elts))
    }

    fn parse_generators(&mut self) -> ParseResult<Vec<Comprehension>> {
        let mut generators = Vec::new();
        while self.eat(Token::KwFor)? {
            let target = self.parse_comp_target()?;
            self.expect(Token::KwIn)?;
            let iter = self.parse_or()?;
            let mut ifs = Vec::new();
            while self.eat(Token::KwIf)? {
                ifs.push(self.parse_or()?);
            }
            generators.push(Comprehension {
                target: Box::new(target),
                iter: Box::new(iter),
                ifs,
            });
        }
        Ok(generators)
    }

    /// Loop target: a plain name, or a (possibly parenthesized) name tuple
    fn parse_comp_target(&mut self) -> ParseResult<Expr> {
        let first = self.parse_target_atom()?;
        if self.check(Token::Comma) {
            let mut elts = vec![first];
            while self.eat(Token::Comma)? {
                if self.check(Token::KwIn) {
                    break;
                }
                elts.push(self.parse_target_atom()?);
            }
            return Ok(Expr::Tuple(elts));
        }
        Ok(first)
    }

    fn parse_target_atom(&mut self) -> ParseResult<Expr> {
        if self.check(Token::Identifier) {
            let name = self.expect(Token::Identifier)?;
            return Ok(Expr::Name(name.text.to_string()));
        }
        if self.eat(Token::LParen)? {
            let inner = self.parse_comp_target()?;
            self.expect(Token::RParen)?;
            return Ok(inner);
        }
        Err(self.unexpected("loop target"))
    }

    fn parse_dict_or_set(&mut self) -> ParseResult<Expr> {
        self.expect(Token::LBrace)?;
        if self.eat(Token::RBrace)? {
            return Ok(Expr::Dict(Vec::new()));
        }
        let first = self.parse_expression()?;
        if self.eat(Token::Colon)? {
            let value = self.parse_expression()?;
            let mut pairs = vec![(first, value)];
            while self.eat(Token::Comma)? {
                if self.check(Token::RBrace) {
                    break;
                }
                let key = self.parse_expression()?;
                self.expect(Token::Colon)?;
                let value = self.parse_expression()?;
                pairs.push((key, value));
            }
            self.expect(Token::RBrace)?;
            return Ok(Expr::Dict(pairs));
        }
        let mut elts = vec![first];
        while self.eat(Token::Comma)? {
            if self.check(Token::RBrace) {
                break;
            }
            elts.push(self.parse_expression()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Expr::Set(elts))
    }
}

fn binop(left: Expr, op: BinOpKind, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Decode a string token (prefix, quotes and escapes) into `Str` or `Bytes`
fn decode_string(text: &str, span: Span) -> ParseResult<Expr> {
    let mut is_bytes = false;
    let mut is_raw = false;
    let mut prefix_len = 0;
    for c in text.chars() {
        match c {
            'b' | 'B' => {
                is_bytes = true;
                prefix_len += 1;
            }
            'r' | 'R' => {
                is_raw = true;
                prefix_len += 1;
            }
            'u' | 'U' => prefix_len += 1,
            _ => break,
        }
    }
    // prefix_len .. len-1 is the body between the quotes
    let body = &text[prefix_len + 1..text.len() - 1];

    if is_raw {
        return Ok(if is_bytes {
            Expr::Bytes(body.as_bytes().to_vec())
        } else {
            Expr::Str(body.to_string())
        });
    }

    if is_bytes {
        Ok(Expr::Bytes(decode_bytes_escapes(body, span)?))
    } else {
        Ok(Expr::Str(decode_str_escapes(body, span)?))
    }
}

fn decode_str_escapes(body: &str, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('x') => {
                let value = hex_pair(&mut chars)
                    .ok_or_else(|| ParseError::InvalidEscape {
                        sequence: "\\x".into(),
                        span,
                    })?;
                // \xNN in a str literal is the code point, as in Python
                out.push(char::from(value));
            }
            Some('u') => {
                let mut value = 0u32;
                for _ in 0..4 {
                    let d = chars
                        .next()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| ParseError::InvalidEscape {
                            sequence: "\\u".into(),
                            span,
                        })?;
                    value = value * 16 + d;
                }
                let c = char::from_u32(value).ok_or_else(|| ParseError::InvalidEscape {
                    sequence: "\\u".into(),
                    span,
                })?;
                out.push(c);
            }
            // Python leaves unknown escapes in place
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: "\\".into(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

fn decode_bytes_escapes(body: &str, span: Span) -> ParseResult<Vec<u8>> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('\\') => out.push(b'\\'),
            Some('\'') => out.push(b'\''),
            Some('"') => out.push(b'"'),
            Some('0') => out.push(0),
            Some('a') => out.push(0x07),
            Some('b') => out.push(0x08),
            Some('f') => out.push(0x0c),
            Some('v') => out.push(0x0b),
            Some('x') => {
                let value = hex_pair(&mut chars).ok_or_else(|| ParseError::InvalidEscape {
                    sequence: "\\x".into(),
                    span,
                })?;
                out.push(value);
            }
            Some(other) => {
                out.push(b'\\');
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: "\\".into(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

fn hex_pair(chars: &mut std::str::Chars<'_>) -> Option<u8> {
    let hi = chars.next()?.to_digit(16)?;
    let lo = chars.next()?.to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Expr {
        parse_expr(source).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42"), Expr::Num(NumLit::Int { text: "42".into() }));
        assert_eq!(
            parse("1.5"),
            Expr::Num(NumLit::Float { text: "1.5".into() })
        );
    }

    #[test]
    fn test_parse_call_chain() {
        let expr = parse("r.expr(1).add(2)");
        let Expr::Call { func, args, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        assert!(matches!(*func, Expr::Attribute { .. }));
    }

    #[test]
    fn test_parse_keyword_args() {
        let expr = parse("tbl.insert(doc, durability='soft')");
        let Expr::Call { keywords, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name.as_deref(), Some("durability"));
    }

    #[test]
    fn test_parse_unpacking_args() {
        let expr = parse("f(*args, **kwargs)");
        let Expr::Call { args, keywords, .. } = expr else {
            panic!("expected call");
        };
        assert!(matches!(args[0], Expr::Starred(_)));
        assert_eq!(keywords[0].name, None);
    }

    #[test]
    fn test_parse_slices() {
        let expr = parse("a[2:5]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        let Index::Slice { lower, upper, step } = index else {
            panic!("expected slice");
        };
        assert!(lower.is_some() && upper.is_some() && step.is_none());

        let expr = parse("a[::2]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        assert!(matches!(index, Index::Slice { step: Some(_), .. }));
    }

    #[test]
    fn test_parse_chained_comparison() {
        let expr = parse("a < b < c");
        let Expr::Compare {
            ops, comparators, ..
        } = expr
        else {
            panic!("expected comparison");
        };
        assert_eq!(ops.len(), 2);
        assert_eq!(comparators.len(), 2);
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + 2 * 3 groups as 1 + (2 * 3)
        let Expr::BinOp { op, right, .. } = parse("1 + 2 * 3") else {
            panic!("expected binop");
        };
        assert_eq!(op, BinOpKind::Add);
        assert!(matches!(
            *right,
            Expr::BinOp {
                op: BinOpKind::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_power_right_assoc() {
        // 2 ** 3 ** 2 groups as 2 ** (3 ** 2)
        let Expr::BinOp { op, right, .. } = parse("2 ** 3 ** 2") else {
            panic!("expected binop");
        };
        assert_eq!(op, BinOpKind::Pow);
        assert!(matches!(
            *right,
            Expr::BinOp {
                op: BinOpKind::Pow,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_lambda() {
        let expr = parse("lambda x, y: x + y");
        let Expr::Lambda { params, body, .. } = expr else {
            panic!("expected lambda");
        };
        assert_eq!(params, vec!["x".to_string(), "y".to_string()]);
        assert!(matches!(*body, Expr::BinOp { .. }));
    }

    #[test]
    fn test_parse_comprehension() {
        let expr = parse("[x + 1 for x in seq]");
        let Expr::ListComp { generators, .. } = expr else {
            panic!("expected comprehension");
        };
        assert_eq!(generators.len(), 1);
        assert_eq!(*generators[0].target, Expr::Name("x".into()));
    }

    #[test]
    fn test_parse_dict_and_set() {
        let expr = parse("{'a': 1, 'b': 2}");
        let Expr::Dict(pairs) = expr else {
            panic!("expected dict");
        };
        assert_eq!(pairs.len(), 2);

        assert!(matches!(parse("{1, 2}"), Expr::Set(_)));
        assert!(matches!(parse("{}"), Expr::Dict(_)));
    }

    #[test]
    fn test_parse_tuple() {
        assert!(matches!(parse("(1, 2)"), Expr::Tuple(_)));
        assert!(matches!(parse("(1,)"), Expr::Tuple(_)));
        // parenthesized expression is not a tuple
        assert!(matches!(parse("(1)"), Expr::Num(_)));
    }

    #[test]
    fn test_parse_string_escapes() {
        assert_eq!(parse(r#"'a\nb'"#), Expr::Str("a\nb".into()));
        assert_eq!(parse(r#""quote\"""#), Expr::Str("quote\"".into()));
        assert_eq!(
            parse(r#"b'\x00\xff'"#),
            Expr::Bytes(vec![0x00, 0xff])
        );
        assert_eq!(parse(r"r'a\nb'"), Expr::Str("a\\nb".into()));
    }

    #[test]
    fn test_parse_boolean_keywords() {
        assert!(matches!(parse("a and b"), Expr::BoolOp { .. }));
        assert!(matches!(
            parse("not a"),
            Expr::UnaryOp {
                op: UnaryOpKind::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_expr("1 +").is_err());
        assert!(parse_expr("(1").is_err());
        assert!(parse_expr("'abc").is_err());
        assert!(parse_expr("a if b else c").is_err());
    }
}
