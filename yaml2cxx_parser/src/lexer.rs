//! Lexer for Python fixture expressions
//!
//! Wraps the logos-generated lexer with string-body scanning, so content
//! inside string literals is never tokenized.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// Python expression lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    /// Peeked token (for lookahead)
    peeked: Option<Result<SpannedToken<'a>, ParseError>>,
}

impl<'a> std::fmt::Debug for Lexer<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer").field("source", &self.source).finish()
    }
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given expression source
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    /// Get the source text
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&Result<SpannedToken<'a>, ParseError>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token_internal();
        }
        self.peeked.as_ref()
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<SpannedToken<'a>, ParseError>> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Option<Result<SpannedToken<'a>, ParseError>> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let (start, end) = (span.start, span.end);

        match result {
            Ok(token @ (Token::DoubleQuote | Token::SingleQuote)) => {
                // The matched text is the prefix plus the opening quote.
                // Scan ahead to the closing quote so string content is
                // never fed back through the token rules.
                let quote = if token == Token::DoubleQuote { b'"' } else { b'\'' };
                match self.scan_string_to_close(end, quote) {
                    Ok(string_end) => {
                        self.bump_to(string_end);
                        let span = Span::new(start, string_end);
                        let text = &self.source[start..string_end];
                        Some(Ok(SpannedToken::new(token, span, text)))
                    }
                    Err(e) => {
                        self.bump_to(self.source.len());
                        Some(Err(e))
                    }
                }
            }

            Ok(token) => {
                let span = Span::new(start, end);
                let text = &self.source[start..end];
                Some(Ok(SpannedToken::new(token, span, text)))
            }

            Err(()) => Some(Err(ParseError::LexerError {
                span: Span::new(start, end),
            })),
        }
    }

    /// Scan string content to find the closing quote.
    /// Uses memchr to jump between backslashes and quote candidates.
    fn scan_string_to_close(&self, start: usize, quote: u8) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr2(b'\\', quote, &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    if bytes[pos] == b'\\' {
                        // Skip the escaped character (even in raw strings a
                        // backslash prevents the next quote from closing).
                        pos += 2;
                        continue;
                    }
                    return Ok(pos + 1);
                }
            }
        }

        Err(ParseError::UnterminatedString {
            span: Span::new(start.saturating_sub(1), self.source.len()),
        })
    }

    /// Advance the inner lexer to an absolute byte position
    fn bump_to(&mut self, pos: usize) {
        let current = self.inner.span().end;
        if pos > current {
            self.inner.bump(pos - current);
        }
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<Result<SpannedToken<'a>, ParseError>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<SpannedToken<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize an expression into a vector of spanned tokens
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken<'_>, ParseError>> {
    Lexer::new(source).collect_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(|r| r.ok())
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("r.expr([1, 2]) + x"),
            vec![
                Token::Identifier,
                Token::Dot,
                Token::Identifier,
                Token::LParen,
                Token::LBracket,
                Token::DecimalLiteral,
                Token::Comma,
                Token::DecimalLiteral,
                Token::RBracket,
                Token::RParen,
                Token::Plus,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_string_spans_whole_literal() {
        let tokens = tokenize(r#""a[b" + 'c'"#);
        let tokens: Vec<_> = tokens.into_iter().filter_map(|r| r.ok()).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token, Token::DoubleQuote);
        assert_eq!(tokens[0].text, "\"a[b\"");
        assert_eq!(tokens[2].token, Token::SingleQuote);
        assert_eq!(tokens[2].text, "'c'");
    }

    #[test]
    fn test_prefixed_string() {
        let tokens = tokenize(r#"b'\x00'"#);
        let tokens: Vec<_> = tokens.into_iter().filter_map(|r| r.ok()).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::SingleQuote);
        assert_eq!(tokens[0].text, r#"b'\x00'"#);
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let tokens = tokenize(r#""a\"b""#);
        let tokens: Vec<_> = tokens.into_iter().filter_map(|r| r.ok()).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, r#""a\"b""#);
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = tokenize("\"abc");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_err());
    }

    #[test]
    fn test_number_kinds() {
        assert_eq!(
            kinds("1 1.5 .5 1e10 0xff"),
            vec![
                Token::DecimalLiteral,
                Token::FloatLiteral,
                Token::FloatLiteral,
                Token::FloatLiteral,
                Token::HexLiteral,
            ]
        );
    }

    #[test]
    fn test_peek() {
        let mut lexer = Lexer::new("a b");
        let peeked = lexer.peek().unwrap().as_ref().unwrap();
        assert_eq!(peeked.text, "a");
        let next = lexer.next_token().unwrap().unwrap();
        assert_eq!(next.text, "a");
        let next = lexer.next_token().unwrap().unwrap();
        assert_eq!(next.text, "b");
    }
}
