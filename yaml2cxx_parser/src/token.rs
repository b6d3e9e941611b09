//! Token definitions for the Python expression subset
//!
//! Covers exactly the surface the fixture corpus uses: literals, names,
//! calls, subscripts, lambdas, comprehensions and the operator set below.

use logos::Logos;

/// Python expression tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("lambda")]
    KwLambda,
    #[token("for")]
    KwFor,
    #[token("in")]
    KwIn,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("not")]
    KwNot,
    #[token("and")]
    KwAnd,
    #[token("or")]
    KwOr,

    // ==================== Literals ====================
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    KwNone,

    /// Float: 1.5, .5, 1., 1e10, 1.0e-5
    #[regex(r"([0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?)|(\.[0-9][0-9_]*([eE][+-]?[0-9]+)?)|([0-9][0-9_]*[eE][+-]?[0-9]+)")]
    FloatLiteral,
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexLiteral,
    #[regex(r"[0-9][0-9_]*")]
    DecimalLiteral,

    /// Opening of a string literal, including any prefix (b, r, u, rb, ...).
    /// The lexer scans the body to the closing quote separately.
    #[regex(r#"[bBrRuU]{0,2}""#)]
    DoubleQuote,
    #[regex(r"[bBrRuU]{0,2}'")]
    SingleQuote,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // ==================== Operators ====================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("//")]
    SlashSlash,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
}

/// Binding powers for expression parsing, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or = 1,
    And,
    Not,
    Comparison,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Power,
    Postfix,
}

impl Token {
    /// Binding power of a binary operator, if this token is one.
    /// `**` is right-associative; every other operator is left-associative.
    pub fn binary_precedence(&self) -> Option<Precedence> {
        use Precedence::*;
        Some(match self {
            Token::KwOr => Or,
            Token::KwAnd => And,
            Token::EqEq
            | Token::NotEq
            | Token::Lt
            | Token::Gt
            | Token::LtEq
            | Token::GtEq => Comparison,
            Token::Pipe => BitOr,
            Token::Caret => BitXor,
            Token::Amp => BitAnd,
            Token::LtLt | Token::GtGt => Shift,
            Token::Plus | Token::Minus => Additive,
            Token::Star | Token::Slash | Token::SlashSlash | Token::Percent => Multiplicative,
            Token::StarStar => Power,
            _ => return None,
        })
    }

    /// Whether the token can start a unary prefix expression
    pub fn is_unary_prefix(&self) -> bool {
        matches!(
            self,
            Token::Plus | Token::Minus | Token::Tilde | Token::KwNot
        )
    }

    /// Whether the token is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::EqEq | Token::NotEq | Token::Lt | Token::Gt | Token::LtEq | Token::GtEq
        )
    }

    /// Human-readable spelling for diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Token::KwLambda => "lambda",
            Token::KwFor => "for",
            Token::KwIn => "in",
            Token::KwIf => "if",
            Token::KwElse => "else",
            Token::KwNot => "not",
            Token::KwAnd => "and",
            Token::KwOr => "or",
            Token::True => "True",
            Token::False => "False",
            Token::KwNone => "None",
            Token::FloatLiteral => "float literal",
            Token::HexLiteral => "hex literal",
            Token::DecimalLiteral => "integer literal",
            Token::DoubleQuote | Token::SingleQuote => "string literal",
            Token::Identifier => "identifier",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::StarStar => "**",
            Token::Star => "*",
            Token::SlashSlash => "//",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::LtLt => "<<",
            Token::GtGt => ">>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Amp => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Tilde => "~",
            Token::Eq => "=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Dot => ".",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::Or < Precedence::And);
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert!(Precedence::Multiplicative < Precedence::Power);
    }

    #[test]
    fn test_binary_precedence() {
        assert_eq!(
            Token::Plus.binary_precedence(),
            Some(Precedence::Additive)
        );
        assert_eq!(
            Token::StarStar.binary_precedence(),
            Some(Precedence::Power)
        );
        assert_eq!(Token::LParen.binary_precedence(), None);
    }
}
