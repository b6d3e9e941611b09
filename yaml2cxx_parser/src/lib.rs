//! yaml2cxx_parser
//!
//! Pure Rust parser for the Python expression subset embedded in polyglot
//! YAML test fixtures. Produces a typed expression tree for the yaml2cxx
//! translator; it never evaluates or type-checks anything.
//!
//! # Example
//!
//! ```
//! use yaml2cxx_parser::{parse_expr, Expr};
//!
//! let expr = parse_expr("r.expr(1) + 2").expect("parse failed");
//! assert!(matches!(expr, Expr::BinOp { .. }));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{BinOpKind, BoolOpKind, CmpOp, Comprehension, Expr, Index, Keyword, NumLit,
              UnaryOpKind};
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::{parse_expr, Parser};
pub use span::Span;
pub use token::{Precedence, Token};

/// Tokenize a Python expression
///
/// Returns a vector of tokens with their spans.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken<'_>, ParseError>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
