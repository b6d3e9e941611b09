//! C++ operator precedence table
//!
//! Levels follow the C++ operator table; lower numbers bind tighter.
//! Parenthesization is decided purely by these numbers, never by node kind:
//! a child is wrapped iff its level is >= the threshold its parent passed
//! down. The inequality is non-strict, so equal-precedence right operands
//! of left-associative operators pick up redundant but harmless parens.

use yaml2cxx_parser::{BinOpKind, CmpOp, UnaryOpKind};

use crate::error::{TranslateError, TranslateResult};

/// Postfix expressions: calls, member access, subscripts
pub const POSTFIX: u8 = 2;
/// Prefix unary operators (also the local-variable dereference `*x`)
pub const UNARY: u8 = 3;
pub const MULTIPLICATIVE: u8 = 5;
pub const ADDITIVE: u8 = 6;
pub const RELATIONAL: u8 = 8;
pub const EQUALITY: u8 = 9;
pub const LOGICAL_AND: u8 = 13;
pub const LOGICAL_OR: u8 = 14;
/// Assignment right-hand sides
pub const STATEMENT: u8 = 15;
/// Argument positions and unconstrained sub-expressions
pub const LOOSEST: u8 = 17;

/// How an operator renders in C++
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpForm {
    /// Infix operator with a precedence level
    Infix { symbol: &'static str, prec: u8 },
    /// No C++ infix form; renders as a named call (`pow(a, b)`)
    Func { name: &'static str },
}

/// C++ form of a Python binary operator
pub fn binary_form(op: BinOpKind) -> TranslateResult<OpForm> {
    use OpForm::*;
    Ok(match op {
        BinOpKind::Add => Infix { symbol: "+", prec: ADDITIVE },
        BinOpKind::Sub => Infix { symbol: "-", prec: ADDITIVE },
        BinOpKind::Mul => Infix { symbol: "*", prec: MULTIPLICATIVE },
        BinOpKind::Div => Infix { symbol: "/", prec: MULTIPLICATIVE },
        BinOpKind::Mod => Infix { symbol: "%", prec: MULTIPLICATIVE },
        BinOpKind::Pow => Func { name: "pow" },
        // The fixtures spell logical and/or with the bitwise operators
        BinOpKind::BitAnd => Infix { symbol: "&&", prec: LOGICAL_AND },
        BinOpKind::BitOr => Infix { symbol: "||", prec: LOGICAL_OR },
        BinOpKind::FloorDiv => {
            return Err(TranslateError::unhandled("operator: floor division"))
        }
        BinOpKind::BitXor => return Err(TranslateError::unhandled("operator: ^")),
        BinOpKind::LShift => return Err(TranslateError::unhandled("operator: <<")),
        BinOpKind::RShift => return Err(TranslateError::unhandled("operator: >>")),
    })
}

/// C++ symbol and precedence of a comparison operator (always infix)
pub fn compare_form(op: CmpOp) -> (&'static str, u8) {
    match op {
        CmpOp::Eq => ("==", EQUALITY),
        CmpOp::NotEq => ("!=", EQUALITY),
        CmpOp::Lt => ("<", RELATIONAL),
        CmpOp::Gt => (">", RELATIONAL),
        CmpOp::LtEq => ("<=", RELATIONAL),
        CmpOp::GtEq => (">=", RELATIONAL),
    }
}

/// C++ prefix symbol and precedence of a unary operator
pub fn unary_form(op: UnaryOpKind) -> TranslateResult<(&'static str, u8)> {
    match op {
        UnaryOpKind::Neg => Ok(("-", UNARY)),
        UnaryOpKind::Invert => Ok(("!", UNARY)),
        UnaryOpKind::Pos => Err(TranslateError::unhandled("operator: unary +")),
        UnaryOpKind::Not => Err(TranslateError::unhandled("operator: not")),
    }
}

/// Wrap `text` in parentheses iff its precedence does not satisfy the
/// caller's threshold
pub fn parens(min_prec: u8, prec: u8, text: String) -> String {
    if prec >= min_prec {
        format!("({})", text)
    } else {
        text
    }
}
