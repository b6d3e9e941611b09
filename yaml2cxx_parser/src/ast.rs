//! Expression tree for the Python subset
//!
//! A closed, tagged union mirroring the shape of Python's `ast` module for
//! the constructs the fixture corpus actually uses. Nodes are immutable once
//! built; consumers walk them, they never rewrite them.
//!
//! Constructs the downstream translator cannot express (call unpacking,
//! chained comparisons, `and`/`or`, set literals, multi-generator
//! comprehensions) are still representable here so the consumer can reject
//! them with a precise description instead of a parse failure.

use serde::Serialize;

/// A numeric literal, keeping its source spelling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NumLit {
    Int { text: String },
    Float { text: String },
}

impl NumLit {
    /// Source spelling of the literal
    pub fn text(&self) -> &str {
        match self {
            NumLit::Int { text } | NumLit::Float { text } => text,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOpKind {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// `and` / `or`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoolOpKind {
    And,
    Or,
}

/// A named (or `**`-unpacked, when `name` is `None`) call argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub name: Option<String>,
    pub value: Expr,
}

/// One `for target in iter [if cond]*` clause of a comprehension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comprehension {
    pub target: Box<Expr>,
    pub iter: Box<Expr>,
    pub ifs: Vec<Expr>,
}

/// Subscript argument: a single index or a slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Index {
    Item(Box<Expr>),
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
}

/// Parsed Python expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Num(NumLit),
    Str(String),
    Bytes(Vec<u8>),
    Name(String),
    Bool(bool),
    NoneLit,
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Subscript {
        value: Box<Expr>,
        index: Index,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOpKind,
        operand: Box<Expr>,
    },
    BoolOp {
        op: BoolOpKind,
        values: Vec<Expr>,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    Lambda {
        params: Vec<String>,
        vararg: Option<String>,
        kwarg: Option<String>,
        body: Box<Expr>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Set(Vec<Expr>),
    ListComp {
        element: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    /// `*expr` in a call argument position
    Starred(Box<Expr>),
}

impl Expr {
    /// Short node-kind name for diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Num(_) => "number literal",
            Expr::Str(_) => "string literal",
            Expr::Bytes(_) => "bytes literal",
            Expr::Name(_) => "name",
            Expr::Bool(_) => "boolean literal",
            Expr::NoneLit => "None",
            Expr::Attribute { .. } => "attribute access",
            Expr::Call { .. } => "call",
            Expr::Subscript { .. } => "subscript",
            Expr::BinOp { .. } => "binary operation",
            Expr::UnaryOp { .. } => "unary operation",
            Expr::BoolOp { .. } => "boolean operator",
            Expr::Compare { .. } => "comparison",
            Expr::Lambda { .. } => "lambda",
            Expr::List(_) => "list literal",
            Expr::Tuple(_) => "tuple literal",
            Expr::Dict(_) => "dict literal",
            Expr::Set(_) => "set literal",
            Expr::ListComp { .. } => "list comprehension",
            Expr::Starred(_) => "argument unpacking",
        }
    }

    /// Whether the expression is the null sentinel (`None` or the bare
    /// identifier `null` some fixtures use)
    pub fn is_null(&self) -> bool {
        match self {
            Expr::NoneLit => true,
            Expr::Name(n) => n == "None" || n == "null",
            _ => false,
        }
    }

    /// Whether the expression is a boolean literal (including the spelled-out
    /// identifiers `true`/`false` found in cross-driver fixtures)
    pub fn is_bool(&self) -> bool {
        match self {
            Expr::Bool(_) => true,
            Expr::Name(n) => matches!(n.as_str(), "true" | "false" | "True" | "False"),
            _ => false,
        }
    }

    /// Whether any node in the tree is a reference to `name`
    pub fn mentions_name(&self, name: &str) -> bool {
        match self {
            Expr::Name(n) => n == name,
            Expr::Num(_) | Expr::Str(_) | Expr::Bytes(_) | Expr::Bool(_) | Expr::NoneLit => false,
            Expr::Attribute { value, .. } | Expr::Starred(value) => value.mentions_name(name),
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                func.mentions_name(name)
                    || args.iter().any(|a| a.mentions_name(name))
                    || keywords.iter().any(|k| k.value.mentions_name(name))
            }
            Expr::Subscript { value, index } => {
                value.mentions_name(name)
                    || match index {
                        Index::Item(i) => i.mentions_name(name),
                        Index::Slice { lower, upper, step } => [lower, upper, step]
                            .into_iter()
                            .flatten()
                            .any(|e| e.mentions_name(name)),
                    }
            }
            Expr::BinOp { left, right, .. } => {
                left.mentions_name(name) || right.mentions_name(name)
            }
            Expr::UnaryOp { operand, .. } => operand.mentions_name(name),
            Expr::BoolOp { values, .. } => values.iter().any(|e| e.mentions_name(name)),
            Expr::Compare {
                left, comparators, ..
            } => left.mentions_name(name) || comparators.iter().any(|e| e.mentions_name(name)),
            Expr::Lambda { body, .. } => body.mentions_name(name),
            Expr::List(elts) | Expr::Tuple(elts) | Expr::Set(elts) => {
                elts.iter().any(|e| e.mentions_name(name))
            }
            Expr::Dict(pairs) => pairs
                .iter()
                .any(|(k, v)| k.mentions_name(name) || v.mentions_name(name)),
            Expr::ListComp {
                element,
                generators,
            } => {
                element.mentions_name(name)
                    || generators.iter().any(|g| {
                        g.iter.mentions_name(name) || g.ifs.iter().any(|e| e.mentions_name(name))
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(Expr::NoneLit.is_null());
        assert!(Expr::Name("null".into()).is_null());
        assert!(!Expr::Name("x".into()).is_null());
    }

    #[test]
    fn test_mentions_name() {
        let expr = Expr::Call {
            func: Box::new(Expr::Name("frozenset".into())),
            args: vec![Expr::Num(NumLit::Int { text: "1".into() })],
            keywords: vec![],
        };
        assert!(expr.mentions_name("frozenset"));
        assert!(!expr.mentions_name("set"));
    }
}
