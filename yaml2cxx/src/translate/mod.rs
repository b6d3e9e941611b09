//! Expression translator
//!
//! Walks a parsed Python expression and emits the equivalent C++ driver
//! expression. Pure computation: a function of (node, precedence threshold,
//! context) with no I/O and no state across calls. Callers pick the
//! precedence threshold below which the result must stand unparenthesized;
//! the context carries bound closure variables and the output flavor.

pub mod ops;
pub mod strings;

use yaml2cxx_parser::{BinOpKind, Comprehension, Expr, Index, Keyword, NumLit, UnaryOpKind};

use crate::error::{TranslateError, TranslateResult};
use ops::OpForm;

/// Integers above this magnitude (2^52) are emitted as floats, since the
/// driver's number type loses integer exactness past it
const FLOAT_CUTOFF: u128 = 4_503_599_627_370_496;

/// Recursion guard; fixture expressions are shallow, anything past this is
/// pathological input and fails closed
const MAX_DEPTH: u32 = 200;

/// Output flavor of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Query-builder expression: bare literals wrap as `R::expr(...)`
    Query,
    /// Plain datum (expected outputs, run options)
    Value,
    /// Plain datum whose strings become length-carrying `std::string`
    Text,
}

/// Transient syntactic position, consumed on entry and never inherited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pos {
    Neutral,
    /// The expression is the callee of a call
    Callee,
}

/// Translation context, threaded immutably through the recursion
#[derive(Debug, Clone)]
pub struct Ctx {
    vars: Vec<String>,
    flavor: Flavor,
    pos: Pos,
    depth: u32,
}

impl Ctx {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            vars: Vec::new(),
            flavor,
            pos: Pos::Neutral,
            depth: 0,
        }
    }

    fn is_query(&self) -> bool {
        self.flavor == Flavor::Query
    }

    fn is_local(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v == name)
    }

    /// Child context: position resets to neutral, depth is checked
    fn descend(&self) -> TranslateResult<Ctx> {
        if self.depth >= MAX_DEPTH {
            return Err(TranslateError::unhandled(format!(
                "expression nesting deeper than {}",
                MAX_DEPTH
            )));
        }
        Ok(Ctx {
            vars: self.vars.clone(),
            flavor: self.flavor,
            pos: Pos::Neutral,
            depth: self.depth + 1,
        })
    }

    fn with_flavor(&self, flavor: Flavor) -> Ctx {
        Ctx {
            flavor,
            ..self.clone()
        }
    }

    fn as_callee(&self) -> Ctx {
        Ctx {
            pos: Pos::Callee,
            ..self.clone()
        }
    }

    /// Extended copy with additional bound closure variables
    fn with_locals(&self, names: &[String]) -> Ctx {
        let mut vars = self.vars.clone();
        vars.extend(names.iter().cloned());
        Ctx {
            vars,
            ..self.clone()
        }
    }
}

/// Translate an expression into C++ text.
///
/// `min_prec` is the precedence threshold below which the caller requires
/// the result to be unparenthesized; children at or above it get wrapped.
pub fn translate(expr: &Expr, min_prec: u8, ctx: &Ctx) -> TranslateResult {
    let pos = ctx.pos;
    let ctx = ctx.descend()?;
    match expr {
        Expr::Num(lit) => Ok(emit_num(lit)),
        Expr::Str(s) => Ok(strings::emit_str(s, ctx.flavor)),
        Expr::Bytes(b) => Ok(strings::emit_bytes(b, ctx.flavor)),
        Expr::Bool(v) => Ok(if *v { "true" } else { "false" }.to_string()),
        Expr::NoneLit => Ok("R::Nil()".to_string()),
        Expr::Name(id) => translate_name(id, min_prec, &ctx),
        Expr::Attribute { value, attr } => translate_attribute(value, attr, pos, &ctx),
        Expr::Call {
            func,
            args,
            keywords,
        } => translate_call(func, args, keywords, &ctx),
        Expr::Subscript { value, index } => translate_subscript(value, index, &ctx),
        Expr::Dict(pairs) => translate_dict(pairs, &ctx),
        Expr::List(elts) | Expr::Tuple(elts) => translate_sequence(elts, &ctx),
        Expr::Lambda {
            params,
            vararg,
            kwarg,
            body,
        } => translate_lambda(params, vararg, kwarg, body, &ctx),
        Expr::BinOp { left, op, right } => translate_binop(left, *op, right, min_prec, &ctx),
        Expr::Compare {
            left,
            ops: cmp_ops,
            comparators,
        } => translate_compare(left, cmp_ops, comparators, min_prec, &ctx),
        Expr::UnaryOp { op, operand } => translate_unary(*op, operand, min_prec, &ctx),
        Expr::ListComp {
            element,
            generators,
        } => translate_comprehension(element, generators, &ctx),
        Expr::BoolOp { .. } => Err(TranslateError::unhandled(
            "python and/or operator (fixtures use & and |)",
        )),
        Expr::Set(_) => Err(TranslateError::unhandled("set literal")),
        Expr::Starred(_) => Err(TranslateError::unhandled("argument unpacking")),
    }
}

/// Translate with query-literal wrapping: in query flavor a bare literal
/// standing where a query expression is expected becomes `R::expr(...)` so
/// it type-unifies with query-returning siblings. Positional call arguments
/// do not come through here; the call transformation wraps those itself.
pub fn translate_wrapped(expr: &Expr, min_prec: u8, ctx: &Ctx) -> TranslateResult {
    let bare_literal = matches!(expr, Expr::Num(_) | Expr::Str(_) | Expr::Bytes(_))
        || expr.is_null()
        || expr.is_bool();
    if ctx.is_query() && bare_literal {
        return Ok(format!("R::expr({})", translate(expr, ops::LOOSEST, ctx)?));
    }
    translate(expr, min_prec, ctx)
}

fn emit_num(lit: &NumLit) -> String {
    match lit {
        NumLit::Float { text } => text.clone(),
        NumLit::Int { text } => {
            let value = if let Some(hex) = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
            {
                i128::from_str_radix(hex, 16).ok()
            } else {
                text.parse::<i128>().ok()
            };
            match value {
                Some(v) if v.unsigned_abs() <= FLOAT_CUTOFF => v.to_string(),
                Some(v) => format!("{}.0", v),
                // does not even fit i128: decimal digits, forced float
                None => format!("{}.0", text),
            }
        }
    }
}

fn translate_name(id: &str, min_prec: u8, ctx: &Ctx) -> TranslateResult {
    if id == "frozenset" {
        return Err(TranslateError::discard("frozenset not supported"));
    }
    if ctx.is_local(id) {
        // bound closure variables are R::Var handles; dereference on use
        return Ok(ops::parens(min_prec, ops::UNARY, format!("*{}", id)));
    }
    if (id == "range" || id == "xrange") && !ctx.is_query() {
        return Ok("array_range".to_string());
    }
    if id == "nil" && ctx.is_query() {
        return Ok("R::expr(nil)".to_string());
    }
    Ok(strings::rename(id))
}

fn translate_attribute(value: &Expr, attr: &str, pos: Pos, ctx: &Ctx) -> TranslateResult {
    if let Expr::Name(base) = value {
        if base == "r" {
            // `r.error` names the zero-argument error constructor, unless it
            // is being called, in which case the call supplies the argument
            if attr == "error" && pos != Pos::Callee {
                return Ok("R::error()".to_string());
            }
            if attr == "binary" {
                return Ok(if ctx.is_query() { "R::binary" } else { "R::Binary" }.to_string());
            }
            return Ok(strings::rename(&format!("R::{}", attr)));
        }
        if base == "datetime" {
            if attr == "fromtimestamp" {
                return Ok("R::Time".to_string());
            }
            if attr == "now" {
                return Ok("R::Time::now".to_string());
            }
        }
    }
    if attr == "RqlTzinfo" {
        return Ok("R::Time::parse_utc_offset".to_string());
    }
    if attr == "encode" || attr == "close" {
        return Err(TranslateError::discard(format!("{} not supported", attr)));
    }
    Ok(format!(
        "{}.{}",
        translate_wrapped(value, ops::POSTFIX, ctx)?,
        strings::rename(attr)
    ))
}

/// Arguments of a call rooted at `r` (or chained off another call) are
/// translated in query flavor
fn argument_ctx(func: &Expr, ctx: &Ctx) -> Ctx {
    let mut it = func;
    while let Expr::Attribute { value, .. } = it {
        it = value;
        if matches!(it, Expr::Call { .. }) {
            return ctx.with_flavor(Flavor::Query);
        }
    }
    if let Expr::Name(base) = it {
        if base == "r" {
            return ctx.with_flavor(Flavor::Query);
        }
    }
    ctx.clone()
}

fn translate_call(
    func: &Expr,
    args: &[Expr],
    keywords: &[Keyword],
    ctx: &Ctx,
) -> TranslateResult {
    if args.iter().any(|a| matches!(a, Expr::Starred(_))) {
        return Err(TranslateError::unhandled("call argument unpacking (*args)"));
    }
    let callee = translate(func, ops::POSTFIX, &ctx.as_callee())?;
    let arg_ctx = argument_ctx(func, ctx);

    let positional = args
        .iter()
        .map(|arg| translate(arg, ops::LOOSEST, &arg_ctx))
        .collect::<TranslateResult<Vec<_>>>()?;

    let mut out = format!("{}({}", callee, positional.join(", "));
    if !keywords.is_empty() {
        let mut opts = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let Some(name) = &keyword.name else {
                return Err(TranslateError::unhandled("call argument unpacking (**kwargs)"));
            };
            opts.push(format!(
                "{{{}, R::expr({})}}",
                strings::quote_text(name),
                translate(&keyword.value, ops::LOOSEST, &arg_ctx)?
            ));
        }
        if !args.is_empty() {
            out.push_str(", ");
        }
        out.push_str(&format!("R::OptArgs{{{}}}", opts.join(", ")));
    }
    out.push(')');
    Ok(out)
}

fn translate_subscript(value: &Expr, index: &Index, ctx: &Ctx) -> TranslateResult {
    let base = translate(value, ops::POSTFIX, ctx)?;
    match index {
        Index::Item(item) => Ok(format!(
            "{}[{}]",
            base,
            translate(item, ops::LOOSEST, ctx)?
        )),
        Index::Slice { step: Some(_), .. } => {
            Err(TranslateError::unhandled("slice with a step"))
        }
        Index::Slice { lower, upper, .. } => match (lower, upper) {
            (Some(lower), Some(upper)) => Ok(format!(
                "{}.slice({}, {})",
                base,
                translate(lower, ops::LOOSEST, ctx)?,
                translate(upper, ops::LOOSEST, ctx)?
            )),
            (Some(lower), None) => Ok(format!(
                "{}.slice({})",
                base,
                translate(lower, ops::LOOSEST, ctx)?
            )),
            (None, Some(upper)) => Ok(format!(
                "{}.limit({})",
                base,
                translate(upper, ops::LOOSEST, ctx)?
            )),
            (None, None) => Err(TranslateError::unhandled("slice with no bounds")),
        },
    }
}

fn translate_dict(pairs: &[(Expr, Expr)], ctx: &Ctx) -> TranslateResult {
    if ctx.is_query() {
        let parts = pairs
            .iter()
            .map(|(k, v)| {
                Ok(format!(
                    "{}, {}",
                    translate(k, ops::LOOSEST, ctx)?,
                    translate(v, ops::LOOSEST, ctx)?
                ))
            })
            .collect::<TranslateResult<Vec<_>>>()?;
        return Ok(format!("R::object({})", parts.join(", ")));
    }
    let parts = pairs
        .iter()
        .map(|(k, v)| {
            Ok(format!(
                "{{{}, {}}}",
                dict_key(k)?,
                translate(v, ops::LOOSEST, ctx)?
            ))
        })
        .collect::<TranslateResult<Vec<_>>>()?;
    Ok(format!("R::Object{{{}}}", parts.join(", ")))
}

/// Plain-value dict keys must already be string or numeric literals
fn dict_key(key: &Expr) -> TranslateResult {
    match key {
        Expr::Str(s) => Ok(strings::quote_text(s)),
        Expr::Num(lit) => Ok(strings::quote_text(&emit_num(lit))),
        _ if key.mentions_name("frozenset") => {
            Err(TranslateError::discard("frozenset dict key"))
        }
        other => Err(TranslateError::unhandled(format!(
            "dict key is not a literal: {}",
            other.describe()
        ))),
    }
}

fn translate_sequence(elts: &[Expr], ctx: &Ctx) -> TranslateResult {
    let parts = elts
        .iter()
        .map(|e| translate(e, ops::LOOSEST, ctx))
        .collect::<TranslateResult<Vec<_>>>()?;
    if ctx.is_query() {
        Ok(format!("R::array({})", parts.join(", ")))
    } else {
        Ok(format!("R::Array{{{}}}", parts.join(", ")))
    }
}

fn translate_lambda(
    params: &[String],
    vararg: &Option<String>,
    kwarg: &Option<String>,
    body: &Expr,
    ctx: &Ctx,
) -> TranslateResult {
    if vararg.is_some() {
        return Err(TranslateError::unhandled("lambda *args parameter"));
    }
    if kwarg.is_some() {
        return Err(TranslateError::unhandled("lambda **kwargs parameter"));
    }
    // lambda bodies are evaluation thunks for query combinators, so they
    // always re-enter query flavor
    let inner = ctx.with_locals(params).with_flavor(Flavor::Query);
    let body_text = translate_wrapped(body, ops::LOOSEST, &inner)?;
    let params_text = params
        .iter()
        .map(|p| format!("R::Var {}", p))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("[=]({}){{ return {}; }}", params_text, body_text))
}

fn translate_binop(
    left: &Expr,
    op: BinOpKind,
    right: &Expr,
    min_prec: u8,
    ctx: &Ctx,
) -> TranslateResult {
    // C++ has no string * int; render as a repeat() call
    if op == BinOpKind::Mul && matches!(left, Expr::Str(_)) {
        return Ok(format!(
            "repeat({}, {})",
            translate(left, ops::LOOSEST, ctx)?,
            translate(right, ops::LOOSEST, ctx)?
        ));
    }
    let form = ops::binary_form(op)?;
    let is_list_literal =
        |e: &Expr| matches!(e, Expr::List(_) | Expr::ListComp { .. });
    if op == BinOpKind::Add && is_list_literal(left) && is_list_literal(right) {
        let prec = match form {
            OpForm::Infix { prec, .. } => prec,
            OpForm::Func { .. } => ops::LOOSEST,
        };
        return Ok(format!(
            "append({}, {})",
            translate_wrapped(left, prec, ctx)?,
            translate(right, prec, ctx)?
        ));
    }
    match form {
        OpForm::Infix { symbol, prec } => Ok(ops::parens(
            min_prec,
            prec,
            format!(
                "{} {} {}",
                translate_wrapped(left, prec, ctx)?,
                symbol,
                translate(right, prec, ctx)?
            ),
        )),
        OpForm::Func { name } => Ok(format!(
            "{}({}, {})",
            name,
            translate(left, ops::LOOSEST, ctx)?,
            translate(right, ops::LOOSEST, ctx)?
        )),
    }
}

fn translate_compare(
    left: &Expr,
    cmp_ops: &[yaml2cxx_parser::CmpOp],
    comparators: &[Expr],
    min_prec: u8,
    ctx: &Ctx,
) -> TranslateResult {
    if cmp_ops.len() != 1 || comparators.len() != 1 {
        return Err(TranslateError::unhandled("chained comparison"));
    }
    let (symbol, prec) = ops::compare_form(cmp_ops[0]);
    Ok(ops::parens(
        min_prec,
        prec,
        format!(
            "{}{}{}",
            translate_wrapped(left, prec, ctx)?,
            symbol,
            translate(&comparators[0], prec, ctx)?
        ),
    ))
}

fn translate_unary(
    op: UnaryOpKind,
    operand: &Expr,
    min_prec: u8,
    ctx: &Ctx,
) -> TranslateResult {
    let (symbol, prec) = ops::unary_form(op)?;
    Ok(ops::parens(
        min_prec,
        prec,
        format!("{}{}", symbol, translate(operand, prec, ctx)?),
    ))
}

fn translate_comprehension(
    element: &Expr,
    generators: &[Comprehension],
    ctx: &Ctx,
) -> TranslateResult {
    if generators.len() != 1 {
        return Err(TranslateError::unhandled(
            "comprehension with multiple generators",
        ));
    }
    let generator = &generators[0];
    if !generator.ifs.is_empty() {
        return Err(TranslateError::unhandled("comprehension condition"));
    }
    let Expr::Name(var) = generator.target.as_ref() else {
        return Err(TranslateError::unhandled(
            "destructuring comprehension target",
        ));
    };
    let seq = translate(&generator.iter, ops::POSTFIX, ctx)?;
    if ctx.is_query() {
        let inner = ctx
            .with_locals(std::slice::from_ref(var))
            .with_flavor(Flavor::Query);
        let body = translate(element, ops::LOOSEST, &inner)?;
        Ok(format!(
            "{}.map([=](R::Var {}){{ return {}; }})",
            seq, var, body
        ))
    } else {
        // in plain-value positions the mapping is identity enough for the
        // corpus: only the sequence matters
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yaml2cxx_parser::parse_expr;

    fn query(source: &str) -> String {
        translate(
            &parse_expr(source).unwrap(),
            ops::LOOSEST,
            &Ctx::new(Flavor::Query),
        )
        .unwrap()
    }

    fn value(source: &str) -> String {
        translate(
            &parse_expr(source).unwrap(),
            ops::LOOSEST,
            &Ctx::new(Flavor::Value),
        )
        .unwrap()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(query("42"), "42");
        assert_eq!(query("1.5"), "1.5");
        // past 2^52 integers force float spelling
        assert_eq!(query("9007199254740994"), "9007199254740994.0");
        assert_eq!(query("4503599627370496"), "4503599627370496");
    }

    #[test]
    fn test_root_library_attribute() {
        assert_eq!(query("r.expr(1)"), "R::expr(1)");
        assert_eq!(query("r.table('t')"), "R::table(\"t\")");
        // reserved word member gets the collision marker
        assert_eq!(query("r.union(a, b)"), "R::union_(a, b)");
    }

    #[test]
    fn test_error_symbol_depends_on_position() {
        assert_eq!(query("r.error"), "R::error()");
        assert_eq!(query("r.error('boom')"), "R::error(\"boom\")");
    }

    #[test]
    fn test_call_optargs() {
        assert_eq!(
            query("tbl.insert(doc, durability='soft')"),
            "tbl.insert(doc, R::OptArgs{{\"durability\", R::expr(\"soft\")}})"
        );
        // no positional args: no leading comma
        assert_eq!(
            query("tbl.delete(durability='soft')"),
            "tbl.delete_(R::OptArgs{{\"durability\", R::expr(\"soft\")}})"
        );
    }

    #[test]
    fn test_argument_flavor_from_root() {
        // arguments of a call rooted at r are query-flavored, so the dict
        // becomes R::object
        assert_eq!(
            value("r.expr({'a': 1})"),
            "R::expr(R::object(\"a\", 1))"
        );
    }

    #[test]
    fn test_aggregates_by_flavor() {
        assert_eq!(query("[1, 2]"), "R::array(1, 2)");
        assert_eq!(value("[1, 2]"), "R::Array{1, 2}");
        assert_eq!(query("(1, 2)"), "R::array(1, 2)");
        assert_eq!(value("{'a': 1}"), "R::Object{{\"a\", 1}}");
        assert_eq!(query("{'a': 1}"), "R::object(\"a\", 1)");
    }

    #[test]
    fn test_plain_dict_key_must_be_literal() {
        assert_eq!(value("{1: 'x'}"), "R::Object{{\"1\", \"x\"}}");
        assert!(matches!(
            translate(
                &parse_expr("{k: 'x'}").unwrap(),
                ops::LOOSEST,
                &Ctx::new(Flavor::Value)
            ),
            Err(TranslateError::Unhandled(_))
        ));
    }

    #[test]
    fn test_lambda() {
        assert_eq!(
            query("lambda x: x + 1"),
            "[=](R::Var x){ return *x + 1; }"
        );
    }

    #[test]
    fn test_lambda_unpacking_rejected() {
        let expr = parse_expr("lambda *a: 1").unwrap();
        assert!(matches!(
            translate(&expr, ops::LOOSEST, &Ctx::new(Flavor::Query)),
            Err(TranslateError::Unhandled(_))
        ));
    }

    #[test]
    fn test_local_variable_dereference() {
        // the lambda parameter is dereferenced, an unrelated name is not
        assert_eq!(
            query("lambda x: x.add(y)"),
            "[=](R::Var x){ return (*x).add(y); }"
        );
    }

    #[test]
    fn test_query_literal_wrapping() {
        let expr = parse_expr("1").unwrap();
        assert_eq!(
            translate_wrapped(&expr, ops::LOOSEST, &Ctx::new(Flavor::Query)).unwrap(),
            "R::expr(1)"
        );
        // not in value flavor
        assert_eq!(
            translate_wrapped(&expr, ops::LOOSEST, &Ctx::new(Flavor::Value)).unwrap(),
            "1"
        );
    }

    #[test]
    fn test_null_and_bool() {
        assert_eq!(value("None"), "R::Nil()");
        assert_eq!(value("True"), "true");
        assert_eq!(query("null"), "R::Nil()");
    }

    #[test]
    fn test_depth_guard_fails_closed() {
        let mut expr = Expr::Num(NumLit::Int { text: "1".into() });
        for _ in 0..(MAX_DEPTH + 10) {
            expr = Expr::UnaryOp {
                op: UnaryOpKind::Neg,
                operand: Box::new(expr),
            };
        }
        assert!(matches!(
            translate(&expr, ops::LOOSEST, &Ctx::new(Flavor::Query)),
            Err(TranslateError::Unhandled(_))
        ));
    }

    #[test]
    fn test_frozenset_discards() {
        assert!(matches!(
            translate(
                &parse_expr("frozenset([1])").unwrap(),
                ops::LOOSEST,
                &Ctx::new(Flavor::Query)
            ),
            Err(TranslateError::Discard(_))
        ));
    }
}
