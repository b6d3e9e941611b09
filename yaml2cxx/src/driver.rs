//! Fixture-to-C++ generator
//!
//! Turns one fixture file into one C++ translation unit: a single
//! `void <name>()` function that runs every test case through the harness
//! macros. Untranslatable cases are reported on stderr and skipped; the
//! batch is marked failed so callers can propagate a non-zero exit.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DriverError, TranslateError, TranslateResult};
use crate::fixture::{py_str, CaseKind, FixtureFile, TestCase};
use crate::translate::{ops, translate, Ctx, Flavor};

/// Result of generating one fixture file
#[derive(Debug)]
pub struct GenOutput {
    /// The generated C++ translation unit
    pub code: String,
    /// Count of cases that could not be translated
    pub failures: usize,
    /// Count of cases skipped on purpose
    pub discards: usize,
}

impl GenOutput {
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Function name for a fixture path: extension dropped, separators
/// flattened to underscores
pub fn fixture_name(path: &str) -> String {
    let stem = path.split('.').next().unwrap_or(path);
    stem.replace('/', "_")
}

/// Expected outputs matching one of these describe driver-side argument
/// checking, which the C++ harness does not replicate
static DISCARD_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("Expected .* argument", "argument checks not supported"),
        ("argument .* must", "argument checks not supported"),
        ("infix bitwise", "infix bitwise not supported"),
        (
            "Object keys must be strings",
            "string object keys tests not supported",
        ),
        ("Got .* argument", "argument checks not supported"),
    ]
    .into_iter()
    .map(|(pattern, reason)| {
        (
            Regex::new(pattern).expect("discard pattern"),
            reason,
        )
    })
    .collect()
});

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A(\w+) *= *([^=].*)\z").expect("assignment pattern"));

fn maybe_discard(expected: &Option<String>) -> TranslateResult<()> {
    let Some(ot) = expected else {
        return Ok(());
    };
    for (pattern, reason) in DISCARD_PATTERNS.iter() {
        if pattern.is_match(ot) {
            return Err(TranslateError::discard(*reason));
        }
    }
    Ok(())
}

/// Parse and translate one python expression. Adjacent string literal
/// concatenations fold into a single literal.
fn convert(python: &str, min_prec: u8, flavor: Flavor) -> TranslateResult<String> {
    let expr = yaml2cxx_parser::parse_expr(python).map_err(|e| {
        TranslateError::unhandled(format!("syntax error: {}: {:?}", e, python))
    })?;
    match translate(&expr, min_prec, &Ctx::new(flavor)) {
        Ok(cxx) => Ok(cxx.replace("\" + \"", "")),
        Err(err) => {
            if !err.is_discard() {
                eprintln!("While translating: {}", python);
            }
            Err(err)
        }
    }
}

/// Line writer with explicit indentation state
#[derive(Debug)]
struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn new() -> Self {
        Writer {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn enter(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    fn exit(&mut self, text: &str) {
        self.indent -= 1;
        self.line(text);
    }
}

/// Generate the C++ translation unit for a fixture file. `path` is the
/// fixture's path as given, used for the provenance comment and the
/// function name.
pub fn generate(path: &str, file: &FixtureFile) -> GenOutput {
    let name = fixture_name(path);
    let mut w = Writer::new();
    let mut failures = 0;
    let mut discards = 0;

    w.line(&format!("// auto-generated by yaml2cxx from {}", path));
    w.line("#include \"testlib.h\"");
    w.enter(&format!("void {}() {{", name));
    w.line(&format!(
        "enter_section(\"{}: {}\");",
        name,
        file.desc.replace('"', "\\\"")
    ));

    for var in file.table_variables() {
        w.line(&format!("temp_table {}_table;", var));
        w.line(&format!("R::Query {} = {}_table.table();", var, var));
    }

    let mut defined: Vec<String> = Vec::new();
    for case in file.cases() {
        match emit_case(&mut w, &case, &mut defined) {
            Ok(()) => {}
            Err(err) if err.is_discard() => {
                discards += 1;
                eprintln!(
                    "Discarding {:?} ({:?}): {}",
                    case.source, case.expected, err
                );
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {}", path, err);
            }
        }
    }

    w.line("exit_section();");
    w.exit("}");

    GenOutput {
        code: w.out,
        failures,
        discards,
    }
}

fn emit_case(w: &mut Writer, case: &TestCase, defined: &mut Vec<String>) -> TranslateResult<()> {
    maybe_discard(&case.expected)?;

    let args = match &case.runopts {
        Some(runopts) => {
            let mut opts = Vec::with_capacity(runopts.len());
            for (key, value) in runopts {
                let key = key.as_str().ok_or_else(|| {
                    TranslateError::unhandled("run option key is not a string")
                })?;
                opts.push(format!(
                    "\"{}\", {}",
                    key,
                    convert(&py_str(value), ops::LOOSEST, Flavor::Value)?
                ));
            }
            format!(", R::optargs({})", opts.join(", "))
        }
        None => String::new(),
    };

    if let Some(captures) = ASSIGNMENT.captures(&case.source) {
        let var = &captures[1];
        let rhs = &captures[2];
        // float bounds are host constants, not driver expressions
        if var == "float_max" {
            w.line("auto float_max = 1.7976931348623157e+308;");
            return Ok(());
        }
        if var == "float_min" {
            w.line("auto float_min = 2.2250738585072014e-308;");
            return Ok(());
        }
        // plain definitions bind the value itself; a couple of known setup
        // variables hold queries that must actually run
        let plain_def = case.kind == CaseKind::Def && !matches!(var, "bad_insert" | "trows");
        let (value, post) = if plain_def {
            (convert(rhs, ops::STATEMENT, Flavor::Text)?, String::new())
        } else {
            (
                convert(rhs, ops::STATEMENT, Flavor::Query)?,
                format!(".run(*conn{})", args),
            )
        };
        let target = if defined.iter().any(|d| d == var) {
            var.to_string()
        } else {
            defined.push(var.to_string());
            format!("auto {}", var)
        };
        w.line(&format!("TEST_DO({} = ({}{}));", target, value, post));
        return Ok(());
    }

    let query = convert(&case.source, ops::POSTFIX, Flavor::Query)?;
    match &case.expected {
        Some(ot) => {
            let expected = convert(ot, ops::LOOSEST, Flavor::Value)?;
            w.line(&format!(
                "TEST_EQ(maybe_run({}, *conn{}), ({}));",
                query, args, expected
            ));
        }
        None => {
            w.line(&format!("TEST_DO(maybe_run({}, *conn{}));", query, args));
        }
    }
    Ok(())
}

/// Read, parse and generate a fixture file from disk
pub fn generate_file(path: &Path) -> Result<GenOutput, DriverError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: display.clone(),
        source,
    })?;
    let file = FixtureFile::from_str(&text).map_err(|source| DriverError::Yaml {
        path: display.clone(),
        source,
    })?;
    Ok(generate(&display, &file))
}

/// Emit the index translation unit that calls every generated fixture
/// function in order
pub fn emit_index(names: &[String]) -> String {
    let mut w = Writer::new();
    w.enter("void run_upstream_tests() {");
    for name in names {
        w.line(&format!("extern void {}();", name));
        w.line(&format!("{}();", name));
    }
    w.exit("}");
    w.out
}
