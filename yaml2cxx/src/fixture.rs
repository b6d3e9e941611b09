//! Fixture file model
//!
//! The upstream test fixtures are polyglot YAML documents: every test entry
//! may carry per-language variants of the query and the expected output.
//! This module deserializes a fixture file and flattens the entries into
//! the cases the generator consumes, resolving the polyglot keys with the
//! python variant taking priority over the cross-driver one.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// A whole fixture file
#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    /// Human-readable section description
    pub desc: String,
    /// Space or comma separated names of tables the tests expect to exist
    pub table_variable_name: Option<String>,
    #[serde(default)]
    pub tests: Vec<Value>,
}

/// What a flattened case does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// Setup definition: evaluated for its binding, never run as a query
    Def,
    /// Query under test
    Query,
}

/// One flattened test case: python source text plus its expected output
#[derive(Debug, Clone)]
pub struct TestCase {
    pub source: String,
    pub expected: Option<String>,
    pub kind: CaseKind,
    pub runopts: Option<Mapping>,
}

impl FixtureFile {
    pub fn from_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Table variable names, split on spaces and commas
    pub fn table_variables(&self) -> Vec<&str> {
        match &self.table_variable_name {
            Some(names) => names
                .split([' ', ','])
                .filter(|s| !s.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Flatten the test entries into cases
    pub fn cases(&self) -> Vec<TestCase> {
        let mut out = Vec::new();
        for test in &self.tests {
            let runopts = test
                .get("runopts")
                .and_then(Value::as_mapping)
                .cloned();
            let expected = expected_output(test);

            if let Some(def) = test.get("def") {
                let def = poly_get(def).unwrap_or(def);
                if !def.is_null() && !matches!(def, Value::Mapping(_)) {
                    out.push(TestCase {
                        source: py_str(def),
                        expected: None,
                        kind: CaseKind::Def,
                        runopts: runopts.clone(),
                    });
                }
            }

            let Some(py) = poly_get_from(test) else {
                continue;
            };
            match py {
                Value::String(s) => out.push(TestCase {
                    source: s.clone(),
                    expected: expected.clone(),
                    kind: CaseKind::Query,
                    runopts: runopts.clone(),
                }),
                // a mapping here is a per-dialect override; only the
                // cross-driver spelling applies
                Value::Mapping(m) => {
                    if let Some(cd) = m.get("cd") {
                        out.push(TestCase {
                            source: py_str(cd),
                            expected: expected.clone(),
                            kind: CaseKind::Query,
                            runopts: runopts.clone(),
                        });
                    }
                }
                Value::Sequence(variants) => {
                    for variant in variants {
                        out.push(TestCase {
                            source: py_str(variant),
                            expected: expected.clone(),
                            kind: CaseKind::Query,
                            runopts: runopts.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// Resolve a polyglot value: a mapping with `py`/`cd` keys yields the
/// preferred variant, anything else stands for itself
fn poly_get(value: &Value) -> Option<&Value> {
    let map = value.as_mapping()?;
    map.get("py").or_else(|| map.get("cd"))
}

/// The `py`/`cd` entry of a test mapping
fn poly_get_from(test: &Value) -> Option<&Value> {
    let map = test.as_mapping()?;
    map.get("py").or_else(|| map.get("cd"))
}

/// Expected output of a test, itself possibly polyglot, possibly nested
/// under the python variant of the query
fn expected_output(test: &Value) -> Option<String> {
    if let Some(ot) = test.get("ot") {
        let ot = poly_get(ot).unwrap_or(ot);
        return Some(py_str(ot));
    }
    test.get("py")
        .and_then(|py| py.get("ot"))
        .map(py_str)
}

/// Render a YAML value back into python source text. Strings stand for
/// themselves; everything else gets its python literal spelling.
pub fn py_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", py_repr(k), maybe_unstr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        other => py_repr(other),
    }
}

/// A string value that already looks like code (contains a call) passes
/// through verbatim; a plain word becomes a string literal
fn maybe_unstr(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains('(') => s.clone(),
        other => py_repr(other),
    }
}

/// Python literal spelling of a YAML value
fn py_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('\'');
            for c in s.chars() {
                match c {
                    '\'' => out.push_str("\\'"),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(c),
                }
            }
            out.push('\'');
            out
        }
        Value::Sequence(elts) => {
            let parts: Vec<String> = elts.iter().map(py_repr).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", py_repr(k), py_repr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => py_repr(&tagged.value),
    }
}
