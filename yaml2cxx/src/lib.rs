//! yaml2cxx
//!
//! Generates C++ driver test code from the upstream polyglot YAML fixtures.
//! Each fixture file becomes one translation unit holding a function that
//! feeds every test case through the harness macros; an index unit calls
//! the generated functions in order.
//!
//! The heart of the crate is [`translate`]: a pure function from a parsed
//! python expression to C++ query-builder text. Everything else is plumbing
//! around it, from YAML flattening to indentation.
//!
//! # Example
//!
//! ```
//! use yaml2cxx::{translate, Ctx, Flavor, ops};
//! use yaml2cxx_parser::parse_expr;
//!
//! let expr = parse_expr("r.expr(1) + 2").expect("parse failed");
//! let cxx = translate(&expr, ops::LOOSEST, &Ctx::new(Flavor::Query)).expect("translate failed");
//! assert_eq!(cxx, "R::expr(1) + 2");
//! ```

pub mod driver;
pub mod error;
pub mod fixture;
pub mod translate;

// Re-exports
pub use driver::{emit_index, fixture_name, generate, generate_file, GenOutput};
pub use error::{DriverError, TranslateError, TranslateResult};
pub use fixture::{CaseKind, FixtureFile, TestCase};
pub use translate::{ops, translate, translate_wrapped, Ctx, Flavor};

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_end_to_end() {
        let file = FixtureFile::from_str("desc: d\ntests:\n  - py: r.expr(7)\n").unwrap();
        let out = generate("smoke.yaml", &file);
        assert!(out.is_clean());
        assert!(out.code.contains("R::expr(7)"));
    }
}
