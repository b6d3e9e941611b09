//! Identifier renaming and literal escaping

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::Flavor;

/// Identifier collision table: reserved C++ words get a trailing `_`,
/// a few sentinels map to library constructs. Fixed at startup.
static RENAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("default", "default_"),
        ("R::default", "R::default_"),
        ("do", "do_"),
        ("R::do", "R::do_"),
        ("union", "union_"),
        ("R::union", "R::union_"),
        ("delete", "delete_"),
        ("True", "true"),
        ("False", "false"),
        ("None", "R::Nil()"),
        ("null", "R::Nil()"),
        ("xrange", "R::range"),
        ("range", "R::range"),
        ("float", "double"),
        ("int_cmp", "int"),
        ("float_cmp", "double"),
        ("list", ""),
    ])
});

/// Rename an identifier for the C++ surface. Idempotent: output never maps
/// again (renamed spellings are not keys of the table).
pub fn rename(id: &str) -> String {
    match RENAMES.get(id) {
        Some(renamed) => (*renamed).to_string(),
        None => id.to_string(),
    }
}

/// Quote a textual string: quote, backslash and newline are escaped, every
/// other character passes through.
pub fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote raw bytes: anything outside printable ASCII, plus quote and
/// backslash, becomes a two-digit hex escape. A printable hex digit right
/// after a hex escape is escaped as well, otherwise C++ would absorb it
/// into the preceding escape.
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    let mut was_hex = false;
    for &b in bytes {
        if !(0x20..=0x7e).contains(&b) || (was_hex && b.is_ascii_hexdigit()) {
            out.push_str(&format!("\\x{:02x}", b));
            was_hex = true;
            continue;
        }
        was_hex = false;
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            _ => out.push(b as char),
        }
    }
    out.push('"');
    out
}

/// Emit a textual string literal for the given flavor
pub fn emit_str(s: &str, flavor: Flavor) -> String {
    if s.bytes().any(|b| b == 0) {
        // an embedded NUL would truncate a plain C string literal
        return wrap_std_string(quote_bytes(s.as_bytes()), s.len());
    }
    let quoted = quote_text(s);
    if flavor == Flavor::Text {
        wrap_std_string(quoted, s.len())
    } else {
        quoted
    }
}

/// Emit a bytes literal for the given flavor
pub fn emit_bytes(bytes: &[u8], flavor: Flavor) -> String {
    let quoted = quote_bytes(bytes);
    if flavor == Flavor::Text || bytes.contains(&0) {
        wrap_std_string(quoted, bytes.len())
    } else {
        quoted
    }
}

fn wrap_std_string(quoted: String, len: usize) -> String {
    format!("std::string({}, {})", quoted, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Undo the C++ escaping, for round-trip checks
    fn unescape(quoted: &str) -> Vec<u8> {
        let body = quoted
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .expect("quoted literal");
        let mut out = Vec::new();
        let mut bytes = body.bytes();
        while let Some(b) = bytes.next() {
            if b != b'\\' {
                out.push(b);
                continue;
            }
            match bytes.next() {
                Some(b'n') => out.push(b'\n'),
                Some(b'"') => out.push(b'"'),
                Some(b'\\') => out.push(b'\\'),
                Some(b'x') => {
                    let hi = (bytes.next().unwrap() as char).to_digit(16).unwrap();
                    let lo = (bytes.next().unwrap() as char).to_digit(16).unwrap();
                    out.push((hi * 16 + lo) as u8);
                }
                other => panic!("unexpected escape: {:?}", other),
            }
        }
        out
    }

    #[test]
    fn test_rename_reserved_words() {
        assert_eq!(rename("default"), "default_");
        assert_eq!(rename("do"), "do_");
        assert_eq!(rename("count"), "count");
    }

    #[test]
    fn test_rename_idempotent() {
        // renaming an already-renamed spelling changes nothing
        assert_eq!(rename(&rename("union")), "union_");
        assert_eq!(rename(&rename("delete")), "delete_");
    }

    #[test]
    fn test_rename_sentinels() {
        assert_eq!(rename("None"), "R::Nil()");
        assert_eq!(rename("xrange"), "R::range");
        assert_eq!(rename("list"), "");
    }

    #[test]
    fn test_quote_text_roundtrip() {
        let cases = ["plain", "with \"quote\"", "back\\slash", "line\nbreak"];
        for case in cases {
            assert_eq!(unescape(&quote_text(case)), case.as_bytes());
        }
    }

    #[test]
    fn test_quote_bytes_roundtrip() {
        let cases: &[&[u8]] = &[
            b"plain",
            b"\x00\x01\xff",
            b"quote\"and\\slash",
            b"\x01also printable",
        ];
        for case in cases {
            assert_eq!(unescape(&quote_bytes(case)), *case);
        }
    }

    #[test]
    fn test_hex_escape_not_extended() {
        // 0x01 followed by the letter 'a': the 'a' must be escaped too,
        // or C++ would read one \x1a escape
        let quoted = quote_bytes(b"\x01a");
        assert_eq!(quoted, "\"\\x01\\x61\"");
        assert_eq!(unescape(&quoted), b"\x01a");
    }

    #[test]
    fn test_text_flavor_wraps_std_string() {
        assert_eq!(
            emit_str("ab", Flavor::Text),
            "std::string(\"ab\", 2)"
        );
        assert_eq!(emit_str("ab", Flavor::Query), "\"ab\"");
    }

    #[test]
    fn test_nul_forces_std_string() {
        // 'b' is a hex digit following the \x00 escape, so it is escaped too
        let emitted = emit_str("a\0b", Flavor::Value);
        assert_eq!(emitted, "std::string(\"a\\x00\\x62\", 3)");
    }
}
