//! Canonical leaf encoding.
//!
//! A leaf is any JSON value.  Its canonical bytes are the sorted-key JSON
//! rendering used by every deployment that has written snapshots so far:
//!
//! - object keys sorted by code point at every nesting level
//! - `", "` between items and `": "` between key and value
//! - everything outside printable ASCII escaped as `\uXXXX` (lowercase hex,
//!   UTF-16 surrogate pairs above the BMP)
//! - integers verbatim at any magnitude; floats in shortest round-trip form,
//!   always with a fractional part or an exponent (`75.0`, `1e+16`, `1.5e-05`)
//!
//! Numbers are read with `serde_json`'s `arbitrary_precision` and
//! `float_roundtrip` features, so a value reloaded from disk encodes to the
//! same bytes it was hashed with.
//!
//! Two structurally equal values encode to identical bytes no matter what
//! order their keys were inserted in.

use std::fmt::Write as _;

use serde_json::{Number, Value};

/// Encode `value` into its canonical byte form.
pub fn encode_leaf(value: &Value) -> Vec<u8> {
    let mut out = String::new();
    write_value(&mut out, value);
    out.into_bytes()
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "{}", i);
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "{}", u);
    } else if let Some(digits) = integer_literal(n) {
        out.push_str(&digits);
    } else if let Some(f) = n.as_f64() {
        write_float(out, f);
    }
}

/// The literal text of an integer too wide for `i64`/`u64`.
fn integer_literal(n: &Number) -> Option<String> {
    let text = n.to_string();
    let digits = text.strip_prefix('-').unwrap_or(&text);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(text)
}

fn write_float(out: &mut String, f: f64) {
    let magnitude = f.abs();
    if f == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let plain = f.to_string();
        out.push_str(&plain);
        if !plain.contains('.') {
            out.push_str(".0");
        }
        return;
    }

    // `{:e}` yields the shortest mantissa ("1.5e-5"); the exponent is
    // rewritten with an explicit sign and at least two digits ("1.5e-05").
    let sci = format!("{:e}", f);
    match sci.split_once('e').and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e))) {
        Some((mantissa, exponent)) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            let _ = write!(out, "{}e{}{:02}", mantissa, sign, exponent.abs());
        }
        None => out.push_str(&sci),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out.push('"');
}
