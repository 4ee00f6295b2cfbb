//! Decoded record values.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::Colors;

/// One decoded value.
///
/// Numeric variants keep the width/signedness the stream used. Matching is
/// type-sensitive, so `Uint64(5)` and `Int64(5)` are different values here
/// even though they render identically.
///
/// `Object` uses `Vec<(String, Value)>` to preserve stream order. Duplicate
/// keys from a malformed producer are kept as-is.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// First value bound to `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

/// JSON → value, as used when encoding JSON input.
///
/// Non-negative integers become `Uint64`, negative ones `Int64`, everything
/// else numeric becomes `Double`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::Uint64(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Uint64(u) => serializer.serialize_u64(*u),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl Value {
    /// Render as JSON text, jq-style: keys blue, strings green, null and
    /// punctuation dim. With [`Colors::OFF`] the output is plain JSON.
    pub fn format(&self, pretty: bool, colors: Colors) -> String {
        let mut out = String::new();
        format_value(&mut out, self, &colors, pretty, 0);
        out
    }
}

fn format_value(out: &mut String, value: &Value, c: &Colors, pretty: bool, indent: usize) {
    match value {
        Value::Null => {
            out.push_str(c.dim);
            out.push_str("null");
            out.push_str(c.reset);
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int64(i) => out.push_str(&i.to_string()),
        Value::Uint64(u) => out.push_str(&u.to_string()),
        Value::Double(d) => format_double(out, *d, c),
        Value::String(s) => {
            out.push_str(c.green);
            push_quoted(out, s);
            out.push_str(c.reset);
        }
        Value::Array(arr) => format_array(out, arr, c, pretty, indent),
        Value::Object(fields) => format_object(out, fields, c, pretty, indent),
    }
}

/// Same digits serde_json would produce; non-finite values render as `null`.
fn format_double(out: &mut String, d: f64, c: &Colors) {
    match serde_json::Number::from_f64(d) {
        Some(n) => out.push_str(&n.to_string()),
        None => {
            out.push_str(c.dim);
            out.push_str("null");
            out.push_str(c.reset);
        }
    }
}

fn format_array(out: &mut String, arr: &[Value], c: &Colors, pretty: bool, indent: usize) {
    out.push_str(c.dim);
    out.push('[');
    out.push_str(c.reset);

    if arr.is_empty() {
        out.push_str(c.dim);
        out.push(']');
        out.push_str(c.reset);
        return;
    }

    let elem_indent = if pretty { indent + 2 } else { 0 };

    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            out.push_str(c.dim);
            out.push(',');
            out.push_str(c.reset);
        }

        if pretty {
            out.push('\n');
            out.push_str(&" ".repeat(elem_indent));
        }

        format_value(out, item, c, pretty, elem_indent);
    }

    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }

    out.push_str(c.dim);
    out.push(']');
    out.push_str(c.reset);
}

fn format_object(
    out: &mut String,
    fields: &[(String, Value)],
    c: &Colors,
    pretty: bool,
    indent: usize,
) {
    out.push_str(c.dim);
    out.push('{');
    out.push_str(c.reset);

    if fields.is_empty() {
        out.push_str(c.dim);
        out.push('}');
        out.push_str(c.reset);
        return;
    }

    let field_indent = if pretty { indent + 2 } else { 0 };

    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(c.dim);
            out.push(',');
            out.push_str(c.reset);
        }

        if pretty {
            out.push('\n');
            out.push_str(&" ".repeat(field_indent));
        }

        out.push_str(c.blue);
        push_quoted(out, key);
        out.push_str(c.reset);

        out.push_str(c.dim);
        out.push(':');
        out.push_str(c.reset);

        if pretty {
            out.push(' ');
        }

        format_value(out, value, c, pretty, field_indent);
    }

    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }

    out.push_str(c.dim);
    out.push('}');
    out.push_str(c.reset);
}

/// Same escapes as serde_json: only `"`, `\` and characters below U+0020.
fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
