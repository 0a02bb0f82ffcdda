//! The symbolic tree every other module operates on.
//!
//! A [`Value`] is either an atom (symbol, string, integer, float) or an
//! ordered list of values. By convention a non-empty list starts with a
//! symbol naming its role, e.g. `(width 20)` or `(action (name "idle"))`;
//! that first element is called the list's *tag*.
//!
//! Trees are plain owned data: each list owns its children, so migrations
//! rebuild by moving children into new lists instead of sharing them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in an s-expression tree.
///
/// Equality is structural. Floats compare with `f64` semantics, so a tree
/// holding `NaN` is never equal to anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Symbol(String),
    String(String),
    Integer(i64),
    Float(f64),
    List(Vec<Value>),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build `(tag item...)`.
    pub fn tagged(tag: &str, items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(std::iter::once(Value::symbol(tag)).chain(items).collect())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The symbol in the first slot of a list, if there is one.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_symbol()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    /// 0-based child access; index 0 is the tag slot. `None` for atoms.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_list()?.get(index)
    }

    /// Everything after the tag slot. Empty for atoms and empty lists.
    pub fn children(&self) -> &[Value] {
        match self.as_list() {
            Some([_, rest @ ..]) => rest,
            _ => &[],
        }
    }

    /// First child list tagged `name`, e.g. `(width 20)` for `"width"`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.children().iter().find(|child| child.has_tag(name))
    }

    /// The integer in the second slot of the `name` field.
    pub fn int_field(&self, name: &str) -> Option<i64> {
        self.field(name)?.get(1)?.as_integer()
    }

    /// Number of atoms reachable from this node, tags included.
    pub fn atom_count(&self) -> usize {
        match self {
            Value::List(items) => items.iter().map(Value::atom_count).sum(),
            _ => 1,
        }
    }
}

/// Compact single-line form that parses back to the same tree.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(name) => f.write_str(name),
            Value::String(text) => f.write_str(&quote_string(text)),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Wrap in double quotes, escaping `"` and `\`. Newlines stay raw so
/// multi-line text keeps its shape in the file.
pub(crate) fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest round-trip form, always carrying a `.` so the token reads back
/// as a float rather than an integer.
pub(crate) fn format_float(x: f64) -> String {
    let mut s = x.to_string();
    if x.is_finite() && !s.contains(['.', 'e', 'E']) {
        s.push_str(".0");
    }
    s
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_and_children() {
        let v = Value::tagged("width", [Value::from(20)]);
        assert_eq!(v.tag(), Some("width"));
        assert_eq!(v.children(), &[Value::Integer(20)]);
        assert!(Value::list([]).tag().is_none());
        assert!(Value::list([]).children().is_empty());
        assert!(Value::from(3).children().is_empty());
    }

    #[test]
    fn tag_requires_symbol() {
        let v = Value::list([Value::string("width"), Value::from(1)]);
        assert_eq!(v.tag(), None);
    }

    #[test]
    fn int_field_lookup() {
        let tilemap = Value::tagged(
            "tilemap",
            [
                Value::tagged("name", [Value::string("w")]),
                Value::tagged("width", [Value::from(4)]),
            ],
        );
        assert_eq!(tilemap.int_field("width"), Some(4));
        assert_eq!(tilemap.int_field("name"), None);
        assert_eq!(tilemap.int_field("height"), None);
    }

    #[test]
    fn display_compact() {
        let v = Value::tagged("name", [Value::tagged("_", [Value::string("say \"hi\"\\")])]);
        assert_eq!(v.to_string(), r#"(name (_ "say \"hi\"\\"))"#);
    }

    #[test]
    fn float_display_keeps_point() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(2.25), "2.25");
    }

    #[test]
    fn atom_count_includes_tags() {
        let v = Value::tagged("tiles", [Value::from(1), Value::from(2)]);
        assert_eq!(v.atom_count(), 3);
        assert_eq!(Value::list([]).atom_count(), 0);
    }
}
