//! Layout printer — renders a [`Value`] tree back to canonical text.
//!
//! Layout is chosen per list, in priority order:
//!
//! 1. **Block**: the second element is a non-empty list not tagged `_`.
//!    Tag on the first line, each child on its own line one level deeper,
//!    `)` on its own line at the parent's indentation. Child lists recurse.
//! 2. **String block**: more than one child and the first child is a
//!    string. Every child on its own line, `)` on its own line.
//! 3. **Grid**: a `tiles` list directly inside
//!    `supertux-level.sectors.sector.objects.tilemap`, whose tilemap carries
//!    a positive `(width N)`. Children are written `N` per row, each followed
//!    by one space, as the level files have always stored them.
//! 4. **Inline**: `(tag a b c)` on one line.
//!
//! Lists with only a tag print as `(tag)`, the empty list as `()`. Any list
//! nested inside an inline, string-block or grid row prints in compact form.
//!
//! # Key design decisions
//!
//! - **Explicit scope threading**: the grid rule needs the tag path from the
//!   root and a lookup on the parent node. Both travel down the recursion in
//!   a [`Scope`] passed by `&mut`, pushed before descending and popped after.
//! - **Render to a buffer**: output goes into a `String`; callers write files
//!   only once rendering has finished.

use crate::value::Value;

/// Tag path of the list whose `tiles` child is laid out as a grid.
pub const TILEMAP_PATH: [&str; 5] = [
    "supertux-level",
    "sectors",
    "sector",
    "objects",
    "tilemap",
];

/// Render `value` with `indent` spaces per nesting level, followed by a
/// single newline.
///
/// # Examples
///
/// ```
/// use sexp_core::{parse_document, pretty_print};
///
/// let sprite = parse_document(r#"(supertux-sprite (action (name "idle") (fps 8)))"#).unwrap();
/// assert_eq!(
///     pretty_print(&sprite, 2),
///     "(supertux-sprite\n  (action\n    (name \"idle\")\n    (fps 8)\n  )\n)\n"
/// );
/// ```
pub fn pretty_print(value: &Value, indent: usize) -> String {
    let mut out = String::new();
    write_pretty(value, indent, &mut out);
    out
}

/// Same as [`pretty_print`], appending to an existing buffer.
pub fn write_pretty(value: &Value, indent: usize, out: &mut String) {
    let printer = Printer { indent };
    let mut scope = Scope::default();
    scope.ancestors.push(value);
    printer.print_value(value, &mut scope, 1, out);
    out.push('\n');
}

/// Where the printer currently is: tags from the root down to (but not
/// including) the node being printed, and every node from the root down to
/// and including it.
#[derive(Default)]
struct Scope<'a> {
    path: Vec<&'a str>,
    ancestors: Vec<&'a Value>,
}

impl<'a> Scope<'a> {
    fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// The node one level above the one being printed.
    fn parent(&self) -> Option<&'a Value> {
        let len = self.ancestors.len();
        if len < 2 {
            return None;
        }
        self.ancestors.get(len - 2).copied()
    }

    /// Column count for a grid-laid `tiles` list, if this node is one.
    fn width_hint(&self, node: &Value) -> Option<usize> {
        if self.path != TILEMAP_PATH || !node.has_tag("tiles") {
            return None;
        }
        let width = self.parent()?.int_field("width")?;
        usize::try_from(width).ok().filter(|w| *w > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Block,
    StringBlock,
    Grid(usize),
    Inline,
}

/// `rest` is the list without its tag slot and is never empty here.
fn choose_layout(rest: &[Value], width_hint: Option<usize>) -> Layout {
    match rest {
        [Value::List(first), ..] if is_block_child(first) => Layout::Block,
        [Value::String(_), _, ..] => Layout::StringBlock,
        _ => match width_hint {
            Some(width) => Layout::Grid(width),
            None => Layout::Inline,
        },
    }
}

/// A non-empty list whose head is not the `_` translation marker.
fn is_block_child(items: &[Value]) -> bool {
    match items.first() {
        None => false,
        Some(Value::Symbol(head)) => head != "_",
        Some(_) => true,
    }
}

struct Printer {
    indent: usize,
}

impl Printer {
    fn pad(&self, depth: usize, out: &mut String) {
        out.push_str(&" ".repeat(depth * self.indent));
    }

    fn print_value<'a>(
        &self,
        value: &'a Value,
        scope: &mut Scope<'a>,
        depth: usize,
        out: &mut String,
    ) {
        match value {
            Value::List(items) => self.print_list(value, items, scope, depth, out),
            atom => out.push_str(&atom.to_string()),
        }
    }

    fn print_list<'a>(
        &self,
        node: &'a Value,
        items: &'a [Value],
        scope: &mut Scope<'a>,
        depth: usize,
        out: &mut String,
    ) {
        let width_hint = scope.width_hint(node);

        let [head, rest @ ..] = items else {
            out.push_str("()");
            return;
        };

        out.push('(');
        out.push_str(&head.to_string());
        if rest.is_empty() {
            out.push(')');
            return;
        }

        let layout = choose_layout(rest, width_hint);
        if let Layout::Grid(width) = layout {
            tracing::debug!(
                path = %scope.dotted_path(),
                width,
                cells = rest.len(),
                "grid layout"
            );
        }

        scope.path.push(node.tag().unwrap_or(""));
        match layout {
            Layout::Block => self.print_block(rest, scope, depth, out),
            Layout::StringBlock => self.print_string_block(rest, depth, out),
            Layout::Grid(width) => self.print_grid(rest, width, depth, out),
            Layout::Inline => {
                for item in rest {
                    out.push(' ');
                    out.push_str(&item.to_string());
                }
                out.push(')');
            }
        }
        scope.path.pop();
    }

    fn print_block<'a>(
        &self,
        rest: &'a [Value],
        scope: &mut Scope<'a>,
        depth: usize,
        out: &mut String,
    ) {
        out.push('\n');
        for (i, child) in rest.iter().enumerate() {
            self.pad(depth, out);
            if child.is_list() {
                scope.ancestors.push(child);
                self.print_value(child, scope, depth + 1, out);
                scope.ancestors.pop();
            } else {
                out.push_str(&child.to_string());
            }
            if i + 1 != rest.len() {
                out.push('\n');
            }
        }
        out.push('\n');
        self.pad(depth - 1, out);
        out.push(')');
    }

    fn print_string_block(&self, rest: &[Value], depth: usize, out: &mut String) {
        out.push('\n');
        for item in rest {
            self.pad(depth, out);
            out.push_str(&item.to_string());
            out.push('\n');
        }
        self.pad(depth - 1, out);
        out.push(')');
    }

    fn print_grid(&self, rest: &[Value], width: usize, depth: usize, out: &mut String) {
        out.push('\n');
        self.pad(depth, out);
        for (i, cell) in rest.iter().enumerate() {
            out.push_str(&cell.to_string());
            out.push(' ');
            if (i + 1) % width == 0 {
                out.push('\n');
                self.pad(depth, out);
            }
        }
        out.push(')');
    }
}
