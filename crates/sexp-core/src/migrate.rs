//! Schema migrations — pure tree-to-tree rewrites, one per version bump.
//!
//! Each rule consumes the old tree and builds a new root, moving every
//! child it does not restructure into the new tree untouched. Children are
//! partitioned by tag; anything a rule does not recognize lands in the
//! metadata group, so unknown fields survive every migration.
//!
//! Every rule writes exactly one `(version N)` as the root's first child and
//! drops any older version declaration. A tree that already declares
//! version `N` or later is refused with [`SexpError::AlreadyMigrated`]
//! rather than being wrapped a second time.

use crate::error::{Result, SexpError};
use crate::value::Value;
use tracing::debug;

pub const SPRITE_ROOT: &str = "supertux-sprite";
pub const LEVEL_ROOT: &str = "supertux-level";

/// Sector fields that stay on the sector instead of moving into `objects`.
const SECTOR_METADATA: [&str; 2] = ["name", "init-script"];

/// Sprite schema v1 → v2: gather every `action` under one `actions` list.
///
/// ```
/// use sexp_core::{parse_document, sprite_v1_to_v2};
///
/// let v1 = parse_document(r#"(supertux-sprite (name "x") (action (name "idle")))"#).unwrap();
/// let v2 = sprite_v1_to_v2(v1).unwrap();
/// assert_eq!(
///     v2.to_string(),
///     r#"(supertux-sprite (version 2) (name "x") (actions (action (name "idle"))))"#
/// );
/// ```
pub fn sprite_v1_to_v2(doc: Value) -> Result<Value> {
    let (tag, children) = split_root(doc, SPRITE_ROOT, 2)?;

    let mut metadata = Vec::new();
    let mut actions = Vec::new();
    for child in children {
        if child.has_tag("action") {
            actions.push(child);
        } else if !child.has_tag("version") {
            metadata.push(child);
        }
    }
    debug!(
        metadata = metadata.len(),
        actions = actions.len(),
        "sprite v1 -> v2"
    );

    let mut root = Vec::with_capacity(metadata.len() + 3);
    root.push(tag);
    root.push(version_field(2));
    root.extend(metadata);
    root.push(Value::tagged("actions", actions));
    Ok(Value::List(root))
}

/// Level schema v3 → v4: split each sector's fields into metadata and an
/// `objects` list, and gather all sectors under one `sectors` list.
///
/// Sectors are taken in document order from every `sectors` wrapper and
/// from bare `sector` children of the root. A level with neither fails.
pub fn level_v3_to_v4(doc: Value) -> Result<Value> {
    let (tag, children) = split_root(doc, LEVEL_ROOT, 4)?;

    let mut metadata = Vec::new();
    let mut sectors = Vec::new();
    let mut has_sectors = false;
    for child in children {
        if child.has_tag("sectors") {
            has_sectors = true;
            if let Value::List(items) = child {
                sectors.extend(items.into_iter().skip(1));
            }
        } else if child.has_tag("sector") {
            has_sectors = true;
            sectors.push(child);
        } else if !child.has_tag("version") {
            metadata.push(child);
        }
    }
    if !has_sectors {
        return Err(SexpError::schema(format!(
            "`{LEVEL_ROOT}` has no `sectors` or `sector` child"
        )));
    }

    let sectors = sectors
        .into_iter()
        .map(rebuild_sector)
        .collect::<Result<Vec<_>>>()?;
    debug!(
        metadata = metadata.len(),
        sectors = sectors.len(),
        "level v3 -> v4"
    );

    let mut root = Vec::with_capacity(metadata.len() + 3);
    root.push(tag);
    root.push(version_field(4));
    root.extend(metadata);
    root.push(Value::tagged("sectors", sectors));
    Ok(Value::List(root))
}

fn rebuild_sector(sector: Value) -> Result<Value> {
    let items = match sector {
        Value::List(items) if head_is(&items, "sector") => items,
        other => {
            return Err(SexpError::schema(format!(
                "expected a `sector` list, found `{other}`"
            )))
        }
    };

    let (metadata, objects): (Vec<Value>, Vec<Value>) = items
        .into_iter()
        .skip(1)
        .partition(|child| SECTOR_METADATA.iter().any(|name| child.has_tag(name)));

    let mut rebuilt = Vec::with_capacity(metadata.len() + 2);
    rebuilt.push(Value::symbol("sector"));
    rebuilt.extend(metadata);
    rebuilt.push(Value::tagged("objects", objects));
    Ok(Value::List(rebuilt))
}

/// Check the root tag and version guard, then hand back the tag atom and
/// the remaining children.
fn split_root(doc: Value, expected: &str, target: i64) -> Result<(Value, Vec<Value>)> {
    if let Some(version) = doc.int_field("version") {
        if doc.has_tag(expected) && version >= target {
            return Err(SexpError::AlreadyMigrated {
                tag: expected.to_string(),
                version,
            });
        }
    }

    let mut items = match doc {
        Value::List(items) if head_is(&items, expected) => items,
        other => {
            let found = match other.tag() {
                Some(tag) => format!("`{tag}`"),
                None => "an untagged value".to_string(),
            };
            return Err(SexpError::schema(format!(
                "expected a `{expected}` document, found {found}"
            )));
        }
    };
    let children = items.split_off(1);
    let tag = items.remove(0);
    Ok((tag, children))
}

fn head_is(items: &[Value], tag: &str) -> bool {
    matches!(items.first(), Some(Value::Symbol(head)) if head == tag)
}

fn version_field(version: i64) -> Value {
    Value::tagged("version", [Value::Integer(version)])
}
