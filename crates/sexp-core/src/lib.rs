//! # sexp-core
//!
//! Reader, path-aware pretty-printer and schema migrations for the
//! parenthesized data files SuperTux stores sprites and levels in.
//!
//! ## Quick start
//!
//! ```rust
//! use sexp_core::{parse_document, pretty_print, sprite_v1_to_v2};
//!
//! let v1 = parse_document(r#"(supertux-sprite (action (name "idle")))"#).unwrap();
//! let v2 = sprite_v1_to_v2(v1).unwrap();
//! assert_eq!(
//!     pretty_print(&v2, 2),
//!     "(supertux-sprite\n  (version 2)\n  (actions\n    (action\n      (name \"idle\")\n    )\n  )\n)\n"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` tree: atoms and lists
//! - [`parser`] — text → `Value` trees
//! - [`printer`] — `Value` → canonical text, layout chosen by tree path
//! - [`migrate`] — sprite v1→v2 and level v3→v4 rewrites
//! - [`document`] — file-kind routing and the one-call pipeline
//! - [`error`] — error taxonomy

pub mod document;
pub mod error;
pub mod migrate;
pub mod parser;
pub mod printer;
pub mod value;

pub use document::{format_text, refactor_text, DocumentKind};
pub use error::SexpError;
pub use migrate::{level_v3_to_v4, sprite_v1_to_v2};
pub use parser::{parse, parse_document};
pub use printer::{pretty_print, write_pretty};
pub use value::Value;
