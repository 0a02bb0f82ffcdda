//! Error types for parsing, migrating and routing s-expression documents.

use thiserror::Error;

/// Errors that can occur while reading, migrating or routing a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SexpError {
    /// A `)` with no open list, or input that ends with lists still open.
    /// Positions are 1-based; for an unclosed list they point at its `(`.
    #[error("unbalanced parenthesis at line {line}, column {column}")]
    UnbalancedParen { line: usize, column: usize },

    /// A quoted string with no closing quote before end of input.
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    /// A token that looks numeric but has no representable value.
    #[error("invalid number `{token}` at line {line}, column {column}")]
    InvalidNumber {
        token: String,
        line: usize,
        column: usize,
    },

    /// A `(` that would nest lists past the reader's depth limit.
    #[error("lists nested too deeply at line {line}, column {column}")]
    NestingTooDeep { line: usize, column: usize },

    #[error("document contains no expression")]
    EmptyDocument,

    #[error("expected a single top-level expression, found {found}")]
    MultipleTopLevelExpressions { found: usize },

    /// The tree does not have the shape a migration expects.
    #[error("schema assertion failed: {message}")]
    SchemaAssertion { message: String },

    /// The root already declares a version at or past the migration target.
    #[error("`{tag}` document already declares version {version}")]
    AlreadyMigrated { tag: String, version: i64 },

    #[error("unhandled file type: {path}")]
    UnhandledFileType { path: String },
}

impl SexpError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        SexpError::SchemaAssertion {
            message: message.into(),
        }
    }

    /// True for the tokenizer/parser failures (unbalanced parens, unterminated
    /// strings, malformed numbers, excessive nesting).
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            SexpError::UnbalancedParen { .. }
                | SexpError::UnterminatedString { .. }
                | SexpError::InvalidNumber { .. }
                | SexpError::NestingTooDeep { .. }
        )
    }
}

/// Convenience alias used throughout sexp-core.
pub type Result<T> = std::result::Result<T, SexpError>;
