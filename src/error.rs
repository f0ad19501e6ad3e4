// src/error.rs

//! Error taxonomy for plotting operations.
//!
//! Every plotting operation is fail-fast per invocation: an error
//! aborts that single operation and leaves canvas state from prior
//! operations untouched. Nothing here is retried automatically.

use std::path::PathBuf;

use thiserror::Error;

/// A malformed expression.
///
/// Evaluation carries a single sticky error flag rather than a span or
/// kind: once anything goes wrong the whole result is invalid, and the
/// expression itself is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid expression")]
pub struct ExprError;

/// Failure of a single plot command.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The expression could not be evaluated; no curve was drawn.
    #[error("invalid expression: {expr}")]
    Expr { expr: String },

    /// The data file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file was read but no row yielded two numeric values
    /// in the selected columns.
    #[error("no plottable rows in {}", path.display())]
    NoData { path: PathBuf },
}
