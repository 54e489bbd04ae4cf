use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions surfaced by the crate.
///
/// Exhaustion of an execution source is deliberately absent: it is the
/// normal terminal signal of a prediction stream, not a failure. Every
/// variant carries the triggering input (path, field name, line number)
/// so a driver can report it and exit non-zero.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed mapping file {}: line {line} does not contain two tab-separated fields", .path.display())]
    MalformedMappingFile { path: PathBuf, line: usize },

    #[error("malformed vocabulary file {}: line {line} has an unparseable count field", .path.display())]
    MalformedVocabFile { path: PathBuf, line: usize },

    #[error("batch field {field:?} holds {actual} examples, expected {expected}")]
    BatchShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "attention matrix of shape [{rows}, {cols}] cannot align {targets} predicted tokens \
         against {sources} source tokens"
    )]
    AlignmentShapeMismatch {
        rows: usize,
        cols: usize,
        targets: usize,
        sources: usize,
    },

    #[error("attention row {row} holds {actual} scores, expected {expected}")]
    RaggedAttentionRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("no model class registered under {name:?}")]
    ModelResolutionFailure { name: String },

    #[error("invalid training options in {}", .path.display())]
    InvalidTrainOptions {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("execution source fault: {0}")]
    ExecutionFault(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wraps an arbitrary source-side failure as an [`Error::ExecutionFault`].
    pub fn execution_fault<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::ExecutionFault(Box::new(err))
    }

    /// Attaches the offending path to an IO failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
