use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Typed failures of the chart core. The loading layer wraps these in
/// `anyhow::Error` with file/row context; the UI shows them in the status line.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    #[error("no records for category '{category}'")]
    EmptyCategory { category: String },

    #[error("row {row}: field '{field}' has unparseable value '{value}'")]
    MalformedField {
        row: usize,
        field: String,
        value: String,
    },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("axis bound for maximum {0} does not fit in an i64")]
    DomainOverflow(i64),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ChartError {
    pub fn empty_category(category: impl Into<String>) -> Self {
        Self::EmptyCategory {
            category: category.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
