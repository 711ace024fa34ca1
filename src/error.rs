use thiserror::Error;

pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not have the columns the selected schema expects.
    #[error("Schema mismatch: {0}")]
    Schema(String),

    /// A cell that must be numeric could not be coerced.
    #[error("Parse error at row {row}, column '{column}': cannot read '{value}' as a number")]
    Parse {
        /// 1-based data row (header excluded)
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Style config error: {0}")]
    Style(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_yaml::Error> for QuoteError {
    fn from(e: serde_yaml::Error) -> Self {
        QuoteError::Style(e.to_string())
    }
}
