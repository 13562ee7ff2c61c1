use thiserror::Error;

/// Errors that abort the chart pipeline
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Invalid date '{value}' on data line {line} (expected e.g. 1-May-12)")]
    InvalidDate { line: usize, value: String },
    #[error("No rows to plot")]
    EmptyDataset,
    #[error("Render error: {0}")]
    Render(String),
}

impl From<csv::Error> for ChartError {
    fn from(e: csv::Error) -> Self {
        ChartError::Csv(e.to_string())
    }
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
