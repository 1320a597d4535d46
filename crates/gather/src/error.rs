use thiserror::Error;

/// Result type for gathering operations
pub type Result<T> = std::result::Result<T, GatherError>;

#[derive(Error, Debug)]
pub enum GatherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collaborator binary could not be started at all. A started binary
    /// that exits nonzero is a [`crate::ToolOutcome`], not an error.
    #[error("external tool `{tool}` failed to start: {source}")]
    ExternalTool {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}
