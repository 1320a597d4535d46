use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Input path missing or unreadable
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row structure could not be delimited
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
