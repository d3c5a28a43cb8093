use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt ledger entry at line {line}: {source}")]
    Corrupt { line: usize, source: serde_json::Error },

    #[error("resource '{0}' already exists in the ledger")]
    AlreadyExists(String),

    #[error("resource '{0}' not found in the ledger")]
    NotFound(String),
}
