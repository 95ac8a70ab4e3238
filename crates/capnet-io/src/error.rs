use capnet_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ledger rejected imported data: {0}")]
    Ledger(#[from] LedgerError),

    #[error("requested {requested} synthetic nodes but only {available} cities are available")]
    NotEnoughCities { requested: usize, available: usize },
}

pub type IoResult<T> = Result<T, IoError>;
