use capnet_build::BuildError;
use capnet_io::IoError;
use capnet_ledger::LedgerError;
use capnet_route::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("topology has not been built yet")]
    TopologyNotBuilt,

    #[error("topology build failed: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Io(#[from] IoError),
}

pub type SimResult<T> = Result<T, SimError>;
