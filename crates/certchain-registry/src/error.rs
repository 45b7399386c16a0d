use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("ledger error: {0}")]
    Ledger(#[from] certchain_ledger::LedgerError),

    #[error("proof-of-work error: {0}")]
    Pow(#[from] certchain_crypto::PowError),

    #[error("invalid certificate: {0}")]
    Type(#[from] certchain_types::TypeError),

    #[error("render error: {0}")]
    Render(#[from] certchain_render::RenderError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
