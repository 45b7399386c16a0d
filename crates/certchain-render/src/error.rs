use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Qr(String),

    #[error("could not allocate an output file for {0}")]
    NoFreeFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
