use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request header {0:?}")]
    InvalidHeader(String),

    #[error("Transport task ended without reporting completion")]
    CallbackDropped,

    #[error(transparent)]
    Core(#[from] rapip_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
