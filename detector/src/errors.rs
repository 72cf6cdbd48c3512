use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed message: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
