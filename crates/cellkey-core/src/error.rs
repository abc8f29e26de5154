use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Validation errors
    #[error("Unknown locker number: {0}")]
    UnknownLocker(String),

    #[error("Invalid access code: {0}")]
    InvalidCode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
