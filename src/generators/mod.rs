// src/generators/mod.rs
use thiserror::Error;

pub mod charset;
pub mod password;

pub use password::PasswordGenerator;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Invalid difficulty level: {0:?}")]
    InvalidTier(String),

    #[error("Password length must be greater than zero (got {0})")]
    InvalidLength(i64),

    #[error("Character set is empty, cannot generate password")]
    EmptyAlphabet,
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
