use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid indicator height: {0} (must be finite and positive)")]
    InvalidIndicatorHeight(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
