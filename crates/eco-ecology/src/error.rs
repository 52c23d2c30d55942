use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcologyError {
    #[error("ecology configuration error: {0}")]
    Config(String),
}

pub type EcologyResult<T> = Result<T, EcologyError>;
