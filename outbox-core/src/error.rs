use thiserror::Error;

#[derive(Error, Debug)]
pub enum SendError {
    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Api error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SendError>;
