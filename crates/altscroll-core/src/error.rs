use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Surface element is detached: {0}")]
    Detached(&'static str),

    #[error("No snap targets: content has no children")]
    NoChildren,

    #[error("Snap index {index} out of range (children: {len})")]
    SnapIndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
