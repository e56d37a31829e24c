use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no data to display")]
    NoData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
