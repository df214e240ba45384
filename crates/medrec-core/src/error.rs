use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid birthday: {0:?}")]
    InvalidBirthday(String),
}

pub type Result<T> = std::result::Result<T, Error>;
