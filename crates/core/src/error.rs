use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Config parse: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("Validation: {0}")]
  Validation(String),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
