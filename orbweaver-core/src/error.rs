use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
