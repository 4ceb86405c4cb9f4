use thiserror::Error;

use crate::Ident;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Mutation attempted while the registry is fixed in compiled mode.
    #[error("Cannot {operation} `{ident}`: registry is in compiled mode")]
    CompiledMode {
        operation: &'static str,
        ident: Ident,
    },
    #[error("Synthesized implementation collides with an existing one: {0}")]
    SynthesisCollision(Ident),
    #[error("Global registry already initialized")]
    AlreadyInitialized,
    #[error("Config error: {0}")]
    Config(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    pub fn compiled_mode(operation: &'static str, ident: Ident) -> Self {
        RegistryError::CompiledMode {
            operation,
            ident: ident.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        RegistryError::Config(message.into())
    }
}
