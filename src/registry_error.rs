use std::error::Error;

/// Boxed error produced by a fallible constructor.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Type not found in registry: {type_name}")]
    TypeNotFound { type_name: &'static str },

    #[error("Type mismatch in registry for type: {type_name}")]
    TypeMismatch { type_name: &'static str },

    /// The constructor returned an error. The key stays absent.
    #[error("Failed to construct {type_name}: {source}")]
    Construction {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// A constructor asked the same registry for its own type.
    #[error("Recursive construction of {type_name}")]
    RecursiveConstruction { type_name: &'static str },
}

impl RegistryError {
    /// Type name the error refers to.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryError::TypeNotFound { type_name }
            | RegistryError::TypeMismatch { type_name }
            | RegistryError::Construction { type_name, .. }
            | RegistryError::RecursiveConstruction { type_name } => type_name,
        }
    }
}
