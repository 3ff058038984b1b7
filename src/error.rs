//! Field-level resolution errors.
//!
//! Both variants render the field invalid; only the logs tell them apart. A
//! pending lookup is not an error and has no variant here.

/// Why a typed alias could not be turned into an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The naming service answered and has no record for the alias.
    NotFound {
        /// The alias as typed.
        input: String,
    },
    /// The naming service could not be asked.
    Transport {
        /// The alias as typed.
        input: String,
        /// Error reported by the resolver.
        message: String,
    },
}

impl ResolutionError {
    pub fn input(&self) -> &str {
        match self {
            ResolutionError::NotFound { input } | ResolutionError::Transport { input, .. } => input,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ResolutionError::Transport { .. })
    }
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::NotFound { input } => write!(f, "no address found for {}", input),
            ResolutionError::Transport { input, message } => {
                write!(f, "failed to resolve {}: {}", input, message)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}
