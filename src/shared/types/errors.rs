use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxError {
    #[error("Configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation failed: {context}")]
    Computation {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl TaxError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap an unexpected fault with the context it happened in.
    pub fn computation(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Computation {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Errors raised while loading an application config file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] TaxError),
}

/// Result type for tax operations
pub type TaxResult<T> = Result<T, TaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn computation_error_keeps_source() {
        let err = TaxError::computation("summing windows", Boom);
        assert_eq!(err.to_string(), "Computation failed: summing windows");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn config_load_error_is_transparent_for_domain_errors() {
        let err = ConfigLoadError::from(TaxError::config("bands overlap"));
        assert_eq!(err.to_string(), "Configuration: bands overlap");
    }
}
