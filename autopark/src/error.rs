//! Error types for AutoPark

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// AutoPark error types
///
/// The simulation core itself has no failure surface once constructed;
/// every variant here is raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Background image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration value out of its valid range
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidConfig`]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
