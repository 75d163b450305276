/// Crate-wide result alias.
pub type FlavorResult<T> = Result<T, FlavorError>;

/// Errors produced by the bag pipeline and its client layers.
///
/// Unrecognized enum values in bag records are not errors: the resolver substitutes defaults.
#[derive(thiserror::Error, Debug)]
pub enum FlavorError {
    /// Malformed input (zero-sized image, invalid data URL, malformed model manifest, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// The shared base model could not be loaded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// A per-bag image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// A remote API request failed or returned a non-2xx status.
    #[error("network error: {message}")]
    Network {
        /// HTTP status code when a response was received.
        status: Option<u16>,
        /// Message suitable for display to the user.
        message: String,
    },

    /// Building or drawing a bag visual failed.
    #[error("render error: {0}")]
    Render(String),

    /// Local (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually IO wrapped with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlavorError {
    /// Build a [`FlavorError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlavorError::AssetLoad`].
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`FlavorError::ImageLoad`].
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`FlavorError::Network`] without a status code.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            status: None,
            message: msg.into(),
        }
    }

    /// Build a [`FlavorError::Network`] for a received non-2xx response.
    pub fn http_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Network {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Build a [`FlavorError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FlavorError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Text to show in a status line or alert.
    ///
    /// Network and validation failures show their message verbatim; everything else shows the
    /// full display string.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message, .. } | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
