/// Convenience result type used across the kiosk engine.
pub type KioskResult<T> = Result<T, KioskError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KioskError {
    /// Missing or invalid startup configuration. Fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// Background image could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Transit feed transport or payload failure.
    #[error("feed error: {0}")]
    Feed(String),

    /// A layer handle is missing from the display surface.
    #[error("surface error: {0}")]
    Surface(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KioskError {
    /// Build a [`KioskError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`KioskError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`KioskError::Feed`] value.
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    /// Build a [`KioskError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Transient failures degrade to a placeholder and are retried on the next tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Feed(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
