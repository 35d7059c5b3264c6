//! Catalog error types.

/// A catalog entry that cannot be composed into the scene.
///
/// Errors are per body: a rejected body is left out of the scene while its
/// siblings still compose.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DescriptorError {
    /// The descriptor is malformed (flag without payload, out-of-range value, ...).
    #[error("body `{id}`: invalid descriptor: {reason}")]
    InvalidDescriptor { id: String, reason: String },

    /// Orbit radius or semi-major axis is not strictly positive.
    #[error("body `{id}`: degenerate orbit: {detail}")]
    DegenerateOrbit { id: String, detail: String },
}

impl DescriptorError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(id: &str, detail: impl Into<String>) -> Self {
        Self::DegenerateOrbit {
            id: id.to_string(),
            detail: detail.into(),
        }
    }

    /// Identifier of the offending body.
    pub fn body_id(&self) -> &str {
        match self {
            Self::InvalidDescriptor { id, .. } | Self::DegenerateOrbit { id, .. } => id,
        }
    }
}

/// Errors that can occur when loading or saving a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("failed to read catalog: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the catalog file.
    #[error("failed to write catalog: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse catalog: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the catalog to RON.
    #[error("failed to serialize catalog: {0}")]
    SerializeError(#[source] ron::Error),
}
