//! Error types for glb-io.

use thiserror::Error;

/// Result type for glb-io operations.
pub type Result<T> = std::result::Result<T, GlbError>;

/// Errors that can occur while reading a GLB container or decoding an accessor.
#[derive(Debug, Error)]
pub enum GlbError {
    /// Header or chunk framing is truncated or inconsistent.
    #[error("malformed container at byte {offset}: {message}")]
    MalformedContainer {
        /// Error message.
        message: String,
        /// Byte offset where the problem was detected.
        offset: usize,
    },

    /// Header version is not 2.
    #[error("unsupported GLB version {0} (expected 2)")]
    UnsupportedVersion(u32),

    /// JSON chunk is not valid UTF-8 JSON or does not match the glTF schema.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(#[from] serde_json::Error),

    /// Accessor index out of range.
    #[error("accessor {index} not found ({available} accessors)")]
    AccessorNotFound {
        /// Requested accessor index.
        index: usize,
        /// Number of accessors in the document.
        available: usize,
    },

    /// Buffer view index out of range.
    #[error("accessor {accessor}: buffer view {index} not found ({available} buffer views)")]
    BufferViewNotFound {
        /// Accessor that referenced the view.
        accessor: usize,
        /// Requested buffer view index.
        index: usize,
        /// Number of buffer views in the document.
        available: usize,
    },

    /// Accessor has no buffer view.
    #[error("accessor {accessor} has no buffer view")]
    MissingBufferView {
        /// Accessor index.
        accessor: usize,
    },

    /// Component type outside the glTF table.
    #[error("accessor {accessor}: unsupported component type {component_type}")]
    UnsupportedComponentType {
        /// Accessor index.
        accessor: usize,
        /// Declared `componentType` value.
        component_type: serde_json::Value,
    },

    /// Element type outside the glTF table.
    #[error("accessor {accessor}: unsupported accessor type {accessor_type}")]
    UnsupportedAccessorType {
        /// Accessor index.
        accessor: usize,
        /// Declared `type` value.
        accessor_type: serde_json::Value,
    },

    /// A component read would run past the end of the buffer view.
    #[error(
        "accessor {accessor}: read of {needed} bytes at offset {offset} exceeds buffer view {buffer_view} length {view_length}"
    )]
    AccessorOutOfBounds {
        /// Accessor index.
        accessor: usize,
        /// Buffer view index.
        buffer_view: usize,
        /// Offset of the read within the view.
        offset: usize,
        /// Bytes the read needs.
        needed: usize,
        /// Declared byte length of the view.
        view_length: usize,
    },

    /// Buffer view region lies outside the binary chunk.
    #[error("buffer view {buffer_view} ends at byte {end} but the binary buffer has {buffer_length} bytes")]
    BufferViewOutOfBounds {
        /// Buffer view index.
        buffer_view: usize,
        /// End of the declared region.
        end: usize,
        /// Length of the binary buffer.
        buffer_length: usize,
    },

    /// Accessor element type differs from the one a typed reader requires.
    #[error("accessor {accessor}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Accessor index.
        accessor: usize,
        /// Required type.
        expected: String,
        /// Declared type.
        found: String,
    },

    /// Mesh index out of range.
    #[error("mesh {0} not found")]
    MeshNotFound(usize),

    /// Primitive index out of range.
    #[error("mesh {mesh}: primitive {primitive} not found")]
    PrimitiveNotFound {
        /// Mesh index.
        mesh: usize,
        /// Primitive index.
        primitive: usize,
    },

    /// Primitive does not carry the requested attribute.
    #[error("mesh {mesh} primitive {primitive} has no {semantic} attribute")]
    AttributeNotFound {
        /// Mesh index.
        mesh: usize,
        /// Primitive index.
        primitive: usize,
        /// Attribute semantic (e.g. "TEXCOORD_0").
        semantic: String,
    },
}

impl GlbError {
    /// Create a malformed container error.
    pub fn malformed(message: impl Into<String>, offset: usize) -> Self {
        Self::MalformedContainer {
            message: message.into(),
            offset,
        }
    }

    /// Whether this error concerns the container framing rather than one accessor.
    ///
    /// Callers that skip failing accessors should still abort on these.
    pub fn is_container_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedContainer { .. } | Self::UnsupportedVersion(_) | Self::InvalidMetadata(_)
        )
    }
}
