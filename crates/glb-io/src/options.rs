//! Decoding options.

use serde::{Deserialize, Serialize};

/// Options for decoding accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Decode accessors with an unrecognised component type as zeros
    /// instead of failing.
    pub lenient: bool,
    /// Apply the accessor's `normalized` flag in the typed readers.
    pub normalize: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            lenient: false,
            normalize: true,
        }
    }
}

impl DecodeOptions {
    /// Create default (strict) decode options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the zero fallback for unknown component types.
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Return raw integer values even for normalized accessors.
    pub fn raw(mut self) -> Self {
        self.normalize = false;
        self
    }
}
