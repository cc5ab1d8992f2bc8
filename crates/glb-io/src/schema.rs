//! glTF 2.0 JSON schema types.
//!
//! Only the parts of the document needed to locate and decode vertex data are
//! modelled. Unknown fields (nodes, materials, textures, ...) are ignored.
//! `componentType` and `type` are kept as raw JSON values, so a bad value on
//! one accessor fails only that accessor's decode and not the whole document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accessor::{AccessorType, ComponentType};

/// Root glTF object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gltf {
    /// Asset information.
    pub asset: Asset,
    /// Meshes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,
    /// Accessors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    /// Buffer views.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    /// Buffers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,
    /// Extension names used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,
}

/// Asset metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// glTF version.
    pub version: String,
    /// Generator name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Copyright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: None,
            copyright: None,
        }
    }
}

/// A mesh containing primitives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Mesh primitives.
    pub primitives: Vec<Primitive>,
}

/// A mesh primitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Primitive {
    /// Vertex attributes (POSITION, NORMAL, TEXCOORD_0, etc.) in document order.
    pub attributes: IndexMap<String, usize>,
    /// Index accessor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<usize>,
    /// Material index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,
    /// Rendering mode (0=POINTS, 1=LINES, 4=TRIANGLES, etc.).
    #[serde(default = "default_primitive_mode")]
    pub mode: u32,
}

fn default_primitive_mode() -> u32 {
    PRIMITIVE_MODE_TRIANGLES
}

/// Triangle list primitive mode.
pub const PRIMITIVE_MODE_TRIANGLES: u32 = 4;

/// An accessor for typed buffer data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Buffer view index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    /// Byte offset within buffer view.
    #[serde(default)]
    pub byte_offset: usize,
    /// Component type code as declared (5120..=5126 when valid).
    #[serde(default)]
    pub component_type: Value,
    /// Number of elements.
    pub count: usize,
    /// Element type as declared ("SCALAR", "VEC2", ..., "MAT4" when valid).
    #[serde(rename = "type", default)]
    pub accessor_type: Value,
    /// Whether integer values are normalized.
    #[serde(default)]
    pub normalized: bool,
    /// Minimum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f64>>,
    /// Maximum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f64>>,
    /// Accessor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Accessor {
    /// Parsed component type, if the code is known.
    pub fn component_kind(&self) -> Option<ComponentType> {
        ComponentType::from_json(&self.component_type)
    }

    /// Parsed element type, if the name is known.
    pub fn element_kind(&self) -> Option<AccessorType> {
        AccessorType::from_json(&self.accessor_type)
    }

    /// Component type name, or the declared value when it is not a known code.
    pub fn component_type_name(&self) -> String {
        self.component_kind()
            .map_or_else(|| self.component_type.to_string(), |ct| ct.name().to_string())
    }

    /// Element type name, or the declared value when it is not a known name.
    pub fn element_type_name(&self) -> String {
        self.element_kind()
            .map_or_else(|| self.accessor_type.to_string(), |t| t.name().to_string())
    }

    /// Size in bytes of one tightly packed element, if both codes are known.
    pub fn element_size(&self) -> Option<usize> {
        Some(self.component_kind()?.size() * self.element_kind()?.component_count())
    }
}

/// A view into a buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    /// Buffer index.
    #[serde(default)]
    pub buffer: usize,
    /// Byte offset into buffer.
    #[serde(default)]
    pub byte_offset: usize,
    /// Byte length.
    pub byte_length: usize,
    /// Byte stride for vertex data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<usize>,
    /// Target (34962=ARRAY_BUFFER, 34963=ELEMENT_ARRAY_BUFFER).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Buffer view name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BufferView {
    /// Stride between elements, if one is declared.
    ///
    /// A stride of zero means tightly packed.
    pub fn stride(&self) -> Option<usize> {
        self.byte_stride.filter(|&s| s > 0)
    }
}

/// A buffer containing binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    /// Byte length.
    pub byte_length: usize,
    /// URI (absent for the GLB binary chunk).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}
