//! glb-io: binary glTF (GLB) container reader and accessor decoder.
//!
//! Reading happens in two stages:
//!
//! ```text
//! bytes ──> read_container ──> GlbContainer { metadata, binary buffer }
//!                                   │
//!                                   └──> decode_accessor(index) ──> Vec<Element>
//! ```
//!
//! The container reader validates the 12-byte header and chunk framing and
//! parses the JSON chunk. The accessor decoder resolves
//! accessor -> buffer view -> byte range and decodes strided, typed elements
//! with every read bounds-checked.
//!
//! # Quick Start
//!
//! ```
//! use glb_io::{attributes, read_container};
//!
//! # fn main() -> glb_io::Result<()> {
//! # let mut json = br#"{
//! #     "asset": {"version": "2.0"},
//! #     "bufferViews": [
//! #         {"buffer": 0, "byteLength": 12},
//! #         {"buffer": 0, "byteOffset": 12, "byteLength": 8}
//! #     ],
//! #     "accessors": [
//! #         {"bufferView": 0, "componentType": 5126, "type": "VEC3", "count": 1},
//! #         {"bufferView": 1, "componentType": 5126, "type": "VEC2", "count": 1}
//! #     ],
//! #     "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "TEXCOORD_0": 1}}]}]
//! # }"#.to_vec();
//! # while json.len() % 4 != 0 {
//! #     json.push(b' ');
//! # }
//! # let bin: Vec<u8> = [0.0f32, 1.0, 2.0, 0.25, 0.75].iter().flat_map(|v| v.to_le_bytes()).collect();
//! # let mut file_bytes = Vec::new();
//! # file_bytes.extend_from_slice(b"glTF");
//! # file_bytes.extend_from_slice(&2u32.to_le_bytes());
//! # file_bytes.extend_from_slice(&((28 + json.len() + bin.len()) as u32).to_le_bytes());
//! # file_bytes.extend_from_slice(&(json.len() as u32).to_le_bytes());
//! # file_bytes.extend_from_slice(b"JSON");
//! # file_bytes.extend_from_slice(&json);
//! # file_bytes.extend_from_slice(&(bin.len() as u32).to_le_bytes());
//! # file_bytes.extend_from_slice(b"BIN\0");
//! # file_bytes.extend_from_slice(&bin);
//! let container = read_container(&file_bytes)?;
//! let positions = container.decode_accessor(0)?;
//! assert_eq!(positions[0].components(), [0.0, 1.0, 2.0]);
//!
//! let uv = attributes::attribute_accessor(container.metadata(), 0, 0, "TEXCOORD_0")?;
//! let uvs = attributes::read_texcoords(&container, uv)?;
//! assert_eq!(uvs[0], glam::Vec2::new(0.25, 0.75));
//! # Ok(())
//! # }
//! ```
//!
//! # Supported data
//!
//! | Component type | Code | Bytes |
//! |----------------|------|-------|
//! | BYTE | 5120 | 1 |
//! | UNSIGNED_BYTE | 5121 | 1 |
//! | SHORT | 5122 | 2 |
//! | UNSIGNED_SHORT | 5123 | 2 |
//! | UNSIGNED_INT | 5125 | 4 |
//! | FLOAT | 5126 | 4 |
//!
//! Element types SCALAR, VEC2, VEC3, VEC4, MAT2, MAT3 and MAT4 are decoded;
//! anything else is an error.

pub mod accessor;
pub mod analysis;
pub mod attributes;
pub mod container;
pub mod error;
pub mod options;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use accessor::{decode_accessor, decode_accessor_with, AccessorType, ComponentType, Element};
pub use analysis::{
    primitive_reports, summarize_accessors, AccessorSummary, Bounds, PositionBounds,
    PrimitiveReport, UvReport,
};
pub use container::{is_glb, read_container, GlbContainer};
pub use error::{GlbError, Result};
pub use options::DecodeOptions;
pub use schema::Gltf;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::GlbBuilder;
    use serde_json::json;

    #[test]
    fn test_triangle_positions_end_to_end() {
        let bytes = GlbBuilder::new()
            .push_f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .view(0, 36, None)
            .accessor(0, 5126, "VEC3", 3)
            .mesh_json(json!({"primitives": [{"attributes": {"POSITION": 0}}]}))
            .build();

        let container = read_container(&bytes).unwrap();
        let accessor = attributes::attribute_accessor(container.metadata(), 0, 0, "POSITION").unwrap();
        let elements = decode_accessor(container.metadata(), container.binary_buffer(), accessor).unwrap();

        let tuples: Vec<&[f64]> = elements.iter().map(Element::components).collect();
        assert_eq!(
            tuples,
            [&[0.0, 0.0, 0.0][..], &[1.0, 0.0, 0.0][..], &[0.0, 1.0, 0.0][..]]
        );
    }

    #[test]
    fn test_texcoords_end_to_end() {
        let bytes = GlbBuilder::new()
            .push_f32s(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])
            .view(0, 32, None)
            .accessor_json(json!({
                "bufferView": 0, "componentType": 5126, "type": "VEC2", "count": 4,
                "min": [0.0, 0.0], "max": [1.0, 1.0]
            }))
            .build();

        let container = read_container(&bytes).unwrap();
        let elements = container.decode_accessor(0).unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[2].components(), [1.0, 1.0]);

        let bounds = Bounds::of(&elements).unwrap();
        assert_eq!(bounds.min, [0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0]);
        assert_eq!(Some(bounds), Bounds::declared(&container.metadata().accessors[0]));
    }

    #[test]
    fn test_two_triangle_indices_end_to_end() {
        let bytes = GlbBuilder::new()
            .push_u16s(&[0, 1, 2, 0, 2, 3])
            .view(0, 12, None)
            .accessor(0, 5123, "SCALAR", 6)
            .build();

        let container = read_container(&bytes).unwrap();
        let elements = container.decode_accessor(0).unwrap();
        assert!(elements.iter().all(|e| matches!(e, Element::Scalar(_))));
        assert_eq!(
            elements,
            [0.0, 1.0, 2.0, 0.0, 2.0, 3.0].map(Element::Scalar).to_vec()
        );
    }

    #[test]
    fn test_eight_byte_input_is_malformed() {
        let err = read_container(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, GlbError::MalformedContainer { .. }));
    }
}
