//! Accessor decoding.
//!
//! An accessor describes how to read `count` elements out of a buffer view:
//! each element is `AccessorType::component_count()` components of one
//! `ComponentType`, and consecutive elements are `byteStride` bytes apart
//! (tightly packed when the view declares no stride).
//!
//! Decoding resolves accessor -> buffer view -> byte range and returns the
//! elements in accessor order. Every read is bounds-checked against the
//! buffer view, and unknown type codes are errors unless lenient decoding is
//! requested through [`DecodeOptions`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::container::GlbContainer;
use crate::error::{GlbError, Result};
use crate::options::DecodeOptions;
use crate::schema::Gltf;

/// Numeric type of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    /// Signed 8-bit integer (5120).
    Byte,
    /// Unsigned 8-bit integer (5121).
    UnsignedByte,
    /// Signed 16-bit integer (5122).
    Short,
    /// Unsigned 16-bit integer (5123).
    UnsignedShort,
    /// Unsigned 32-bit integer (5125).
    UnsignedInt,
    /// 32-bit IEEE float (5126).
    Float,
}

impl ComponentType {
    /// All component types in code order.
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Byte,
        ComponentType::UnsignedByte,
        ComponentType::Short,
        ComponentType::UnsignedShort,
        ComponentType::UnsignedInt,
        ComponentType::Float,
    ];

    /// Look up a glTF component type code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            5120 => Some(Self::Byte),
            5121 => Some(Self::UnsignedByte),
            5122 => Some(Self::Short),
            5123 => Some(Self::UnsignedShort),
            5125 => Some(Self::UnsignedInt),
            5126 => Some(Self::Float),
            _ => None,
        }
    }

    /// Look up a `componentType` value as it appears in JSON.
    ///
    /// Anything that is not an integer code from the table is `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        value
            .as_u64()
            .and_then(|code| u32::try_from(code).ok())
            .and_then(Self::from_code)
    }

    /// The glTF code for this component type.
    pub fn code(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// Whether the type is an unsigned integer (valid for index data).
    pub fn is_unsigned_integer(self) -> bool {
        matches!(self, Self::UnsignedByte | Self::UnsignedShort | Self::UnsignedInt)
    }

    /// Name as written in glTF JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        }
    }

    /// Read one little-endian component from the start of `bytes`.
    ///
    /// `bytes` must hold at least [`size`](Self::size) bytes.
    fn read(self, b: &[u8]) -> f64 {
        match self {
            Self::Byte => i8::from_le_bytes([b[0]]) as f64,
            Self::UnsignedByte => b[0] as f64,
            Self::Short => i16::from_le_bytes([b[0], b[1]]) as f64,
            Self::UnsignedShort => u16::from_le_bytes([b[0], b[1]]) as f64,
            Self::UnsignedInt => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Self::Float => f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
        }
    }

    /// Map a raw integer value into [0, 1] (unsigned) or [-1, 1] (signed).
    ///
    /// Floats and 32-bit integers are returned unchanged.
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Self::Byte => (value / 127.0).max(-1.0),
            Self::UnsignedByte => value / 255.0,
            Self::Short => (value / 32767.0).max(-1.0),
            Self::UnsignedShort => value / 65535.0,
            Self::UnsignedInt | Self::Float => value,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    /// Look up a glTF accessor type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            "MAT2" => Some(Self::Mat2),
            "MAT3" => Some(Self::Mat3),
            "MAT4" => Some(Self::Mat4),
            _ => None,
        }
    }

    /// Look up a `type` value as it appears in JSON.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::from_name)
    }

    /// Name as written in glTF JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }

    /// Number of components per element.
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

impl fmt::Display for AccessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded accessor element.
///
/// Serializes as a bare number for scalars and as an array otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    /// Single value of a SCALAR accessor.
    Scalar(f64),
    /// Components of a vector or matrix element, in storage order.
    Vector(SmallVec<[f64; 4]>),
}

impl Element {
    fn from_components(components: SmallVec<[f64; 4]>) -> Self {
        if components.len() == 1 {
            Element::Scalar(components[0])
        } else {
            Element::Vector(components)
        }
    }

    /// Components of the element (a one-element slice for scalars).
    pub fn components(&self) -> &[f64] {
        match self {
            Element::Scalar(value) => std::slice::from_ref(value),
            Element::Vector(values) => values,
        }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components().len()
    }

    /// Always false: elements have at least one component.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The value of a scalar element.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Element::Scalar(value) => Some(*value),
            Element::Vector(_) => None,
        }
    }
}

/// Decode accessor `index` strictly.
pub fn decode_accessor(metadata: &Gltf, binary: &[u8], index: usize) -> Result<Vec<Element>> {
    decode_accessor_with(metadata, binary, index, &DecodeOptions::default())
}

/// Decode accessor `index` with explicit options.
///
/// Returns exactly `accessor.count` elements or an error; partial results are
/// never returned.
pub fn decode_accessor_with(
    metadata: &Gltf,
    binary: &[u8],
    index: usize,
    options: &DecodeOptions,
) -> Result<Vec<Element>> {
    let accessor = metadata.accessors.get(index).ok_or(GlbError::AccessorNotFound {
        index,
        available: metadata.accessors.len(),
    })?;

    let view_idx = accessor
        .buffer_view
        .ok_or(GlbError::MissingBufferView { accessor: index })?;

    let view = metadata
        .buffer_views
        .get(view_idx)
        .ok_or(GlbError::BufferViewNotFound {
            accessor: index,
            index: view_idx,
            available: metadata.buffer_views.len(),
        })?;

    let view_end = view.byte_offset.saturating_add(view.byte_length);
    let view_bytes = binary
        .get(view.byte_offset..view_end)
        .ok_or(GlbError::BufferViewOutOfBounds {
            buffer_view: view_idx,
            end: view_end,
            buffer_length: binary.len(),
        })?;

    let accessor_type = accessor.element_kind().ok_or_else(|| GlbError::UnsupportedAccessorType {
        accessor: index,
        accessor_type: accessor.accessor_type.clone(),
    })?;
    let components = accessor_type.component_count();

    let component_type = match accessor.component_kind() {
        Some(ct) => ct,
        None if options.lenient => {
            // Every component takes at least one byte, so a count that cannot
            // fit one byte per component is out of bounds whatever the width.
            let footprint = accessor
                .count
                .checked_mul(components)
                .and_then(|bytes| bytes.checked_add(accessor.byte_offset));
            if footprint.map_or(true, |end| end > view_bytes.len()) {
                return Err(GlbError::AccessorOutOfBounds {
                    accessor: index,
                    buffer_view: view_idx,
                    offset: accessor.byte_offset,
                    needed: accessor.count.saturating_mul(components),
                    view_length: view_bytes.len(),
                });
            }
            warn!(
                accessor = index,
                component_type = %accessor.component_type,
                "unsupported component type, decoding as zeros"
            );
            let zero = Element::from_components(SmallVec::from_elem(0.0, components));
            return Ok(vec![zero; accessor.count]);
        }
        None => {
            return Err(GlbError::UnsupportedComponentType {
                accessor: index,
                component_type: accessor.component_type.clone(),
            })
        }
    };

    let component_size = component_type.size();
    let element_size = component_size * components;
    let stride = view.stride().unwrap_or(element_size);

    trace!(
        accessor = index,
        buffer_view = view_idx,
        %component_type,
        %accessor_type,
        count = accessor.count,
        stride,
        "decoding accessor"
    );

    if accessor.count == 0 {
        return Ok(Vec::new());
    }

    // Offsets grow with the element index, so the last element bounds all reads.
    let last_offset = accessor
        .byte_offset
        .saturating_add((accessor.count - 1).saturating_mul(stride));
    if last_offset.saturating_add(element_size) > view_bytes.len() {
        let bad = first_out_of_bounds(accessor.byte_offset, stride, component_size, components, view_bytes.len());
        return Err(GlbError::AccessorOutOfBounds {
            accessor: index,
            buffer_view: view_idx,
            offset: bad.unwrap_or(last_offset),
            needed: component_size,
            view_length: view_bytes.len(),
        });
    }

    let mut elements = Vec::with_capacity(accessor.count);
    for i in 0..accessor.count {
        let element_offset = accessor.byte_offset + i * stride;
        let values: SmallVec<[f64; 4]> = (0..components)
            .map(|j| {
                let offset = element_offset + j * component_size;
                component_type.read(&view_bytes[offset..offset + component_size])
            })
            .collect();
        elements.push(Element::from_components(values));
    }

    Ok(elements)
}

/// Find the first component read that does not fit in the view.
fn first_out_of_bounds(
    base: usize,
    stride: usize,
    component_size: usize,
    components: usize,
    view_length: usize,
) -> Option<usize> {
    let mut element_offset = base;
    loop {
        for j in 0..components {
            let offset = element_offset.checked_add(j * component_size)?;
            if offset.saturating_add(component_size) > view_length {
                return Some(offset);
            }
        }
        element_offset = element_offset.checked_add(stride)?;
        if stride == 0 {
            return None;
        }
    }
}

impl GlbContainer {
    /// Decode accessor `index` from this container strictly.
    pub fn decode_accessor(&self, index: usize) -> Result<Vec<Element>> {
        decode_accessor(self.metadata(), self.binary_buffer(), index)
    }

    /// Decode accessor `index` from this container with explicit options.
    pub fn decode_accessor_with(&self, index: usize, options: &DecodeOptions) -> Result<Vec<Element>> {
        decode_accessor_with(self.metadata(), self.binary_buffer(), index, options)
    }
}
