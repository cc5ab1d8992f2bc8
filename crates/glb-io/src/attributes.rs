//! Typed vertex attribute readers.

use glam::{Vec2, Vec3};

use crate::accessor::{AccessorType, ComponentType, Element};
use crate::container::GlbContainer;
use crate::error::{GlbError, Result};
use crate::options::DecodeOptions;
use crate::schema::{Accessor, Gltf, Primitive};

/// Position attribute semantic.
pub const POSITION: &str = "POSITION";
/// Normal attribute semantic.
pub const NORMAL: &str = "NORMAL";
/// First texture coordinate set.
pub const TEXCOORD_0: &str = "TEXCOORD_0";

/// Read a VEC3 accessor as positions.
pub fn read_positions(container: &GlbContainer, accessor: usize) -> Result<Vec<Vec3>> {
    read_positions_with(container, accessor, &DecodeOptions::default())
}

/// Read a VEC3 accessor as positions with explicit options.
pub fn read_positions_with(
    container: &GlbContainer,
    accessor: usize,
    options: &DecodeOptions,
) -> Result<Vec<Vec3>> {
    let values = read_vectors(container, accessor, AccessorType::Vec3, options)?;
    Ok(values
        .iter()
        .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32))
        .collect())
}

/// Read a VEC2 accessor as texture coordinates.
pub fn read_texcoords(container: &GlbContainer, accessor: usize) -> Result<Vec<Vec2>> {
    read_texcoords_with(container, accessor, &DecodeOptions::default())
}

/// Read a VEC2 accessor as texture coordinates with explicit options.
///
/// Normalized integer coordinates are mapped into [0, 1] unless
/// [`DecodeOptions::normalize`] is off.
pub fn read_texcoords_with(
    container: &GlbContainer,
    accessor: usize,
    options: &DecodeOptions,
) -> Result<Vec<Vec2>> {
    let values = read_vectors(container, accessor, AccessorType::Vec2, options)?;
    Ok(values
        .iter()
        .map(|c| Vec2::new(c[0] as f32, c[1] as f32))
        .collect())
}

/// Read an index accessor.
///
/// The accessor must be SCALAR with an unsigned integer component type.
pub fn read_indices(container: &GlbContainer, accessor: usize) -> Result<Vec<u32>> {
    let acc = lookup(container.metadata(), accessor)?;
    let is_index_type = acc.element_kind() == Some(AccessorType::Scalar)
        && acc.component_kind().map_or(false, ComponentType::is_unsigned_integer);
    if !is_index_type {
        return Err(GlbError::TypeMismatch {
            accessor,
            expected: "unsigned integer SCALAR".into(),
            found: describe(acc),
        });
    }

    let elements = container.decode_accessor(accessor)?;
    Ok(elements
        .iter()
        .filter_map(Element::as_scalar)
        .map(|v| v as u32)
        .collect())
}

/// Decode an accessor of the given element type into component arrays.
fn read_vectors(
    container: &GlbContainer,
    accessor: usize,
    expected: AccessorType,
    options: &DecodeOptions,
) -> Result<Vec<Vec<f64>>> {
    let acc = lookup(container.metadata(), accessor)?;
    if let Some(found) = acc.element_kind() {
        if found != expected {
            return Err(GlbError::TypeMismatch {
                accessor,
                expected: expected.name().into(),
                found: found.name().into(),
            });
        }
    }

    let elements = container.decode_accessor_with(accessor, options)?;
    let normalize = match acc.component_kind() {
        Some(ct) if options.normalize && acc.normalized => Some(ct),
        _ => None,
    };

    Ok(elements
        .iter()
        .map(|e| {
            e.components()
                .iter()
                .map(|&v| normalize.map_or(v, |ct| ct.normalize(v)))
                .collect()
        })
        .collect())
}

fn lookup(metadata: &Gltf, accessor: usize) -> Result<&Accessor> {
    metadata.accessors.get(accessor).ok_or(GlbError::AccessorNotFound {
        index: accessor,
        available: metadata.accessors.len(),
    })
}

fn describe(accessor: &Accessor) -> String {
    format!("{} {}", accessor.component_type_name(), accessor.element_type_name())
}

/// Look up a mesh primitive.
pub fn primitive(metadata: &Gltf, mesh: usize, primitive: usize) -> Result<&Primitive> {
    metadata
        .meshes
        .get(mesh)
        .ok_or(GlbError::MeshNotFound(mesh))?
        .primitives
        .get(primitive)
        .ok_or(GlbError::PrimitiveNotFound { mesh, primitive })
}

/// Resolve an attribute semantic of a mesh primitive to its accessor index.
pub fn attribute_accessor(
    metadata: &Gltf,
    mesh: usize,
    primitive_idx: usize,
    semantic: &str,
) -> Result<usize> {
    primitive(metadata, mesh, primitive_idx)?
        .attributes
        .get(semantic)
        .copied()
        .ok_or_else(|| GlbError::AttributeNotFound {
            mesh,
            primitive: primitive_idx,
            semantic: semantic.to_string(),
        })
}

/// Index accessor of a mesh primitive, if it is indexed.
pub fn indices_accessor(metadata: &Gltf, mesh: usize, primitive_idx: usize) -> Result<Option<usize>> {
    Ok(primitive(metadata, mesh, primitive_idx)?.indices)
}
