//! Statistics over decoded accessors.
//!
//! These are the numbers a mesh inspection report needs: per-accessor value
//! ranges, position bounds, and how texture coordinates sit relative to the
//! unit square.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::accessor::{AccessorType, ComponentType, Element};
use crate::attributes::{self, POSITION, TEXCOORD_0};
use crate::container::GlbContainer;
use crate::error::{GlbError, Result};
use crate::options::DecodeOptions;
use crate::schema::{Accessor, PRIMITIVE_MODE_TRIANGLES};

/// Relative tolerance when comparing declared and decoded bounds.
const BOUNDS_TOLERANCE: f64 = 1e-5;

/// Per-component value range of a decoded accessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    /// Minimum of each component.
    pub min: Vec<f64>,
    /// Maximum of each component.
    pub max: Vec<f64>,
}

impl Bounds {
    /// Compute component-wise bounds, or `None` for an empty sequence.
    pub fn of(elements: &[Element]) -> Option<Self> {
        let first = elements.first()?.components();
        let mut min = first.to_vec();
        let mut max = first.to_vec();

        for element in &elements[1..] {
            for (j, &v) in element.components().iter().enumerate() {
                if let (Some(lo), Some(hi)) = (min.get_mut(j), max.get_mut(j)) {
                    *lo = lo.min(v);
                    *hi = hi.max(v);
                }
            }
        }

        Some(Self { min, max })
    }

    /// Bounds declared in the accessor's `min`/`max`, if both are present.
    pub fn declared(accessor: &Accessor) -> Option<Self> {
        Some(Self {
            min: accessor.min.clone()?,
            max: accessor.max.clone()?,
        })
    }

    /// Whether two bounds agree within a small relative tolerance.
    pub fn approx_eq(&self, other: &Bounds) -> bool {
        fn close(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len()
                && a.iter().zip(b).all(|(x, y)| {
                    (x - y).abs() <= BOUNDS_TOLERANCE * x.abs().max(y.abs()).max(1.0)
                })
        }
        close(&self.min, &other.min) && close(&self.max, &other.max)
    }
}

/// Description and value range of one accessor.
#[derive(Debug, Clone, Serialize)]
pub struct AccessorSummary {
    /// Accessor index.
    pub index: usize,
    /// Accessor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Component type as declared.
    pub component_type: serde_json::Value,
    /// Element type.
    pub accessor_type: AccessorType,
    /// Number of elements.
    pub count: usize,
    /// Buffer view index.
    pub buffer_view: usize,
    /// Effective stride in bytes.
    pub stride: usize,
    /// Whether integer values are flagged as normalized.
    pub normalized: bool,
    /// Bounds from the accessor's `min`/`max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared: Option<Bounds>,
    /// Bounds of the decoded values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<Bounds>,
}

impl AccessorSummary {
    /// Name of the component type, or its numeric code if unknown.
    pub fn component_name(&self) -> String {
        ComponentType::from_json(&self.component_type)
            .map_or_else(|| self.component_type.to_string(), |ct| ct.name().to_string())
    }

    /// `Some(false)` when declared bounds disagree with the data.
    pub fn declared_matches(&self) -> Option<bool> {
        Some(self.declared.as_ref()?.approx_eq(self.computed.as_ref()?))
    }
}

/// Decode one accessor and summarize it.
pub fn summarize_accessor(
    container: &GlbContainer,
    index: usize,
    options: &DecodeOptions,
) -> Result<AccessorSummary> {
    let elements = container.decode_accessor_with(index, options)?;

    let metadata = container.metadata();
    let accessor = metadata.accessors.get(index).ok_or(GlbError::AccessorNotFound {
        index,
        available: metadata.accessors.len(),
    })?;
    let buffer_view = accessor
        .buffer_view
        .ok_or(GlbError::MissingBufferView { accessor: index })?;
    let accessor_type = accessor
        .element_kind()
        .ok_or_else(|| GlbError::UnsupportedAccessorType {
            accessor: index,
            accessor_type: accessor.accessor_type.clone(),
        })?;
    let stride = metadata
        .buffer_views
        .get(buffer_view)
        .and_then(|view| view.stride())
        .or_else(|| accessor.element_size())
        .unwrap_or(0);

    Ok(AccessorSummary {
        index,
        name: accessor.name.clone(),
        component_type: accessor.component_type.clone(),
        accessor_type,
        count: accessor.count,
        buffer_view,
        stride,
        normalized: accessor.normalized,
        declared: Bounds::declared(accessor),
        computed: Bounds::of(&elements),
    })
}

/// Summarize every accessor in the container.
///
/// Each accessor is decoded independently; a failure is reported in its slot
/// and does not stop the others.
pub fn summarize_accessors(container: &GlbContainer, options: &DecodeOptions) -> Vec<Result<AccessorSummary>> {
    (0..container.metadata().accessors.len())
        .map(|index| summarize_accessor(container, index, options))
        .collect()
}

/// Axis-aligned box around a primitive's positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionBounds {
    /// Smallest x, y and z.
    pub min: Vec3,
    /// Largest x, y and z.
    pub max: Vec3,
}

impl PositionBounds {
    /// Box around `positions`, or `None` when there are none.
    pub fn of(positions: &[Vec3]) -> Option<Self> {
        let first = *positions.first()?;
        let (min, max) = positions[1..]
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Edge lengths along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Texture coordinate coverage of one UV set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvReport {
    /// Number of coordinates.
    pub count: usize,
    /// Smallest u and v.
    pub min: Vec2,
    /// Largest u and v.
    pub max: Vec2,
    /// Coordinates with u or v outside [0, 1].
    pub outside_unit_square: usize,
    /// Whether the coordinates cover more than one [0, 1] tile.
    pub spans_multiple_tiles: bool,
}

impl UvReport {
    /// Build a report, or `None` when there are no coordinates.
    pub fn from_texcoords(uvs: &[Vec2]) -> Option<Self> {
        let first = *uvs.first()?;
        let (min, max) = uvs[1..]
            .iter()
            .fold((first, first), |(lo, hi), uv| (lo.min(*uv), hi.max(*uv)));

        let outside_unit_square = uvs
            .iter()
            .filter(|uv| uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0)
            .count();

        // An upper bound of exactly 1.0 still belongs to tile 0.
        let low_tile = min.floor();
        let high_tile = max.ceil() - Vec2::ONE;
        let spans_multiple_tiles = high_tile.x > low_tile.x || high_tile.y > low_tile.y;

        Some(Self {
            count: uvs.len(),
            min,
            max,
            outside_unit_square,
            spans_multiple_tiles,
        })
    }

    /// Whether every coordinate lies in the unit square.
    pub fn in_unit_square(&self) -> bool {
        self.outside_unit_square == 0
    }
}

/// Geometry and UV statistics for one mesh primitive.
#[derive(Debug, Clone, Serialize)]
pub struct PrimitiveReport {
    /// Mesh index.
    pub mesh: usize,
    /// Mesh name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_name: Option<String>,
    /// Primitive index within the mesh.
    pub primitive: usize,
    /// Rendering mode.
    pub mode: u32,
    /// Attribute semantics in document order.
    pub attributes: Vec<String>,
    /// Number of vertices (POSITION count).
    pub vertex_count: usize,
    /// Number of triangles, for triangle-list primitives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triangle_count: Option<usize>,
    /// Position bounds, absent when the primitive has no vertices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<PositionBounds>,
    /// TEXCOORD_0 coverage, if the primitive has UVs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv: Option<UvReport>,
}

/// Report on one mesh primitive.
pub fn primitive_report(
    container: &GlbContainer,
    mesh: usize,
    primitive: usize,
    options: &DecodeOptions,
) -> Result<PrimitiveReport> {
    let metadata = container.metadata();
    let prim = attributes::primitive(metadata, mesh, primitive)?;

    let position_accessor = attributes::attribute_accessor(metadata, mesh, primitive, POSITION)?;
    let positions = attributes::read_positions_with(container, position_accessor, options)?;

    let triangle_count = if prim.mode == PRIMITIVE_MODE_TRIANGLES {
        let corners = match prim.indices {
            Some(indices) => attributes::read_indices(container, indices)?.len(),
            None => positions.len(),
        };
        Some(corners / 3)
    } else {
        None
    };

    let uv = match prim.attributes.get(TEXCOORD_0) {
        Some(&accessor) => {
            let uvs = attributes::read_texcoords_with(container, accessor, options)?;
            UvReport::from_texcoords(&uvs)
        }
        None => None,
    };

    Ok(PrimitiveReport {
        mesh,
        mesh_name: metadata.meshes.get(mesh).and_then(|m| m.name.clone()),
        primitive,
        mode: prim.mode,
        attributes: prim.attributes.keys().cloned().collect(),
        vertex_count: positions.len(),
        triangle_count,
        bounds: PositionBounds::of(&positions),
        uv,
    })
}

/// Report on every primitive of every mesh, in document order.
pub fn primitive_reports(container: &GlbContainer, options: &DecodeOptions) -> Vec<Result<PrimitiveReport>> {
    let metadata = container.metadata();
    metadata
        .meshes
        .iter()
        .enumerate()
        .flat_map(|(mesh, m)| (0..m.primitives.len()).map(move |primitive| (mesh, primitive)))
        .map(|(mesh, primitive)| primitive_report(container, mesh, primitive, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::read_container;
    use crate::test_support::GlbBuilder;
    use serde_json::json;
    use smallvec::smallvec;

    #[test]
    fn test_bounds_of_vectors() {
        let elements = vec![
            Element::Vector(smallvec![0.0, 2.0]),
            Element::Vector(smallvec![-1.0, 3.0]),
            Element::Vector(smallvec![4.0, 1.0]),
        ];
        let bounds = Bounds::of(&elements).unwrap();
        assert_eq!(bounds.min, [-1.0, 1.0]);
        assert_eq!(bounds.max, [4.0, 3.0]);
        assert!(Bounds::of(&[]).is_none());
    }

    #[test]
    fn test_bounds_of_scalars() {
        let elements = vec![Element::Scalar(3.0), Element::Scalar(0.0), Element::Scalar(2.0)];
        let bounds = Bounds::of(&elements).unwrap();
        assert_eq!(bounds.min, [0.0]);
        assert_eq!(bounds.max, [3.0]);
    }

    #[test]
    fn test_bounds_tolerance() {
        let a = Bounds { min: vec![0.1], max: vec![1000.0] };
        let b = Bounds { min: vec![0.100_000_001], max: vec![1000.001] };
        assert!(a.approx_eq(&b));
        let c = Bounds { min: vec![0.2], max: vec![1000.0] };
        assert!(!a.approx_eq(&c));
    }

    #[test]
    fn test_position_bounds() {
        assert_eq!(PositionBounds::of(&[]), None);

        let bounds = PositionBounds::of(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, 0.0, 3.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 3.0));
        assert_eq!(bounds.extent(), Vec3::new(2.0, 6.0, 2.5));
    }

    #[test]
    fn test_uv_report_unit_square() {
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let report = UvReport::from_texcoords(&uvs).unwrap();
        assert_eq!(report.count, 4);
        assert_eq!(report.min, Vec2::ZERO);
        assert_eq!(report.max, Vec2::ONE);
        assert!(report.in_unit_square());
        assert!(!report.spans_multiple_tiles);
    }

    #[test]
    fn test_uv_report_tiled() {
        let uvs = [Vec2::new(0.5, 0.5), Vec2::new(1.5, 0.25), Vec2::new(-0.25, 0.75)];
        let report = UvReport::from_texcoords(&uvs).unwrap();
        assert_eq!(report.outside_unit_square, 2);
        assert!(report.spans_multiple_tiles);
        assert!(UvReport::from_texcoords(&[]).is_none());
    }

    #[test]
    fn test_uv_report_single_offset_tile() {
        let uvs = [Vec2::new(1.25, 0.0), Vec2::new(1.75, 1.0)];
        let report = UvReport::from_texcoords(&uvs).unwrap();
        assert_eq!(report.outside_unit_square, 2);
        assert!(!report.spans_multiple_tiles);
    }

    fn quad() -> GlbContainer {
        let positions = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let bytes = GlbBuilder::new()
            .push_f32s(&positions)
            .push_f32s(&uvs)
            .push_u16s(&[0, 1, 2, 0, 2, 3])
            .view(0, 48, None)
            .view(48, 32, None)
            .view(80, 12, None)
            .accessor_json(json!({
                "bufferView": 0, "componentType": 5126, "type": "VEC3", "count": 4,
                "min": [0.0, 0.0, 0.0], "max": [2.0, 1.0, 0.0], "name": "positions"
            }))
            .accessor_json(json!({
                "bufferView": 1, "componentType": 5126, "type": "VEC2", "count": 4,
                "min": [0.0, 0.0], "max": [0.5, 1.0]
            }))
            .accessor(2, 5123, "SCALAR", 6)
            .accessor(2, 9999, "SCALAR", 6)
            .mesh_json(json!({
                "name": "Quad",
                "primitives": [
                    {"attributes": {"POSITION": 0, "TEXCOORD_0": 1}, "indices": 2},
                    {"attributes": {"POSITION": 0}, "mode": 1}
                ]
            }))
            .build();
        read_container(&bytes).unwrap()
    }

    #[test]
    fn test_summaries() {
        let container = quad();
        let summaries = summarize_accessors(&container, &DecodeOptions::default());
        assert_eq!(summaries.len(), 4);

        let positions = summaries[0].as_ref().unwrap();
        assert_eq!(positions.name.as_deref(), Some("positions"));
        assert_eq!(positions.component_name(), "FLOAT");
        assert_eq!(positions.accessor_type, AccessorType::Vec3);
        assert_eq!(positions.stride, 12);
        assert_eq!(positions.declared_matches(), Some(true));

        let uvs = summaries[1].as_ref().unwrap();
        assert_eq!(uvs.declared_matches(), Some(false));

        let indices = summaries[2].as_ref().unwrap();
        assert_eq!(indices.declared_matches(), None);
        assert_eq!(indices.computed.as_ref().unwrap().max, [3.0]);

        assert!(matches!(
            summaries[3],
            Err(GlbError::UnsupportedComponentType { accessor: 3, .. })
        ));
    }

    #[test]
    fn test_lenient_summary() {
        let container = quad();
        let summary = summarize_accessor(&container, 3, &DecodeOptions::new().lenient()).unwrap();
        assert_eq!(summary.component_name(), "9999");
        assert_eq!(summary.stride, 0);
        assert_eq!(summary.computed.unwrap().max, [0.0]);
    }

    #[test]
    fn test_primitive_reports() {
        let container = quad();
        let reports = primitive_reports(&container, &DecodeOptions::default());
        assert_eq!(reports.len(), 2);

        let tri = reports[0].as_ref().unwrap();
        assert_eq!(tri.mesh_name.as_deref(), Some("Quad"));
        assert_eq!(tri.attributes, ["POSITION", "TEXCOORD_0"]);
        assert_eq!(tri.vertex_count, 4);
        assert_eq!(tri.triangle_count, Some(2));
        assert_eq!(tri.bounds.unwrap().extent(), Vec3::new(2.0, 1.0, 0.0));
        assert!(tri.uv.as_ref().unwrap().in_unit_square());

        let lines = reports[1].as_ref().unwrap();
        assert_eq!(lines.mode, 1);
        assert_eq!(lines.triangle_count, None);
        assert!(lines.uv.is_none());
    }

    #[test]
    fn test_primitive_without_positions() {
        let bytes = GlbBuilder::new()
            .mesh_json(json!({"primitives": [{"attributes": {}}]}))
            .build();
        let container = read_container(&bytes).unwrap();
        let reports = primitive_reports(&container, &DecodeOptions::default());
        assert!(matches!(reports[0], Err(GlbError::AttributeNotFound { .. })));
    }
}
