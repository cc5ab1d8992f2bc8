//! Subcommand implementations.

use std::io::Write;

use anyhow::{bail, Context, Result};
use glb_io::analysis::{self, AccessorSummary, PositionBounds, PrimitiveReport};
use glb_io::{DecodeOptions, Element, GlbContainer};
use serde_json::json;

/// Print header, chunk and document counts.
pub fn info(container: &GlbContainer, file_length: usize, out: &mut dyn Write) -> Result<()> {
    let metadata = container.metadata();

    writeln!(out, "glTF binary version {}", container.version())?;
    writeln!(
        out,
        "length: {} bytes declared, {} bytes read",
        container.declared_length(),
        file_length
    )?;
    writeln!(out, "JSON chunk: {} bytes", container.json_chunk_length())?;
    if container.has_binary_chunk() {
        writeln!(out, "BIN chunk: {} bytes", container.binary_buffer().len())?;
    } else {
        writeln!(out, "BIN chunk: none")?;
    }
    writeln!(out, "asset version: {}", metadata.asset.version)?;
    if let Some(generator) = &metadata.asset.generator {
        writeln!(out, "generator: {generator}")?;
    }
    writeln!(out, "meshes: {}", metadata.meshes.len())?;
    writeln!(out, "accessors: {}", metadata.accessors.len())?;
    writeln!(out, "buffer views: {}", metadata.buffer_views.len())?;
    if !metadata.extensions_used.is_empty() {
        writeln!(out, "extensions: {}", metadata.extensions_used.join(", "))?;
    }
    Ok(())
}

/// List every accessor with its value range.
///
/// All accessors are listed even when some fail; the command fails afterwards
/// if any did.
pub fn accessors(
    container: &GlbContainer,
    options: &DecodeOptions,
    as_json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let summaries = analysis::summarize_accessors(container, options);
    let failures = summaries.iter().filter(|s| s.is_err()).count();

    if as_json {
        let entries: Vec<serde_json::Value> = summaries
            .iter()
            .enumerate()
            .map(|(index, summary)| match summary {
                Ok(summary) => serde_json::to_value(summary),
                Err(err) => Ok(json!({"index": index, "error": err.to_string()})),
            })
            .collect::<serde_json::Result<_>>()?;
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        for (index, summary) in summaries.iter().enumerate() {
            match summary {
                Ok(summary) => write_summary(summary, out)?,
                Err(err) => writeln!(out, "#{index:<3} error: {err}")?,
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} accessors failed to decode", summaries.len());
    }
    Ok(())
}

fn write_summary(summary: &AccessorSummary, out: &mut dyn Write) -> Result<()> {
    write!(
        out,
        "#{:<3} {} {} count={} view={} stride={}",
        summary.index,
        summary.component_name(),
        summary.accessor_type,
        summary.count,
        summary.buffer_view,
        summary.stride
    )?;
    if summary.normalized {
        write!(out, " normalized")?;
    }
    if let Some(bounds) = &summary.computed {
        write!(out, " min={} max={}", format_values(&bounds.min), format_values(&bounds.max))?;
    }
    if let Some(name) = &summary.name {
        write!(out, " {name:?}")?;
    }
    if summary.declared_matches() == Some(false) {
        write!(out, " (declared bounds differ)")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print the decoded elements of one accessor.
pub fn dump(
    container: &GlbContainer,
    index: usize,
    options: &DecodeOptions,
    as_json: bool,
    limit: Option<usize>,
    out: &mut dyn Write,
) -> Result<()> {
    let elements = container
        .decode_accessor_with(index, options)
        .with_context(|| format!("failed to decode accessor {index}"))?;
    let shown = &elements[..limit.map_or(elements.len(), |n| n.min(elements.len()))];

    if as_json {
        serde_json::to_writer(&mut *out, shown)?;
        writeln!(out)?;
    } else {
        for (i, element) in shown.iter().enumerate() {
            writeln!(out, "{i}: {}", format_element(element))?;
        }
        if shown.len() < elements.len() {
            writeln!(out, "... {} more", elements.len() - shown.len())?;
        }
    }
    Ok(())
}

/// Print geometry and UV coverage for every mesh primitive.
pub fn uv(
    container: &GlbContainer,
    options: &DecodeOptions,
    as_json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let reports = analysis::primitive_reports(container, options);
    let failures = reports.iter().filter(|r| r.is_err()).count();

    if as_json {
        let entries: Vec<serde_json::Value> = reports
            .iter()
            .map(|report| match report {
                Ok(report) => serde_json::to_value(report),
                Err(err) => Ok(json!({"error": err.to_string()})),
            })
            .collect::<serde_json::Result<_>>()?;
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        if reports.is_empty() {
            writeln!(out, "no meshes")?;
        }
        for report in &reports {
            match report {
                Ok(report) => write_primitive(report, out)?,
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} primitives could not be analysed", reports.len());
    }
    Ok(())
}

fn write_primitive(report: &PrimitiveReport, out: &mut dyn Write) -> Result<()> {
    write!(out, "mesh {}", report.mesh)?;
    if let Some(name) = &report.mesh_name {
        write!(out, " {name:?}")?;
    }
    write!(out, " primitive {}: {} vertices", report.primitive, report.vertex_count)?;
    if let Some(triangles) = report.triangle_count {
        write!(out, ", {triangles} triangles")?;
    }
    match report.bounds {
        Some(PositionBounds { min, max }) => writeln!(
            out,
            ", bounds ({}, {}, {})..({}, {}, {})",
            min.x, min.y, min.z, max.x, max.y, max.z
        )?,
        None => writeln!(out)?,
    }
    writeln!(out, "  attributes: {}", report.attributes.join(", "))?;

    match &report.uv {
        Some(uv) => {
            writeln!(
                out,
                "  TEXCOORD_0: {} coords, u {}..{}, v {}..{}, {} outside [0,1]",
                uv.count, uv.min.x, uv.max.x, uv.min.y, uv.max.y, uv.outside_unit_square
            )?;
            if uv.spans_multiple_tiles {
                writeln!(out, "  TEXCOORD_0 spans more than one UV tile")?;
            }
        }
        None => writeln!(out, "  TEXCOORD_0: none")?,
    }
    Ok(())
}

fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn format_element(element: &Element) -> String {
    match element {
        Element::Scalar(value) => value.to_string(),
        Element::Vector(values) => {
            let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}
