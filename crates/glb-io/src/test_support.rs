//! Synthetic GLB files for unit tests.

use crate::container::{CHUNK_TYPE_BIN, CHUNK_TYPE_JSON, GLB_MAGIC, GLB_VERSION};
use serde_json::{json, Value};

/// Assembles a GLB file from binary data and hand-written JSON entries.
pub(crate) struct GlbBuilder {
    document: Value,
    raw_json: Option<Vec<u8>>,
    binary: Option<Vec<u8>>,
}

impl GlbBuilder {
    pub(crate) fn new() -> Self {
        Self {
            document: json!({
                "asset": {"version": "2.0", "generator": "glb-io tests"},
                "accessors": [],
                "bufferViews": [],
                "meshes": [],
            }),
            raw_json: None,
            binary: None,
        }
    }

    /// Replace the JSON chunk with arbitrary bytes.
    pub(crate) fn raw_json(mut self, bytes: &[u8]) -> Self {
        self.raw_json = Some(bytes.to_vec());
        self
    }

    pub(crate) fn push_bytes(mut self, bytes: &[u8]) -> Self {
        self.binary.get_or_insert_with(Vec::new).extend_from_slice(bytes);
        self
    }

    pub(crate) fn push_f32s(self, values: &[f32]) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_bytes(&bytes)
    }

    pub(crate) fn push_u16s(self, values: &[u16]) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_bytes(&bytes)
    }

    /// Add a buffer view over buffer 0.
    pub(crate) fn view(mut self, byte_offset: usize, byte_length: usize, byte_stride: Option<usize>) -> Self {
        let mut view = json!({"buffer": 0, "byteOffset": byte_offset, "byteLength": byte_length});
        if let Some(stride) = byte_stride {
            view["byteStride"] = json!(stride);
        }
        self.push_entry("bufferViews", view);
        self
    }

    /// Add an accessor with no accessor-level byte offset.
    pub(crate) fn accessor(self, buffer_view: usize, component_type: u32, accessor_type: &str, count: usize) -> Self {
        self.accessor_json(json!({
            "bufferView": buffer_view,
            "componentType": component_type,
            "type": accessor_type,
            "count": count,
        }))
    }

    pub(crate) fn accessor_json(mut self, accessor: Value) -> Self {
        self.push_entry("accessors", accessor);
        self
    }

    pub(crate) fn mesh_json(mut self, mesh: Value) -> Self {
        self.push_entry("meshes", mesh);
        self
    }

    fn push_entry(&mut self, key: &str, entry: Value) {
        if let Some(list) = self.document[key].as_array_mut() {
            list.push(entry);
        }
    }

    pub(crate) fn build(mut self) -> Vec<u8> {
        if let Some(bin) = &self.binary {
            self.document["buffers"] = json!([{"byteLength": bin.len()}]);
        }

        let mut json_bytes = match self.raw_json.take() {
            Some(raw) => raw,
            None => serde_json::to_vec(&self.document).unwrap(),
        };
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }

        let bin_bytes = self.binary.map(|mut bin| {
            while bin.len() % 4 != 0 {
                bin.push(0);
            }
            bin
        });

        let mut total = 12 + 8 + json_bytes.len();
        if let Some(bin) = &bin_bytes {
            total += 8 + bin.len();
        }

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&GLB_VERSION.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
        out.extend_from_slice(&json_bytes);
        if let Some(bin) = bin_bytes {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
            out.extend_from_slice(&bin);
        }
        out
    }
}
