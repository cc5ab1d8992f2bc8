//! GLB container reader.
//!
//! A GLB file is a 12-byte header followed by a JSON chunk and an optional
//! binary chunk. All integers are little-endian.
//!
//! ```text
//! +-------+---------+--------+   +--------+------+-----------+   +--------+------+-----------+
//! | magic | version | length |   | length | JSON | payload.. |   | length | BIN  | payload.. |
//! +-------+---------+--------+   +--------+------+-----------+   +--------+------+-----------+
//! ```

use crate::error::{GlbError, Result};
use crate::schema::Gltf;
use tracing::{debug, warn};

/// GLB magic number.
pub const GLB_MAGIC: u32 = 0x46546C67; // "glTF" in little-endian
/// GLB version 2.
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type.
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F534A; // "JSON" in little-endian
/// Binary chunk type.
pub const CHUNK_TYPE_BIN: u32 = 0x004E4942; // "BIN\0" in little-endian
/// Size of the file header.
pub const HEADER_SIZE: usize = 12;
/// Size of a chunk header (length + type).
pub const CHUNK_HEADER_SIZE: usize = 8;

/// A parsed GLB file.
///
/// Built once by [`read_container`] and never modified afterwards.
#[derive(Debug, Clone)]
pub struct GlbContainer {
    version: u32,
    declared_length: u32,
    json_chunk_length: usize,
    metadata: Gltf,
    binary: Option<Vec<u8>>,
}

impl GlbContainer {
    /// Format version from the header (always 2).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Total file length declared in the header.
    pub fn declared_length(&self) -> u32 {
        self.declared_length
    }

    /// Length of the JSON chunk payload in bytes.
    pub fn json_chunk_length(&self) -> usize {
        self.json_chunk_length
    }

    /// The glTF document from the JSON chunk.
    pub fn metadata(&self) -> &Gltf {
        &self.metadata
    }

    /// Whether the file carried a binary chunk.
    pub fn has_binary_chunk(&self) -> bool {
        self.binary.is_some()
    }

    /// Raw bytes of the binary chunk (empty if there was none).
    pub fn binary_buffer(&self) -> &[u8] {
        self.binary.as_deref().unwrap_or(&[])
    }
}

/// Check for the GLB magic number without parsing anything else.
pub fn is_glb(data: &[u8]) -> bool {
    data.len() >= 4 && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == GLB_MAGIC
}

/// Parse a complete GLB file.
///
/// Fails with [`GlbError::MalformedContainer`] when the framing is wrong or
/// truncated and with [`GlbError::InvalidMetadata`] when the JSON chunk does not
/// parse.
pub fn read_container(data: &[u8]) -> Result<GlbContainer> {
    let mut cursor = Cursor::new(data);

    let magic = cursor.read_u32("header magic")?;
    let version = cursor.read_u32("header version")?;
    let declared_length = cursor.read_u32("header length")?;

    if magic != GLB_MAGIC {
        return Err(GlbError::malformed(
            format!("bad magic 0x{magic:08X} (expected 0x{GLB_MAGIC:08X})"),
            0,
        ));
    }
    if version != GLB_VERSION {
        return Err(GlbError::UnsupportedVersion(version));
    }
    if declared_length as usize != data.len() {
        warn!(
            declared = declared_length,
            actual = data.len(),
            "GLB header length does not match input length"
        );
    }
    debug!(version, declared_length, "read GLB header");

    let (json_type, json) = cursor
        .read_chunk()?
        .ok_or_else(|| GlbError::malformed("missing JSON chunk", HEADER_SIZE))?;
    if json_type != CHUNK_TYPE_JSON {
        return Err(GlbError::malformed(
            format!("first chunk has type 0x{json_type:08X} (expected JSON)"),
            HEADER_SIZE,
        ));
    }
    debug!(length = json.len(), "read JSON chunk");

    let metadata: Gltf = serde_json::from_slice(json)?;

    let mut binary = None;
    let mut first = true;
    while let Some((chunk_type, payload)) = cursor.read_chunk()? {
        if first && chunk_type == CHUNK_TYPE_BIN {
            debug!(length = payload.len(), "read BIN chunk");
            binary = Some(payload.to_vec());
        } else {
            debug!(chunk_type, length = payload.len(), "skipping chunk");
        }
        first = false;
    }

    Ok(GlbContainer {
        version,
        declared_length,
        json_chunk_length: json.len(),
        metadata,
        binary,
    })
}

/// Forward-only reader over the input bytes.
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(GlbError::malformed(
                format!(
                    "{what} needs {len} bytes but only {} remain",
                    self.remaining()
                ),
                self.offset,
            ));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read the next chunk, or `None` at a clean end of input.
    fn read_chunk(&mut self) -> Result<Option<(u32, &'a [u8])>> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        let length = self.read_u32("chunk length")? as usize;
        let chunk_type = self.read_u32("chunk type")?;
        let payload = self.take(length, "chunk payload")?;
        Ok(Some((chunk_type, payload)))
    }
}
