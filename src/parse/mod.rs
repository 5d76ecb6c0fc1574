//! reading and parsing vtk files
//!
//! Both the legacy format (`.vtk`, ascii or big-endian binary) and the xml formats for
//! structured grids (`.vts`, `.vtr`) are understood. The format is picked from the first
//! bytes of the file, not from the extension.
//!
//! most of the time you will not need to interact with this module directly, use
//! [`load_mesh`](crate::load_mesh) with a [`VtkReader`] instead

mod error;
mod event_summary;
mod legacy;
mod scalar_type;
mod xml;

pub use error::{Legacy, ParseError, Xml};
pub use scalar_type::{ByteOrder, ScalarType};

use crate::prelude::*;

use std::path::Path;

use quick_xml::reader::Reader;
use tracing::{debug, info};

/// The on-disk flavour of a vtk file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileFormat {
    #[display(fmt = "legacy")]
    Legacy,
    #[display(fmt = "xml")]
    Xml,
}

impl FileFormat {
    /// sniff the format from the leading bytes of a file
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let bytes = strip_leading(bytes);

        if legacy::is_legacy(bytes) {
            Some(Self::Legacy)
        } else if bytes.starts_with(b"<") {
            Some(Self::Xml)
        } else {
            None
        }
    }
}

/// drop a UTF8 byte order mark and leading whitespace
fn strip_leading(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// read in and parse an entire vtk file for a given path
pub fn read_and_parse(path: &Path) -> Result<StructuredMesh, ParseError> {
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read vtk file");

    parse_bytes(&bytes)
}

/// parse a vtk file that has already been read into memory
pub fn parse_bytes(bytes: &[u8]) -> Result<StructuredMesh, ParseError> {
    let format = FileFormat::detect(bytes).ok_or(ParseError::UnknownFormat)?;
    let bytes = strip_leading(bytes);

    let mesh = match format {
        FileFormat::Legacy => legacy::parse_legacy_document(bytes)?,
        FileFormat::Xml => xml::parse_xml_document(Reader::from_reader(bytes))?,
    };

    info!(
        %format,
        kind = %mesh.kind(),
        dimensions = %mesh.dimensions(),
        arrays = mesh.point_data().len(),
        "parsed vtk mesh"
    );

    Ok(mesh)
}

/// [`MeshReader`] for files on disk in any of the supported vtk formats
#[derive(Debug, Clone, Copy, Default)]
pub struct VtkReader;

impl MeshReader for VtkReader {
    fn read_mesh(&self, path: &Path) -> Result<StructuredMesh, Error> {
        Ok(read_and_parse(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats() {
        assert_eq!(
            FileFormat::detect(b"# vtk DataFile Version 3.0\n"),
            Some(FileFormat::Legacy)
        );
        assert_eq!(
            FileFormat::detect(b"\xEF\xBB\xBF  <?xml version=\"1.0\"?>"),
            Some(FileFormat::Xml)
        );
        assert_eq!(FileFormat::detect(b"solid cube\n"), None);
        assert_eq!(FileFormat::detect(b""), None);
    }

    #[test]
    fn unknown_format() {
        let err = parse_bytes(b"ply\nformat ascii 1.0\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat));
    }

    #[test]
    fn same_mesh_from_both_formats() {
        let legacy = b"# vtk DataFile Version 3.0
two points
ASCII
DATASET STRUCTURED_GRID
DIMENSIONS 2 1 1
POINTS 2 float
0 0 0 1 0 0
POINT_DATA 2
SCALARS Pressure float 1
LOOKUP_TABLE default
3 4
";

        let xml = br#"<?xml version="1.0"?>
<VTKFile type="StructuredGrid" version="1.0" byte_order="LittleEndian" header_type="UInt32">
  <StructuredGrid WholeExtent="0 1 0 0 0 0">
    <Piece Extent="0 1 0 0 0 0">
      <PointData>
        <DataArray type="Float32" Name="Pressure" format="ascii">3 4</DataArray>
      </PointData>
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="ascii">0 0 0 1 0 0</DataArray>
      </Points>
    </Piece>
  </StructuredGrid>
</VTKFile>
"#;

        let from_legacy = parse_bytes(legacy).unwrap();
        let from_xml = parse_bytes(xml).unwrap();

        assert_eq!(from_legacy.dimensions(), from_xml.dimensions());
        assert_eq!(from_legacy.points(), from_xml.points());
        assert_eq!(from_legacy.point_data(), from_xml.point_data());
    }
}
