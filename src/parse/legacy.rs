//! Reader for legacy vtk files (`# vtk DataFile Version x.y`)
//!
//! Headers are line based text. Array data is either whitespace separated ascii or, for
//! `BINARY` files, big-endian values starting on the line after the array's header.

use super::error;
use super::scalar_type::{ByteOrder, ScalarType};
use crate::mesh::{DatasetKind, PointArray};
use crate::prelude::*;

use tracing::{debug, trace, warn};

const MAGIC: &[u8] = b"# vtk DataFile";

/// true if the bytes look like the start of a legacy vtk file
pub(crate) fn is_legacy(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dataset,
    Point,
    Cell,
}

/// Position in a legacy file, handing out header tokens, header lines and data blocks
struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.bytes.get(self.position) {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.position += 1;
        }
    }

    /// next whitespace delimited token, `None` at the end of the file
    fn next_token(&mut self) -> Option<String> {
        self.skip_whitespace();

        let start = self.position;
        while let Some(byte) = self.bytes.get(self.position) {
            if byte.is_ascii_whitespace() {
                break;
            }
            self.position += 1;
        }

        if start == self.position {
            None
        } else {
            Some(String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned())
        }
    }

    fn expect_token(&mut self, expected: &str) -> Result<String, error::Legacy> {
        self.next_token()
            .ok_or_else(|| error::UnexpectedEof::new(expected.into()).into())
    }

    /// the rest of the current line, consuming the line ending
    fn read_line(&mut self) -> Option<String> {
        if self.position >= self.bytes.len() {
            return None;
        }

        let start = self.position;
        while let Some(byte) = self.bytes.get(self.position) {
            self.position += 1;
            if *byte == b'\n' {
                break;
            }
        }

        let line = String::from_utf8_lossy(&self.bytes[start..self.position]);
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// the remaining tokens on the current line
    fn line_tokens(&mut self) -> Vec<String> {
        self.read_line()
            .map(|line| line.split_ascii_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    /// consume a line starting with `keyword` if it is the next thing in the file,
    /// otherwise leave the position untouched
    fn try_keyword_line(&mut self, keyword: &str) -> Option<Vec<String>> {
        let saved = self.position;

        match self.next_token() {
            Some(token) if token.eq_ignore_ascii_case(keyword) => Some(self.line_tokens()),
            _ => {
                self.position = saved;
                None
            }
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    fn read_bytes(&mut self, length: usize, context: &str) -> Result<&'a [u8], error::Legacy> {
        let end = self.position.saturating_add(length);
        let available = self.remaining();

        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or_else(|| error::TruncatedBinary::new(context.into(), length, available))?;

        self.position = end;
        Ok(slice)
    }
}

/// what the reader knows about the geometry before the attribute sections
#[derive(Default)]
struct Geometry {
    dimensions: Option<Dimensions>,
    points: Option<Vec<f64>>,
    coordinates: [Option<Vec<f64>>; 3],
    origin: Option<[f64; 3]>,
    spacing: Option<[f64; 3]>,
}

struct LegacyParser<'a> {
    cursor: Cursor<'a>,
    encoding: Encoding,
}

/// parse a full legacy vtk file that has been read into memory
pub(crate) fn parse_legacy_document(bytes: &[u8]) -> Result<StructuredMesh, error::Legacy> {
    let mut cursor = Cursor::new(bytes);

    let version = cursor
        .read_line()
        .ok_or_else(|| error::UnexpectedEof::new("`# vtk DataFile` header".into()))?;
    if !version.as_bytes().starts_with(MAGIC) {
        return Err(error::UnexpectedKeyword::new("# vtk DataFile".into(), version).into());
    }

    let title = cursor.read_line().unwrap_or_default();
    debug!(%version, %title, "read legacy vtk header");

    let encoding = match cursor.expect_token("ASCII or BINARY")?.to_ascii_uppercase().as_str() {
        "ASCII" => Encoding::Ascii,
        "BINARY" => Encoding::Binary,
        other => {
            let expected = "ASCII or BINARY".into();
            return Err(error::UnexpectedKeyword::new(expected, other.into()).into());
        }
    };

    let dataset = cursor.expect_token("DATASET")?;
    if !dataset.eq_ignore_ascii_case("DATASET") {
        return Err(error::UnexpectedKeyword::new("DATASET".into(), dataset).into());
    }

    let kind = match cursor.expect_token("dataset type")?.to_ascii_uppercase().as_str() {
        "STRUCTURED_GRID" => DatasetKind::StructuredGrid,
        "RECTILINEAR_GRID" => DatasetKind::RectilinearGrid,
        "STRUCTURED_POINTS" => DatasetKind::StructuredPoints,
        other => {
            let feature = format!("{other} datasets (only structured grids)");
            return Err(error::Unsupported::new(feature).into());
        }
    };

    // drop the remainder of the DATASET line
    cursor.line_tokens();

    let mut parser = LegacyParser { cursor, encoding };
    parser.parse_body(kind)
}

impl<'a> LegacyParser<'a> {
    fn parse_body(&mut self, kind: DatasetKind) -> Result<StructuredMesh, error::Legacy> {
        let mut geometry = Geometry::default();
        let mut section = Section::Dataset;
        let mut section_size = 0;
        let mut point_data = Vec::new();

        while let Some(keyword) = self.cursor.next_token() {
            let keyword = keyword.to_ascii_uppercase();
            trace!(%keyword, ?section, "legacy keyword");

            match keyword.as_str() {
                "DIMENSIONS" => {
                    let tokens = self.cursor.line_tokens();
                    let dims = parse_numbers::<usize>(&tokens, 3, "DIMENSIONS")?;
                    let dims = Dimensions::new(dims[0], dims[1], dims[2]);
                    if dims.checked_num_points().is_none() {
                        let what = format!("a grid with dimensions {dims}");
                        return Err(error::TooLarge::new(what).into());
                    }
                    geometry.dimensions = Some(dims);
                }
                "POINTS" => {
                    let (count, scalar_type) = self.count_and_type("POINTS")?;
                    let length = value_count(count, 3, "POINTS")?;
                    geometry.points = Some(self.read_values(length, scalar_type, "POINTS")?);
                }
                "X_COORDINATES" | "Y_COORDINATES" | "Z_COORDINATES" => {
                    let (count, scalar_type) = self.count_and_type(&keyword)?;
                    let values = self.read_values(count, scalar_type, &keyword)?;
                    let axis = match keyword.as_bytes()[0] {
                        b'X' => 0,
                        b'Y' => 1,
                        _ => 2,
                    };
                    geometry.coordinates[axis] = Some(values);
                }
                "ORIGIN" => {
                    let tokens = self.cursor.line_tokens();
                    let origin = parse_numbers::<f64>(&tokens, 3, "ORIGIN")?;
                    geometry.origin = Some([origin[0], origin[1], origin[2]]);
                }
                "SPACING" | "ASPECT_RATIO" => {
                    let tokens = self.cursor.line_tokens();
                    let spacing = parse_numbers::<f64>(&tokens, 3, &keyword)?;
                    geometry.spacing = Some([spacing[0], spacing[1], spacing[2]]);
                }
                "METADATA" => self.skip_metadata(),
                "POINT_DATA" | "CELL_DATA" => {
                    let tokens = self.cursor.line_tokens();
                    section_size = parse_numbers::<usize>(&tokens, 1, &keyword)?[0];
                    section = if keyword == "POINT_DATA" {
                        Section::Point
                    } else {
                        Section::Cell
                    };
                }
                "FIELD" => {
                    let arrays = self.read_field()?;
                    if section == Section::Point {
                        point_data.extend(arrays);
                    }
                }
                "SCALARS" | "VECTORS" | "NORMALS" | "TENSORS" | "TENSORS6"
                | "TEXTURE_COORDINATES" | "COLOR_SCALARS" => {
                    let array = self.read_attribute(&keyword, section_size)?;
                    if section == Section::Point {
                        point_data.push(array);
                    }
                }
                "LOOKUP_TABLE" => self.skip_lookup_table()?,
                _ => {
                    return Err(error::UnexpectedKeyword::new(
                        "a dataset or attribute keyword".into(),
                        keyword,
                    )
                    .into())
                }
            }
        }

        let mut mesh = assemble_mesh(kind, geometry)?;

        if mesh.dimensions().num_points() != mesh.num_points() {
            warn!(
                dimensions = %mesh.dimensions(),
                points = mesh.num_points(),
                "point count does not match the grid dimensions"
            );
        }

        for array in point_data {
            mesh.insert_point_array(array);
        }

        Ok(mesh)
    }

    /// `<count> <data type>` following keywords such as `POINTS`
    fn count_and_type(&mut self, keyword: &str) -> Result<(usize, ScalarType), error::Legacy> {
        let tokens = self.cursor.line_tokens();
        let count = parse_numbers::<usize>(&tokens, 1, keyword)?[0];
        let type_name = tokens
            .get(1)
            .ok_or_else(|| error::UnexpectedEof::new(format!("data type of {keyword}")))?;

        Ok((count, ScalarType::from_legacy_name(type_name)?))
    }

    fn read_values(
        &mut self,
        count: usize,
        scalar_type: ScalarType,
        context: &str,
    ) -> Result<Vec<f64>, error::Legacy> {
        match self.encoding {
            Encoding::Ascii => {
                // every ascii value takes at least one byte and a separator
                let mut values = Vec::with_capacity(count.min(self.cursor.remaining() / 2 + 1));
                for _ in 0..count {
                    let token = self
                        .cursor
                        .next_token()
                        .ok_or_else(|| error::UnexpectedEof::new(format!("values of {context}")))?;
                    let value = token
                        .parse::<f64>()
                        .map_err(|_| error::InvalidNumber::new(token, context.into()))?;
                    values.push(value);
                }
                Ok(values)
            }
            Encoding::Binary => {
                let length = value_count(count, scalar_type.size(), context)?;
                let bytes = self.cursor.read_bytes(length, context)?;
                Ok(scalar_type.decode(bytes, ByteOrder::BigEndian))
            }
        }
    }

    fn read_attribute(&mut self, keyword: &str, size: usize) -> Result<PointArray, error::Legacy> {
        let tokens = self.cursor.line_tokens();
        let name = tokens
            .first()
            .map(|name| decode_name(name))
            .ok_or_else(|| error::UnexpectedEof::new(format!("name of {keyword}")))?;

        let type_at = |idx: usize| -> Result<ScalarType, error::Legacy> {
            let type_name = tokens
                .get(idx)
                .ok_or_else(|| error::UnexpectedEof::new(format!("data type of {keyword}")))?;
            Ok(ScalarType::from_legacy_name(type_name)?)
        };

        let (components, values) = match keyword {
            "SCALARS" => {
                let scalar_type = type_at(1)?;
                let components = match tokens.get(2) {
                    Some(count) => parse_count(count, keyword)?,
                    None => 1,
                };
                self.cursor.try_keyword_line("LOOKUP_TABLE");
                let length = value_count(size, components, &name)?;
                (components, self.read_values(length, scalar_type, &name)?)
            }
            "VECTORS" | "NORMALS" => {
                let length = value_count(size, 3, &name)?;
                (3, self.read_values(length, type_at(1)?, &name)?)
            }
            "TENSORS" => {
                let length = value_count(size, 9, &name)?;
                (9, self.read_values(length, type_at(1)?, &name)?)
            }
            "TENSORS6" => {
                let length = value_count(size, 6, &name)?;
                (6, self.read_values(length, type_at(1)?, &name)?)
            }
            "TEXTURE_COORDINATES" => {
                let dim = tokens.get(1).ok_or_else(|| {
                    error::UnexpectedEof::new("TEXTURE_COORDINATES dimension".into())
                })?;
                let components = parse_count(dim, keyword)?;
                let length = value_count(size, components, &name)?;
                (components, self.read_values(length, type_at(2)?, &name)?)
            }
            // COLOR_SCALARS
            _ => {
                let count = tokens
                    .get(1)
                    .ok_or_else(|| error::UnexpectedEof::new("COLOR_SCALARS value count".into()))?;
                let components = parse_count(count, keyword)?;
                let length = value_count(size, components, &name)?;
                let values = match self.encoding {
                    Encoding::Ascii => self.read_values(length, ScalarType::Float32, &name)?,
                    // binary colors are stored as unsigned chars scaled to [0, 1]
                    Encoding::Binary => self
                        .read_values(length, ScalarType::UInt8, &name)?
                        .into_iter()
                        .map(|value| value / 255.0)
                        .collect(),
                };
                (components, values)
            }
        };

        trace!(%name, components, "read legacy attribute");
        Ok(PointArray::new(name, components, values))
    }

    /// `FIELD <name> <number of arrays>` followed by one
    /// `<array name> <components> <tuples> <type>` block per array
    fn read_field(&mut self) -> Result<Vec<PointArray>, error::Legacy> {
        let tokens = self.cursor.line_tokens();
        let num_arrays = tokens
            .get(1)
            .ok_or_else(|| error::UnexpectedEof::new("FIELD array count".into()))?;
        let num_arrays = parse_count(num_arrays, "FIELD")?;

        let mut arrays = Vec::with_capacity(num_arrays.min(self.cursor.remaining()));

        for _ in 0..num_arrays {
            let name = self.cursor.expect_token("FIELD array name")?;
            if name == "NULL_ARRAY" {
                continue;
            }

            let tokens = self.cursor.line_tokens();
            let counts = parse_numbers::<usize>(&tokens, 2, &name)?;
            let type_name = tokens
                .get(2)
                .ok_or_else(|| error::UnexpectedEof::new(format!("data type of {name}")))?;
            let scalar_type = ScalarType::from_legacy_name(type_name)?;

            let name = decode_name(&name);
            let length = value_count(counts[0], counts[1], &name)?;
            let values = self.read_values(length, scalar_type, &name)?;
            arrays.push(PointArray::new(name, counts[0], values));
        }

        Ok(arrays)
    }

    /// a standalone `LOOKUP_TABLE <name> <size>` section of rgba values
    fn skip_lookup_table(&mut self) -> Result<(), error::Legacy> {
        let tokens = self.cursor.line_tokens();
        let size = tokens
            .get(1)
            .ok_or_else(|| error::UnexpectedEof::new("LOOKUP_TABLE size".into()))?;
        let size = parse_count(size, "LOOKUP_TABLE")?;

        let scalar_type = match self.encoding {
            Encoding::Ascii => ScalarType::Float32,
            Encoding::Binary => ScalarType::UInt8,
        };
        let length = value_count(size, 4, "LOOKUP_TABLE")?;
        self.read_values(length, scalar_type, "LOOKUP_TABLE")?;

        Ok(())
    }

    /// `METADATA` blocks run until the next blank line
    fn skip_metadata(&mut self) {
        // rest of the METADATA line
        self.cursor.read_line();

        while let Some(line) = self.cursor.read_line() {
            if line.trim().is_empty() {
                break;
            }
        }
    }
}

fn assemble_mesh(kind: DatasetKind, geometry: Geometry) -> Result<StructuredMesh, error::Legacy> {
    let dimensions = geometry
        .dimensions
        .ok_or_else(|| error::UnexpectedEof::new("DIMENSIONS".into()))?;

    let mesh = match kind {
        DatasetKind::StructuredGrid => {
            let points = geometry
                .points
                .ok_or_else(|| error::UnexpectedEof::new("POINTS".into()))?;
            Some(StructuredMesh::from_flat_points(kind, dimensions, points))
        }
        DatasetKind::RectilinearGrid => {
            let [x, y, z] = geometry.coordinates;
            let missing = |axis: &str| error::UnexpectedEof::new(format!("{axis}_COORDINATES"));
            let x = x.ok_or_else(|| missing("X"))?;
            let y = y.ok_or_else(|| missing("Y"))?;
            let z = z.ok_or_else(|| missing("Z"))?;
            StructuredMesh::try_from_axis_locations(kind, &x, &y, &z)
        }
        DatasetKind::StructuredPoints => {
            let origin = geometry.origin.unwrap_or([0.0; 3]);
            let spacing = geometry.spacing.unwrap_or([1.0; 3]);
            let axis = |idx: usize, len: usize| -> Result<Vec<f64>, error::Legacy> {
                let mut locations = Vec::new();
                locations
                    .try_reserve_exact(len)
                    .map_err(|_| error::TooLarge::new(format!("an axis of {len} points")))?;
                locations.extend((0..len).map(|i| origin[idx] + i as f64 * spacing[idx]));
                Ok(locations)
            };
            StructuredMesh::try_from_axis_locations(
                kind,
                &axis(0, dimensions.n1)?,
                &axis(1, dimensions.n2)?,
                &axis(2, dimensions.n3)?,
            )
        }
    };

    mesh.ok_or_else(|| {
        error::TooLarge::new(format!("a {kind} with dimensions {dimensions}")).into()
    })
}

fn parse_numbers<T: std::str::FromStr>(
    tokens: &[String],
    expected: usize,
    context: &str,
) -> Result<Vec<T>, error::Legacy> {
    if tokens.len() < expected {
        return Err(error::UnexpectedEof::new(format!("{expected} values after {context}")).into());
    }

    tokens[0..expected]
        .iter()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| error::InvalidNumber::new(token.clone(), context.into()).into())
        })
        .collect()
}

/// `count` tuples of `per` values, refusing totals that do not fit in a `usize`
fn value_count(count: usize, per: usize, context: &str) -> Result<usize, error::Legacy> {
    count
        .checked_mul(per)
        .ok_or_else(|| error::TooLarge::new(format!("{count} x {per} values of {context}")).into())
}

fn parse_count(token: &str, context: &str) -> Result<usize, error::Legacy> {
    token
        .parse()
        .map_err(|_| error::InvalidNumber::new(token.into(), context.into()).into())
}

/// legacy writers escape spaces and other special characters in names as `%XX`
fn decode_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;

    while idx < bytes.len() {
        let escaped = bytes
            .get(idx + 1..idx + 3)
            .filter(|_| bytes[idx] == b'%')
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());

        match escaped {
            Some(byte) => {
                out.push(byte);
                idx += 3;
            }
            None => {
                out.push(bytes[idx]);
                idx += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
