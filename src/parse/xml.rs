//! Reader for xml vtk files (`.vts`, `.vtr`)
//!
//! The document is walked event by event with `quick_xml`. Inline `ascii` and `binary`
//! (base64) arrays are decoded as soon as they are found. Arrays in the `appended` format
//! only record their offset; once every header has been read the raw `<AppendedData>`
//! section is pulled straight from the underlying reader and the offsets are resolved.

use super::error;
use super::event_summary::EventSummary;
use super::scalar_type::{read_header_value, ByteOrder, ScalarType};
use crate::mesh::{DatasetKind, Extent, PointArray};
use crate::prelude::*;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, trace};

/// Information from the `<VTKFile>` element that controls how arrays are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub(crate) kind: DatasetKind,
    pub(crate) byte_order: ByteOrder,
    pub(crate) header_type: ScalarType,
}

#[derive(Debug, Clone, PartialEq)]
/// Describes if the data for this array has already been parsed (regardless of format),
/// or its offset in the `AppendedData` section
pub(crate) enum PartialDataArray {
    Parsed(Vec<f64>),
    AppendedBinary { offset: usize },
}

/// A `DataArray` element whose values may still live in the appended section
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArrayRecord {
    pub(crate) name: String,
    pub(crate) components: usize,
    pub(crate) scalar_type: ScalarType,
    pub(crate) data: PartialDataArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayFormat {
    Ascii,
    Base64,
    Appended { offset: usize },
}

#[derive(Debug)]
struct DataArrayHeader {
    name: String,
    components: usize,
    scalar_type: ScalarType,
    format: ArrayFormat,
}

/// parse a full xml document into a mesh
pub(crate) fn parse_xml_document<R: BufRead>(
    mut reader: Reader<R>,
) -> Result<StructuredMesh, error::Xml> {
    let mut buffer = Vec::new();

    // ignore whitespace in the reader
    reader.trim_text(true);

    let header = read_file_header(&mut reader, &mut buffer)?;
    debug!(?header, "read <VTKFile> header");

    let grid_name = header.kind.to_string();
    let whole_extent = read_grid_header(&mut reader, &mut buffer, &grid_name)?;
    debug!(?whole_extent, "read {grid_name} header");

    read_starting_element_with_name(&mut reader, &mut buffer, "Piece")?;

    let mut point_data = Vec::new();
    let mut points = None;
    let mut coordinates = None;

    // sections inside of a piece may come in any order
    loop {
        let (section, was_empty) = match next_event(&mut reader, &mut buffer)? {
            Event::Start(s) => (element_name(&s), false),
            Event::Empty(s) => (element_name(&s), true),
            Event::End(e) if e.name().as_ref() == b"Piece" => break,
            Event::Comment(_) => continue,
            other => {
                let actual = EventSummary::new(&other);
                return Err(error::UnexpectedElement::new(
                    "PointData, CellData, Points, Coordinates or /Piece",
                    actual,
                )
                .into());
            }
        };

        let arrays = if was_empty {
            Vec::new()
        } else {
            read_section_arrays(&mut reader, &mut buffer, &section, &header)?
        };

        trace!(section = %section, arrays = arrays.len(), "finished section");

        match section.as_str() {
            "PointData" => point_data = arrays,
            "Points" => points = Some(arrays),
            "Coordinates" => coordinates = Some(arrays),
            // cell centered data has no place on the point grid
            "CellData" | "FieldData" => (),
            _ => {
                let actual = EventSummary::new(&Event::Start(BytesStart::new(section.clone())));
                return Err(error::UnexpectedElement::new(
                    "PointData, CellData, Points or Coordinates",
                    actual,
                )
                .into());
            }
        }
    }

    read_ending_element(&mut reader, &mut buffer, &grid_name)?;

    let pending: Vec<&mut ArrayRecord> = point_data
        .iter_mut()
        .chain(points.iter_mut().flatten())
        .chain(coordinates.iter_mut().flatten())
        .filter(|record| matches!(record.data, PartialDataArray::AppendedBinary { .. }))
        .collect();

    if !pending.is_empty() {
        debug!(arrays = pending.len(), "resolving arrays from the appended section");
        let appended = read_appended_section(&mut reader, &mut buffer)?;
        for record in pending {
            resolve_appended(record, &appended, &header)?;
        }
    }

    let mut mesh = match header.kind {
        DatasetKind::RectilinearGrid => {
            let coordinates = coordinates.ok_or_else(|| {
                error::MissingElement::new("Coordinates".into(), "Piece".into())
            })?;
            let mut axes = coordinates.into_iter().map(|record| record.into_values());
            let (x, y, z) = match (axes.next(), axes.next(), axes.next()) {
                (Some(x), Some(y), Some(z)) => (x, y, z),
                _ => {
                    return Err(error::MissingElement::new(
                        "DataArray".into(),
                        "Coordinates (expected X, Y and Z arrays)".into(),
                    )
                    .into())
                }
            };
            StructuredMesh::try_from_axis_locations(header.kind, &x, &y, &z).ok_or_else(|| {
                let what = format!("a grid of {} x {} x {} points", x.len(), y.len(), z.len());
                error::TooLarge::new(what)
            })?
        }
        _ => {
            let points = points
                .and_then(|records| records.into_iter().next())
                .ok_or_else(|| error::MissingElement::new("Points".into(), "Piece".into()))?;

            if points.components != 3 {
                return Err(error::UnexpectedAttributeValue::new(
                    "DataArray".into(),
                    "NumberOfComponents".into(),
                    "3".into(),
                    error::ParsedNameOrBytes::Utf8(points.components.to_string()),
                )
                .into());
            }

            StructuredMesh::from_flat_points(
                header.kind,
                whole_extent.dimensions(),
                points.into_values(),
            )
        }
    };

    for record in point_data {
        let components = record.components;
        let name = record.name.clone();
        mesh.insert_point_array(PointArray::new(name, components, record.into_values()));
    }

    Ok(mesh)
}

impl ArrayRecord {
    fn into_values(self) -> Vec<f64> {
        match self.data {
            PartialDataArray::Parsed(values) => values,
            // every appended array is resolved before the mesh is assembled
            PartialDataArray::AppendedBinary { .. } => Vec::new(),
        }
    }
}

fn next_event<'b, R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &'b mut Vec<u8>,
) -> Result<Event<'b>, error::Xml> {
    buffer.clear();
    reader
        .read_event_into(buffer)
        .map_err(|e| error::MalformedXml::from(e).into())
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// find the `<VTKFile>` element and pull the grid type, byte order and header width from it
pub(crate) fn read_file_header<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<FileHeader, error::Xml> {
    loop {
        let event = next_event(reader, buffer)?;

        let start = match event {
            // declarations and comments may come before the root element
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => continue,
            Event::Start(start) if start.name().as_ref() == b"VTKFile" => start,
            other => {
                let actual = EventSummary::new(&other);
                return Err(error::UnexpectedElement::new("VTKFile", actual).into());
            }
        };

        let kind = match required_attribute(&start, "type", "VTKFile")?.as_str() {
            "StructuredGrid" => DatasetKind::StructuredGrid,
            "RectilinearGrid" => DatasetKind::RectilinearGrid,
            other => {
                return Err(error::UnexpectedAttributeValue::new(
                    "VTKFile".into(),
                    "type".into(),
                    "StructuredGrid or RectilinearGrid".into(),
                    error::ParsedNameOrBytes::from(other),
                )
                .into())
            }
        };

        let byte_order = match optional_attribute(&start, "byte_order")?.as_deref() {
            None | Some("LittleEndian") => ByteOrder::LittleEndian,
            Some("BigEndian") => ByteOrder::BigEndian,
            Some(other) => {
                return Err(error::UnexpectedAttributeValue::new(
                    "VTKFile".into(),
                    "byte_order".into(),
                    "LittleEndian or BigEndian".into(),
                    error::ParsedNameOrBytes::from(other),
                )
                .into())
            }
        };

        let header_type = match optional_attribute(&start, "header_type")?.as_deref() {
            None | Some("UInt32") => ScalarType::UInt32,
            Some("UInt64") => ScalarType::UInt64,
            Some(other) => {
                return Err(error::UnexpectedAttributeValue::new(
                    "VTKFile".into(),
                    "header_type".into(),
                    "UInt32 or UInt64".into(),
                    error::ParsedNameOrBytes::from(other),
                )
                .into())
            }
        };

        if let Some(compressor) = optional_attribute(&start, "compressor")? {
            return Err(error::Unsupported::new(format!("compressed data ({compressor})")).into());
        }

        return Ok(FileHeader {
            kind,
            byte_order,
            header_type,
        });
    }
}

/// parse the grid element header, return the contents of the `WholeExtent` attribute
fn read_grid_header<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    grid_name: &str,
) -> Result<Extent, error::Xml> {
    let event = read_starting_element_with_name(reader, buffer, grid_name)?;
    let extent = required_attribute(&event, "WholeExtent", grid_name)?;
    Ok(Extent::from_extent_string(&extent)?)
}

fn read_starting_element_with_name<'a, R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &'a mut Vec<u8>,
    expected_name: &str,
) -> Result<BytesStart<'a>, error::Xml> {
    match next_event(reader, buffer)? {
        Event::Start(event) if event.name().as_ref() == expected_name.as_bytes() => Ok(event),
        other => {
            let actual_event = EventSummary::new(&other);
            Err(error::UnexpectedElement::new(expected_name, actual_event).into())
        }
    }
}

fn read_ending_element<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    expected_name: &str,
) -> Result<(), error::Xml> {
    match next_event(reader, buffer)? {
        Event::End(event) if event.name().as_ref() == expected_name.as_bytes() => Ok(()),
        other => {
            let actual_event = EventSummary::new(&other);
            Err(error::UnexpectedElement::new(format!("/{expected_name}"), actual_event).into())
        }
    }
}

fn optional_attribute(
    bytes_start: &BytesStart<'_>,
    attribute_key: &str,
) -> Result<Option<String>, error::Xml> {
    for attribute in bytes_start.attributes() {
        let attribute = attribute.map_err(error::MalformedAttribute::from)?;

        if attribute.key.as_ref() == attribute_key.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attribute.value).into_owned()));
        }
    }

    Ok(None)
}

fn required_attribute(
    bytes_start: &BytesStart<'_>,
    attribute_key: &str,
    element_name: &str,
) -> Result<String, error::Xml> {
    optional_attribute(bytes_start, attribute_key)?.ok_or_else(|| {
        error::MissingAttribute::new(element_name.into(), attribute_key.into()).into()
    })
}

/// read through the attributes of a `<DataArray>` element
fn read_dataarray_header(start: &BytesStart<'_>) -> Result<DataArrayHeader, error::Xml> {
    let name = optional_attribute(start, "Name")?.unwrap_or_default();

    let type_name = required_attribute(start, "type", "DataArray")?;
    let scalar_type = ScalarType::from_xml_name(&type_name)?;

    let components = match optional_attribute(start, "NumberOfComponents")? {
        Some(text) => parse_usize(&text, "NumberOfComponents")?,
        None => 1,
    };

    let format = match required_attribute(start, "format", "DataArray")?.as_str() {
        "ascii" => ArrayFormat::Ascii,
        "binary" => ArrayFormat::Base64,
        "appended" => {
            let offset = required_attribute(start, "offset", "DataArray")?;
            ArrayFormat::Appended {
                offset: parse_usize(&offset, "offset")?,
            }
        }
        other => {
            return Err(error::UnexpectedAttributeValue::new(
                "DataArray".into(),
                "format".into(),
                "ascii, binary or appended".into(),
                error::ParsedNameOrBytes::from(other),
            )
            .into())
        }
    };

    Ok(DataArrayHeader {
        name,
        components,
        scalar_type,
        format,
    })
}

fn parse_usize(text: &str, context: &str) -> Result<usize, error::Xml> {
    text.trim()
        .parse()
        .map_err(|_| error::InvalidNumber::new(text.into(), context.into()).into())
}

/// Read every `<DataArray>` up to the closing element of `section`
fn read_section_arrays<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    section: &str,
    file_header: &FileHeader,
) -> Result<Vec<ArrayRecord>, error::Xml> {
    let mut records = Vec::new();

    loop {
        let (header, was_empty) = match next_event(reader, buffer)? {
            Event::Start(s) if s.name().as_ref() == b"DataArray" => {
                (read_dataarray_header(&s)?, false)
            }
            Event::Empty(s) if s.name().as_ref() == b"DataArray" => {
                (read_dataarray_header(&s)?, true)
            }
            Event::End(e) if e.name().as_ref() == section.as_bytes() => break,
            Event::Comment(_) => continue,
            other => {
                let actual = EventSummary::new(&other);
                let expected = format!("DataArray or /{section}");
                return Err(error::UnexpectedElement::new(expected, actual).into());
            }
        };

        let text = if was_empty {
            String::new()
        } else {
            read_dataarray_body(reader, buffer)?
        };

        let data = match header.format {
            ArrayFormat::Appended { offset } => PartialDataArray::AppendedBinary { offset },
            ArrayFormat::Ascii => {
                PartialDataArray::Parsed(parse_ascii_values(&text, &header.name)?)
            }
            ArrayFormat::Base64 => {
                let bytes = decode_inline_binary(&text, &header.name, file_header)?;
                PartialDataArray::Parsed(header.scalar_type.decode(&bytes, file_header.byte_order))
            }
        };

        trace!(name = %header.name, format = ?header.format, "read DataArray");

        records.push(ArrayRecord {
            name: header.name,
            components: header.components,
            scalar_type: header.scalar_type,
            data,
        });
    }

    Ok(records)
}

/// Collect the text of a `<DataArray>` up to its closing element. Nested elements
/// (`<InformationKey>`) are skipped along with their text.
fn read_dataarray_body<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<String, error::Xml> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match next_event(reader, buffer)? {
            Event::Text(t) if depth == 0 => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                text.push(' ');
            }
            Event::CData(t) if depth == 0 => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                text.push(' ');
            }
            Event::Start(_) => depth += 1,
            Event::End(e) if depth == 0 && e.name().as_ref() == b"DataArray" => break,
            Event::End(_) if depth > 0 => depth -= 1,
            Event::Eof => {
                let actual = EventSummary::eof();
                return Err(error::UnexpectedElement::new("/DataArray", actual).into());
            }
            _ => (),
        }
    }

    Ok(text)
}

/// parse the values for a single inline ascii array
fn parse_ascii_values(text: &str, array_name: &str) -> Result<Vec<f64>, error::Xml> {
    text.split_ascii_whitespace()
        .map(|x| {
            x.parse::<f64>().map_err(|_| {
                let context = format!("ascii DataArray `{array_name}`");
                error::InvalidNumber::new(x.into(), context).into()
            })
        })
        .collect()
}

/// Decode an inline `binary` array: base64 of a byte-count header followed by the data.
///
/// Writers encode the header and the data either as one base64 run or as two
/// separately padded runs.
fn decode_inline_binary(
    text: &str,
    array_name: &str,
    file_header: &FileHeader,
) -> Result<Vec<u8>, error::Xml> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let header_width = file_header.header_type.size();
    let to_error = |e| error::Base64Array::new(array_name.into(), e);

    let bytes = match base64::decode(&compact) {
        Ok(bytes) => bytes,
        Err(_) => {
            let header_chars = ((header_width + 2) / 3 * 4).min(compact.len());
            let (header, data) = compact.split_at(header_chars);
            let mut bytes = base64::decode(header).map_err(to_error)?;
            bytes.extend(base64::decode(data).map_err(to_error)?);
            bytes
        }
    };

    let data = take_block(&bytes, array_name, file_header)?;
    Ok(data.to_vec())
}

/// Split a `[byte count header][data]` block and return the data
fn take_block<'a>(
    bytes: &'a [u8],
    array_name: &str,
    file_header: &FileHeader,
) -> Result<&'a [u8], error::Xml> {
    let header_width = file_header.header_type.size();

    let length = read_header_value(bytes, file_header.header_type, file_header.byte_order)
        .ok_or_else(|| error::TruncatedBinary::new(array_name.into(), header_width, bytes.len()))?;

    let end = header_width.saturating_add(length);

    bytes.get(header_width..end).ok_or_else(|| {
        error::TruncatedBinary::new(array_name.into(), end, bytes.len()).into()
    })
}

/// Open `<AppendedData>` and return every raw byte after its leading `_` marker
fn read_appended_section<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<Vec<u8>, error::Xml> {
    let appended = read_starting_element_with_name(reader, buffer, "AppendedData")?;
    let encoding = required_attribute(&appended, "encoding", "AppendedData")?;

    if encoding != "raw" {
        return Err(error::Unsupported::new(format!("{encoding} encoded <AppendedData>")).into());
    }

    // the raw bytes are not xml, so they are read from the underlying reader directly
    let mut raw = Vec::new();
    reader.get_mut().read_to_end(&mut raw)?;

    let start = raw.iter().position(|byte| *byte == b'_').ok_or_else(|| {
        error::MissingElement::new("_ marker".into(), "AppendedData".into())
    })?;

    raw.drain(0..=start);
    Ok(raw)
}

fn resolve_appended(
    record: &mut ArrayRecord,
    appended: &[u8],
    file_header: &FileHeader,
) -> Result<(), error::Xml> {
    if let PartialDataArray::AppendedBinary { offset } = record.data {
        let block = appended.get(offset..).ok_or_else(|| {
            error::TruncatedBinary::new(record.name.clone(), offset, appended.len())
        })?;
        let data = take_block(block, &record.name, file_header)?;
        record.data =
            PartialDataArray::Parsed(record.scalar_type.decode(data, file_header.byte_order));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(input);
        reader.trim_text(true);
        reader
    }

    fn header() -> FileHeader {
        FileHeader {
            kind: DatasetKind::StructuredGrid,
            byte_order: ByteOrder::LittleEndian,
            header_type: ScalarType::UInt32,
        }
    }

    #[test]
    fn shred_to_extent() {
        let input = r#"<?xml version="1.0"?>
            <VTKFile type="StructuredGrid" version="1.0" byte_order="LittleEndian" header_type="UInt64">
            <StructuredGrid WholeExtent="0 219 0 199 0 0">
            <Piece Extent="0 219 0 199 0 0">
        "#;

        let mut reader = reader(input);
        let mut buffer = Vec::new();

        let header = read_file_header(&mut reader, &mut buffer).unwrap();
        let whole_extent = read_grid_header(&mut reader, &mut buffer, "StructuredGrid").unwrap();

        assert_eq!(header.kind, DatasetKind::StructuredGrid);
        assert_eq!(header.header_type, ScalarType::UInt64);
        assert_eq!(whole_extent.dimensions(), Dimensions::new(220, 200, 1));
    }

    #[test]
    fn oversized_whole_extent() {
        let input = r#"<VTKFile type="StructuredGrid" version="1.0">
            <StructuredGrid WholeExtent="-9223372036854775808 9223372036854775807 0 0 0 0">
        "#;

        let mut reader = reader(input);
        let mut buffer = Vec::new();

        read_file_header(&mut reader, &mut buffer).unwrap();
        let err = read_grid_header(&mut reader, &mut buffer, "StructuredGrid").unwrap_err();
        assert!(matches!(err, error::Xml::InvalidExtent(_)));
    }

    #[test]
    fn rejects_image_data() {
        let input = r#"<VTKFile type="ImageData" version="1.0">"#;
        let mut reader = reader(input);
        let mut buffer = Vec::new();

        let err = read_file_header(&mut reader, &mut buffer).unwrap_err();
        assert!(matches!(err, error::Xml::UnexpectedAttributeValue(_)));
    }

    #[test]
    fn rejects_compression() {
        let input = r#"<VTKFile type="StructuredGrid" compressor="vtkZLibDataCompressor">"#;
        let mut reader = reader(input);
        let mut buffer = Vec::new();

        let err = read_file_header(&mut reader, &mut buffer).unwrap_err();
        assert!(matches!(err, error::Xml::Unsupported(_)));
    }

    #[test]
    fn ascii_array_section() {
        let input = r#"
            <PointData>
                <DataArray type="Float64" NumberOfComponents="1" Name="Pressure" format="ascii">
                    .0000000000E+00 .3981797497E-01 .7963594994E-01 .1194539249E+00
                </DataArray>
                <DataArray type="Int32" Name="Id" format="ascii">1 2 3 4</DataArray>
            </PointData>
            "#;
        let mut reader = reader(input);
        let mut buffer = Vec::new();

        read_starting_element_with_name(&mut reader, &mut buffer, "PointData").unwrap();
        let records =
            read_section_arrays(&mut reader, &mut buffer, "PointData", &header()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Pressure");
        assert_eq!(records[1].scalar_type, ScalarType::Int32);
        assert_eq!(
            records[1].data,
            PartialDataArray::Parsed(vec![1.0, 2.0, 3.0, 4.0])
        );
    }

    #[test]
    fn appended_array_header() {
        let input = r#"<Points>
            <DataArray type="Float32" NumberOfComponents="3" Name="Points"
                format="appended" offset="99"/>
            </Points>"#;
        let mut reader = reader(input);
        let mut buffer = Vec::new();

        read_starting_element_with_name(&mut reader, &mut buffer, "Points").unwrap();
        let records = read_section_arrays(&mut reader, &mut buffer, "Points", &header()).unwrap();

        assert_eq!(records[0].components, 3);
        assert_eq!(
            records[0].data,
            PartialDataArray::AppendedBinary { offset: 99 }
        );
    }

    #[test]
    fn base64_single_and_split_runs() {
        let values = [1.0f64, 2.0, 3.0, 4.0];
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let count = (data.len() as u32).to_le_bytes();

        let mut joined = count.to_vec();
        joined.extend(&data);
        let single = base64::encode(&joined);
        let split = format!("{}{}", base64::encode(count), base64::encode(&data));

        for text in [single, split] {
            let bytes = decode_inline_binary(&text, "X", &header()).unwrap();
            assert_eq!(
                ScalarType::Float64.decode(&bytes, ByteOrder::LittleEndian),
                values
            );
        }
    }

    #[test]
    fn truncated_binary_block() {
        let mut bytes = 64u32.to_le_bytes().to_vec();
        bytes.extend([0u8; 8]);

        let err = take_block(&bytes, "X", &header()).unwrap_err();
        assert!(matches!(err, error::Xml::TruncatedBinary(_)));
    }

    #[test]
    fn bad_ascii_number() {
        let err = parse_ascii_values("1.0 two 3.0", "X").unwrap_err();
        assert!(err.to_string().contains("`two`"));
    }
}
