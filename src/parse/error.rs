use crate::prelude::*;

use super::event_summary::EventSummary;

use quick_xml::name::QName;

/// Everything that can go wrong while turning a file into a
/// [`StructuredMesh`](crate::StructuredMesh)
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("failed to read vtk file: {0}")]
    Io(std::io::Error),
    #[error("Error parsing xml vtk file: {0}")]
    Xml(Xml),
    #[error("Error parsing legacy vtk file: {0}")]
    Legacy(Legacy),
    #[error("file is neither a legacy vtk file (`# vtk DataFile ...`) nor an xml vtk file (`<VTKFile ...>`)")]
    UnknownFormat,
}

#[derive(Debug, thiserror::Error, From)]
pub enum Xml {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    MissingElement(MissingElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    InvalidExtent(crate::mesh::InvalidExtent),
    #[error("{0}")]
    UnknownScalarType(UnknownScalarType),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
    #[error("{0}")]
    Base64Array(Base64Array),
    #[error("{0}")]
    TruncatedBinary(TruncatedBinary),
    #[error("{0}")]
    Unsupported(Unsupported),
    #[error("{0}")]
    TooLarge(TooLarge),
    #[error("failed to read the <AppendedData> section: {0}")]
    Io(std::io::Error),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Legacy {
    #[error("{0}")]
    UnexpectedEof(UnexpectedEof),
    #[error("{0}")]
    UnexpectedKeyword(UnexpectedKeyword),
    #[error("{0}")]
    UnknownScalarType(UnknownScalarType),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
    #[error("{0}")]
    TruncatedBinary(TruncatedBinary),
    #[error("{0}")]
    Unsupported(Unsupported),
    #[error("{0}")]
    TooLarge(TooLarge),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: quick_xml::events::attributes::AttrError,
}

#[derive(From, Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    pub(crate) element_name: String,
    pub(crate) attribute_name: String,
    pub(crate) expected_value: String,
    pub(crate) actual_value: ParsedNameOrBytes,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: String,
    attribute_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing <{element_name}> element in {parent_name}")]
pub struct MissingElement {
    element_name: String,
    parent_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unknown data type `{type_name}`")]
pub struct UnknownScalarType {
    type_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "could not parse `{text}` as a number while reading {context}")]
pub struct InvalidNumber {
    text: String,
    context: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "could not decode base64 data for array `{array_name}`: {reason}")]
pub struct Base64Array {
    array_name: String,
    reason: base64::DecodeError,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "binary data for `{array_name}` is truncated: expected {expected_bytes} bytes, {available_bytes} available"
)]
pub struct TruncatedBinary {
    array_name: String,
    expected_bytes: usize,
    available_bytes: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unsupported vtk feature: {feature}")]
pub struct Unsupported {
    feature: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{what} is too large to read into memory")]
pub struct TooLarge {
    what: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unexpected end of file while looking for {expected}")]
pub struct UnexpectedEof {
    expected: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unexpected keyword. Expected {expected}, got `{actual}`")]
pub struct UnexpectedKeyword {
    expected: String,
    actual: String,
}

#[derive(From, Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}

#[test]
fn messages_read_well() {
    let err = Legacy::from(UnexpectedKeyword::new(
        "POINTS".into(),
        "CELLS".into(),
    ));
    assert_eq!(
        err.to_string(),
        "unexpected keyword. Expected POINTS, got `CELLS`"
    );

    let err = ParseError::from(Xml::from(MissingAttribute::new(
        "Piece".into(),
        "Extent".into(),
    )));
    assert_eq!(
        err.to_string(),
        "Error parsing xml vtk file: missing attribute `Extent` in Piece element"
    );
}
