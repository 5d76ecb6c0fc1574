use super::error;
use crate::prelude::*;

/// Byte order of binary data in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Numeric type of the values stored in a data array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// parse the `type` attribute of an xml `DataArray`
    pub fn from_xml_name(name: &str) -> Result<Self, error::UnknownScalarType> {
        let out = match name {
            "Int8" => Self::Int8,
            "UInt8" => Self::UInt8,
            "Int16" => Self::Int16,
            "UInt16" => Self::UInt16,
            "Int32" => Self::Int32,
            "UInt32" => Self::UInt32,
            "Int64" => Self::Int64,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            _ => return Err(error::UnknownScalarType::new(name.to_string())),
        };

        Ok(out)
    }

    /// parse a data type name as it appears in legacy vtk headers (`float`, `unsigned_char`, ...)
    pub fn from_legacy_name(name: &str) -> Result<Self, error::UnknownScalarType> {
        let out = match name.to_ascii_lowercase().as_str() {
            "char" => Self::Int8,
            "unsigned_char" => Self::UInt8,
            "short" => Self::Int16,
            "unsigned_short" => Self::UInt16,
            "int" => Self::Int32,
            "unsigned_int" => Self::UInt32,
            // legacy writers emit 8 byte longs
            "long" | "vtktypeint64" | "vtkidtype" => Self::Int64,
            "unsigned_long" | "vtktypeuint64" => Self::UInt64,
            "float" => Self::Float32,
            "double" => Self::Float64,
            _ => return Err(error::UnknownScalarType::new(name.to_string())),
        };

        Ok(out)
    }

    /// width of a single value in bytes
    pub fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Decode raw bytes into `f64` values. Trailing bytes that do not
    /// make up a full value are ignored.
    pub fn decode(&self, bytes: &[u8], order: ByteOrder) -> Vec<f64> {
        macro_rules! decode_as {
            ($ty:ty) => {
                bytes
                    .chunks_exact(std::mem::size_of::<$ty>())
                    .map(|chunk| {
                        let mut arr = [0u8; std::mem::size_of::<$ty>()];
                        arr.copy_from_slice(chunk);
                        let value = match order {
                            ByteOrder::LittleEndian => <$ty>::from_le_bytes(arr),
                            ByteOrder::BigEndian => <$ty>::from_be_bytes(arr),
                        };
                        value as f64
                    })
                    .collect()
            };
        }

        match self {
            Self::Int8 => decode_as!(i8),
            Self::UInt8 => decode_as!(u8),
            Self::Int16 => decode_as!(i16),
            Self::UInt16 => decode_as!(u16),
            Self::Int32 => decode_as!(i32),
            Self::UInt32 => decode_as!(u32),
            Self::Int64 => decode_as!(i64),
            Self::UInt64 => decode_as!(u64),
            Self::Float32 => decode_as!(f32),
            Self::Float64 => decode_as!(f64),
        }
    }
}

/// Read an unsigned integer header (block sizes in xml binary data) of `header_type` width
pub(crate) fn read_header_value(
    bytes: &[u8],
    header_type: ScalarType,
    order: ByteOrder,
) -> Option<usize> {
    let width = header_type.size();
    let slice = bytes.get(0..width)?;

    header_type
        .decode(slice, order)
        .first()
        .map(|value| *value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names() {
        assert_eq!(ScalarType::from_legacy_name("float").unwrap(), ScalarType::Float32);
        assert_eq!(ScalarType::from_legacy_name("DOUBLE").unwrap(), ScalarType::Float64);
        assert_eq!(
            ScalarType::from_legacy_name("unsigned_char").unwrap(),
            ScalarType::UInt8
        );
        assert!(ScalarType::from_legacy_name("bit").is_err());
    }

    #[test]
    fn decode_both_orders() {
        let values = [1.5f32, -2.0];
        let mut le = Vec::new();
        let mut be = Vec::new();
        for v in values {
            le.extend(v.to_le_bytes());
            be.extend(v.to_be_bytes());
        }

        assert_eq!(
            ScalarType::Float32.decode(&le, ByteOrder::LittleEndian),
            vec![1.5, -2.0]
        );
        assert_eq!(
            ScalarType::Float32.decode(&be, ByteOrder::BigEndian),
            vec![1.5, -2.0]
        );
    }

    #[test]
    fn decode_integers() {
        let bytes = [0xffu8, 0x01];
        assert_eq!(
            ScalarType::Int8.decode(&bytes, ByteOrder::LittleEndian),
            vec![-1.0, 1.0]
        );
        assert_eq!(
            ScalarType::UInt16.decode(&bytes, ByteOrder::BigEndian),
            vec![65281.0]
        );
    }

    #[test]
    fn header_values() {
        let bytes = 96u64.to_le_bytes();
        assert_eq!(
            read_header_value(&bytes, ScalarType::UInt64, ByteOrder::LittleEndian),
            Some(96)
        );
        assert_eq!(
            read_header_value(&bytes[0..2], ScalarType::UInt32, ByteOrder::LittleEndian),
            None
        );
    }
}
