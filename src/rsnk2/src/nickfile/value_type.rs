use paste::paste;

use super::error::{Nk2Error, Result};

/// Per-type decode metadata, see [`ValueType::metadata`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTypeMetadata {
    /// The 16-bit MAPI property type code
    pub code: u16,
    /// Number of value data bytes for fixed-size types, 0 for
    /// variable-size types whose length is stored out of line
    pub data_size: usize,
    /// MAPI property type identifier, e.g. `PT_UNICODE`
    pub identifier: &'static str,
    /// Human readable description
    pub description: &'static str,
}

macro_rules! value_types {
    ($($name:ident => ($code:literal, $size:literal, $identifier:literal, $description:literal)),* $(,)?) => {
        paste! {
            /// MAPI property value type.
            ///
            /// The low 16 bits of a MAPI property tag, see \[MS-OXCDATA\]
            /// section 2.11.1 "Property Data Types". Only the types that
            /// occur in Nickfiles are supported; any other code fails the
            /// record entry decode.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum ValueType {
                $($name,)*
            }

            impl ValueType {
                $(
                    const [<$name:upper _METADATA>]: ValueTypeMetadata = ValueTypeMetadata {
                        code: $code,
                        data_size: $size,
                        identifier: $identifier,
                        description: $description,
                    };
                )*

                pub fn metadata(&self) -> &'static ValueTypeMetadata {
                    match self {
                        $(
                            ValueType::$name => &Self::[<$name:upper _METADATA>],
                        )*
                    }
                }

                pub fn from_code(code: u16) -> Option<ValueType> {
                    match code {
                        $(
                            $code => Some(ValueType::$name),
                        )*
                        _ => None,
                    }
                }
            }
        }
    };
}

value_types! {
    Integer16 => (0x0002, 2, "PT_SHORT", "16-bit signed integer"),
    Integer32 => (0x0003, 4, "PT_LONG", "32-bit signed integer"),
    Float32 => (0x0004, 4, "PT_FLOAT", "32-bit floating point"),
    Double64 => (0x0005, 8, "PT_DOUBLE", "64-bit floating point"),
    Currency => (0x0006, 8, "PT_CURRENCY", "Currency (64-bit scaled integer)"),
    Floatingtime => (0x0007, 8, "PT_APPTIME", "Floatingtime (OLE date)"),
    ErrorCode => (0x000a, 4, "PT_ERROR", "Error scode"),
    Boolean => (0x000b, 2, "PT_BOOLEAN", "Boolean"),
    Integer64 => (0x0014, 8, "PT_I8", "64-bit signed integer"),
    StringAscii => (0x001e, 0, "PT_STRING8", "ASCII string"),
    StringUnicode => (0x001f, 0, "PT_UNICODE", "Unicode string"),
    Filetime => (0x0040, 8, "PT_SYSTIME", "Filetime"),
    Guid => (0x0048, 16, "PT_CLSID", "GUID"),
    BinaryData => (0x0102, 0, "PT_BINARY", "Binary data"),
}

impl ValueType {
    /// Resolves a code read from a record entry, failing on any type the
    /// format does not carry.
    pub(crate) fn from_entry_code(code: u16) -> Result<ValueType> {
        ValueType::from_code(code).ok_or(Nk2Error::UnsupportedValueType {
            context: "record entry",
            value_type: u32::from(code),
        })
    }

    pub fn code(&self) -> u16 {
        self.metadata().code
    }

    pub fn identifier(&self) -> &'static str {
        self.metadata().identifier
    }

    pub fn description(&self) -> &'static str {
        self.metadata().description
    }

    /// Value data size for fixed-size types, `None` when the size is
    /// stored out of line in the file.
    pub fn fixed_data_size(&self) -> Option<usize> {
        match self.metadata().data_size {
            0 => None,
            size => Some(size),
        }
    }

    /// Whether the value data fits the 8-byte inline area of a record
    /// entry. GUIDs are fixed-size but too wide to be stored inline.
    pub(crate) fn is_stored_inline(&self) -> bool {
        matches!(self.metadata().data_size, 1..=8)
    }
}

/// Checks whether byte-stream data is actually UTF-16 encoded.
///
/// True when a zero byte occurs before the last byte. Codepage 1200
/// ("Unicode") files store UTF-16 strings in ASCII-tagged properties; a
/// single-byte string can only contain a zero as its terminator, so an
/// interior zero identifies a UTF-16 payload.
pub fn data_contains_zero_bytes(data: &[u8]) -> bool {
    match data.len() {
        0 => false,
        length => data[..length - 1].contains(&0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for code in [
            0x0002u16, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007, 0x000a, 0x000b, 0x0014, 0x001e,
            0x001f, 0x0040, 0x0048, 0x0102,
        ] {
            let value_type = ValueType::from_code(code).unwrap();
            assert_eq!(value_type.code(), code);
        }
        assert_eq!(ValueType::from_code(0x1234), None);
        assert_eq!(ValueType::from_code(0x0000), None);
    }

    #[test]
    fn fixed_data_sizes() {
        assert_eq!(ValueType::Boolean.fixed_data_size(), Some(2));
        assert_eq!(ValueType::Integer16.fixed_data_size(), Some(2));
        assert_eq!(ValueType::Integer32.fixed_data_size(), Some(4));
        assert_eq!(ValueType::Float32.fixed_data_size(), Some(4));
        assert_eq!(ValueType::ErrorCode.fixed_data_size(), Some(4));
        assert_eq!(ValueType::Double64.fixed_data_size(), Some(8));
        assert_eq!(ValueType::Currency.fixed_data_size(), Some(8));
        assert_eq!(ValueType::Floatingtime.fixed_data_size(), Some(8));
        assert_eq!(ValueType::Integer64.fixed_data_size(), Some(8));
        assert_eq!(ValueType::Filetime.fixed_data_size(), Some(8));
        assert_eq!(ValueType::Guid.fixed_data_size(), Some(16));
        assert_eq!(ValueType::StringAscii.fixed_data_size(), None);
        assert_eq!(ValueType::StringUnicode.fixed_data_size(), None);
        assert_eq!(ValueType::BinaryData.fixed_data_size(), None);
    }

    #[test]
    fn inline_storage() {
        assert!(ValueType::Boolean.is_stored_inline());
        assert!(ValueType::Filetime.is_stored_inline());
        // GUIDs are fixed-size but read out of line
        assert!(!ValueType::Guid.is_stored_inline());
        assert!(!ValueType::StringAscii.is_stored_inline());
        assert!(!ValueType::BinaryData.is_stored_inline());
    }

    #[test]
    fn identifiers() {
        assert_eq!(ValueType::StringUnicode.identifier(), "PT_UNICODE");
        assert_eq!(ValueType::Boolean.identifier(), "PT_BOOLEAN");
        assert_eq!(
            ValueType::from_entry_code(0x1234).unwrap_err().to_string(),
            "record entry: unsupported value type: 0x1234"
        );
    }

    #[test]
    fn zero_byte_detection() {
        // interior zero: UTF-16 payload
        assert!(data_contains_zero_bytes(&[0x4a, 0x00, 0x6f, 0x00]));
        // empty UTF-16 string, terminator only
        assert!(data_contains_zero_bytes(&[0x00, 0x00]));
        // single-byte string without terminator
        assert!(!data_contains_zero_bytes(b"Joachim Metz"));
        // single-byte string with terminator
        assert!(!data_contains_zero_bytes(b"Joachim Metz\x00"));
        assert!(!data_contains_zero_bytes(&[]));
        assert!(!data_contains_zero_bytes(&[0x00]));
    }
}
