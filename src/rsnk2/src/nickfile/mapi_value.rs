//! MAPI value data conversions.
//!
//! Pure functions from value data bytes to host types. Value type
//! dispatch lives on `RecordEntry`; everything here assumes the value
//! type was already accepted and only validates the data itself.

use super::codepage::{self, CODEPAGE_ASCII, CODEPAGE_UNICODE, CODEPAGE_UTF7, CODEPAGE_UTF8};
use super::error::{Nk2Error, Result};
use super::value_type::{data_contains_zero_bytes, ValueType};

fn fixed_bytes<const SIZE: usize>(data: &[u8], context: &'static str) -> Result<[u8; SIZE]> {
    if data.len() == SIZE {
        Ok(data.try_into().unwrap())
    } else {
        Err(Nk2Error::InvalidValueSize {
            context,
            size: data.len(),
        })
    }
}

/// 2 bytes little-endian, any non-zero value is true.
pub(crate) fn boolean_from_data(data: &[u8]) -> Result<bool> {
    let value = u16::from_le_bytes(fixed_bytes(data, "boolean value data")?);
    Ok(value != 0)
}

pub(crate) fn integer_16bit_from_data(data: &[u8]) -> Result<i16> {
    Ok(i16::from_le_bytes(fixed_bytes(
        data,
        "16-bit integer value data",
    )?))
}

pub(crate) fn integer_32bit_from_data(data: &[u8]) -> Result<i32> {
    Ok(i32::from_le_bytes(fixed_bytes(
        data,
        "32-bit integer value data",
    )?))
}

pub(crate) fn integer_64bit_from_data(data: &[u8]) -> Result<i64> {
    Ok(i64::from_le_bytes(fixed_bytes(
        data,
        "64-bit integer value data",
    )?))
}

/// 100-nanosecond ticks since 1601-01-01 UTC.
pub(crate) fn filetime_from_data(data: &[u8]) -> Result<u64> {
    Ok(u64::from_le_bytes(fixed_bytes(
        data,
        "filetime value data",
    )?))
}

/// OLE date: fractional days since 1899-12-30, IEEE 754 double.
pub(crate) fn floatingtime_from_data(data: &[u8]) -> Result<f64> {
    Ok(f64::from_bits(u64::from_le_bytes(fixed_bytes(
        data,
        "floatingtime value data",
    )?)))
}

/// 4-byte values are widened to double.
pub(crate) fn floating_point_from_data(value_type: ValueType, data: &[u8]) -> Result<f64> {
    match value_type {
        ValueType::Float32 => {
            let bits = u32::from_le_bytes(fixed_bytes(data, "32-bit floating point value data")?);
            Ok(f64::from(f32::from_bits(bits)))
        }
        _ => {
            let bits = u64::from_le_bytes(fixed_bytes(data, "64-bit floating point value data")?);
            Ok(f64::from_bits(bits))
        }
    }
}

/// Size value: 32-bit for `PT_LONG` entries, 64-bit for `PT_I8` entries.
pub(crate) fn size_from_data(value_type: ValueType, data: &[u8]) -> Result<u64> {
    match value_type {
        ValueType::Integer32 => {
            let value = u32::from_le_bytes(fixed_bytes(data, "32-bit size value data")?);
            Ok(u64::from(value))
        }
        _ => Ok(u64::from_le_bytes(fixed_bytes(
            data,
            "64-bit size value data",
        )?)),
    }
}

/// Copies the 16 GUID bytes without reordering.
pub(crate) fn guid_from_data(data: &[u8], guid: &mut [u8; 16]) -> Result<()> {
    if data.is_empty() {
        return Err(Nk2Error::ValueMissing {
            context: "GUID value data",
        });
    }
    let bytes: [u8; 16] = fixed_bytes(data, "GUID value data")?;
    guid.copy_from_slice(&bytes);
    Ok(())
}

/// Decodes string value data to its text.
///
/// The decode policy follows how Outlook writes string properties:
///
/// * `PT_UNICODE` data is always UTF-16 little-endian.
/// * `PT_STRING8` data in a file configured for codepage 1200 is UTF-16
///   little-endian when it carries interior zero bytes, otherwise a UTF-8
///   byte stream.
/// * Other `PT_STRING8` data is decoded with the file's ASCII codepage.
///   Codepage 65000 (UTF-7) is not supported.
///
/// One trailing NUL terminator is stripped; sizing and copying add it
/// back so the reported size always counts the terminator.
pub(crate) fn string_from_data(
    value_type: ValueType,
    data: &[u8],
    ascii_codepage: u16,
) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let mut is_ascii_string = value_type == ValueType::StringAscii;

    if is_ascii_string
        && ascii_codepage == CODEPAGE_UNICODE
        && data_contains_zero_bytes(data)
    {
        is_ascii_string = false;
    }
    let mut decoded = if !is_ascii_string {
        encoding_rs::UTF_16LE
            .decode_without_bom_handling(data)
            .0
            .into_owned()
    } else if ascii_codepage == CODEPAGE_UTF7 {
        return Err(Nk2Error::UnsupportedCodepage {
            codepage: ascii_codepage,
        });
    } else if ascii_codepage == CODEPAGE_UNICODE || ascii_codepage == CODEPAGE_UTF8 {
        encoding_rs::UTF_8
            .decode_without_bom_handling(data)
            .0
            .into_owned()
    } else if ascii_codepage == CODEPAGE_ASCII {
        data.iter()
            .map(|&byte| {
                if byte < 0x80 {
                    char::from(byte)
                } else {
                    char::REPLACEMENT_CHARACTER
                }
            })
            .collect()
    } else {
        let encoding = codepage::encoding(ascii_codepage).ok_or(Nk2Error::UnsupportedCodepage {
            codepage: ascii_codepage,
        })?;
        encoding.decode_without_bom_handling(data).0.into_owned()
    };
    if decoded.ends_with('\0') {
        decoded.pop();
    }
    Ok(decoded)
}

/// Size of the value as a UTF-8 string in bytes, including the
/// terminating NUL. Empty value data has size 0.
pub(crate) fn utf8_string_size_from_data(
    value_type: ValueType,
    data: &[u8],
    ascii_codepage: u16,
) -> Result<usize> {
    if data.is_empty() {
        return Ok(0);
    }
    let string = string_from_data(value_type, data, ascii_codepage)?;
    Ok(string.len() + 1)
}

/// Copies the value as a NUL-terminated UTF-8 string into `utf8_string`.
/// Returns the number of bytes written, including the terminator.
pub(crate) fn utf8_string_from_data(
    value_type: ValueType,
    data: &[u8],
    ascii_codepage: u16,
    utf8_string: &mut [u8],
) -> Result<usize> {
    let string = string_from_data(value_type, data, ascii_codepage)?;
    let size = string.len() + 1;

    if utf8_string.len() < size {
        return Err(Nk2Error::InvalidValueSize {
            context: "UTF-8 string buffer",
            size: utf8_string.len(),
        });
    }
    utf8_string[..string.len()].copy_from_slice(string.as_bytes());
    utf8_string[string.len()] = 0;
    Ok(size)
}

/// Size of the value as a UTF-16 string in code units, including the
/// terminating NUL. Empty value data has size 0.
pub(crate) fn utf16_string_size_from_data(
    value_type: ValueType,
    data: &[u8],
    ascii_codepage: u16,
) -> Result<usize> {
    if data.is_empty() {
        return Ok(0);
    }
    let string = string_from_data(value_type, data, ascii_codepage)?;
    Ok(string.encode_utf16().count() + 1)
}

/// Copies the value as a NUL-terminated UTF-16 string into
/// `utf16_string`. Returns the number of code units written, including
/// the terminator.
pub(crate) fn utf16_string_from_data(
    value_type: ValueType,
    data: &[u8],
    ascii_codepage: u16,
    utf16_string: &mut [u16],
) -> Result<usize> {
    let string = string_from_data(value_type, data, ascii_codepage)?;
    let size = string.encode_utf16().count() + 1;

    if utf16_string.len() < size {
        return Err(Nk2Error::InvalidValueSize {
            context: "UTF-16 string buffer",
            size: utf16_string.len(),
        });
    }
    for (index, unit) in string.encode_utf16().enumerate() {
        utf16_string[index] = unit;
    }
    utf16_string[size - 1] = 0;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF16_NAME: [u8; 26] = [
        0x4a, 0x00, 0x6f, 0x00, 0x61, 0x00, 0x63, 0x00, 0x68, 0x00, 0x69, 0x00, 0x6d, 0x00, 0x20,
        0x00, 0x4d, 0x00, 0x65, 0x00, 0x74, 0x00, 0x7a, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn boolean_values() {
        assert!(boolean_from_data(&[0x17, 0x00]).unwrap());
        assert!(boolean_from_data(&[0x00, 0x01]).unwrap());
        assert!(!boolean_from_data(&[0x00, 0x00]).unwrap());
        assert!(boolean_from_data(&[0x01]).is_err());
        assert!(boolean_from_data(&[0x01, 0x00, 0x00]).is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(integer_16bit_from_data(&[0xfe, 0xff]).unwrap(), -2);
        assert_eq!(
            integer_32bit_from_data(&[0x15, 0x0c, 0x00, 0x00]).unwrap(),
            3093
        );
        assert_eq!(
            integer_64bit_from_data(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80]).unwrap(),
            i64::MIN + 1
        );
    }

    #[test]
    fn size_widening() {
        assert_eq!(
            size_from_data(ValueType::Integer32, &[0x15, 0x0c, 0x00, 0x00]).unwrap(),
            3093
        );
        assert_eq!(
            size_from_data(
                ValueType::Integer64,
                &[0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
            )
            .unwrap(),
            1 << 32
        );
        // size mismatch for the declared width
        assert!(size_from_data(ValueType::Integer32, &[0x15, 0x0c]).is_err());
    }

    #[test]
    fn floating_point_widening() {
        let bits = 1.5f32.to_bits().to_le_bytes();
        let value = floating_point_from_data(ValueType::Float32, &bits).unwrap();
        assert_eq!(value, 1.5);

        let bits = 2.25f64.to_bits().to_le_bytes();
        let value = floating_point_from_data(ValueType::Double64, &bits).unwrap();
        assert_eq!(value, 2.25);
    }

    #[test]
    fn filetime_and_floatingtime() {
        let data = [0x00, 0x50, 0x1e, 0xf2, 0xd5, 0x2b, 0xc8, 0x01];
        assert_eq!(filetime_from_data(&data).unwrap(), 0x01c8_2bd5_f21e_5000);

        // 2007-11-20 12:00 as an OLE date
        let data = 39406.5f64.to_bits().to_le_bytes();
        assert_eq!(floatingtime_from_data(&data).unwrap(), 39406.5);
    }

    #[test]
    fn guid_copy() {
        let data: Vec<u8> = (0u8..16).collect();
        let mut guid = [0u8; 16];
        guid_from_data(&data, &mut guid).unwrap();
        assert_eq!(&guid[..], &data[..]);

        assert!(guid_from_data(&data[..15], &mut guid).is_err());
        assert!(matches!(
            guid_from_data(&[], &mut guid).unwrap_err(),
            Nk2Error::ValueMissing { .. }
        ));
    }

    #[test]
    fn utf16_string_to_utf8() {
        let size =
            utf8_string_size_from_data(ValueType::StringUnicode, &UTF16_NAME, 1252).unwrap();
        assert_eq!(size, 13);

        let mut buffer = [0u8; 13];
        let written =
            utf8_string_from_data(ValueType::StringUnicode, &UTF16_NAME, 1252, &mut buffer)
                .unwrap();
        assert_eq!(written, 13);
        assert_eq!(&buffer, b"Joachim Metz\0");
    }

    #[test]
    fn ascii_tagged_unicode_disambiguation() {
        // ASCII-tagged property in a codepage 1200 file carrying UTF-16
        let size =
            utf8_string_size_from_data(ValueType::StringAscii, &UTF16_NAME, CODEPAGE_UNICODE)
                .unwrap();
        assert_eq!(size, 13);

        // no interior zero bytes: decoded as a UTF-8 byte stream
        let data = b"Joachim Metz";
        let size =
            utf8_string_size_from_data(ValueType::StringAscii, data, CODEPAGE_UNICODE).unwrap();
        assert_eq!(size, 13);
        let mut buffer = [0u8; 13];
        utf8_string_from_data(ValueType::StringAscii, data, CODEPAGE_UNICODE, &mut buffer)
            .unwrap();
        assert_eq!(&buffer, b"Joachim Metz\0");
    }

    #[test]
    fn codepage_decoding() {
        // 0xe9 is e-acute in Windows-1252
        let data = [0x4d, 0xe9, 0x74, 0x7a, 0x00];
        let string = string_from_data(ValueType::StringAscii, &data, 1252).unwrap();
        assert_eq!(string, "M\u{e9}tz");
        // terminator was stripped and is counted back in the size
        assert_eq!(
            utf8_string_size_from_data(ValueType::StringAscii, &data, 1252).unwrap(),
            string.len() + 1
        );
    }

    #[test]
    fn ascii_codepage_is_strict() {
        let data = [0x41, 0xe9, 0x42];
        let string = string_from_data(ValueType::StringAscii, &data, CODEPAGE_ASCII).unwrap();
        assert_eq!(string, "A\u{fffd}B");
    }

    #[test]
    fn utf7_is_rejected() {
        let error = string_from_data(ValueType::StringAscii, b"abc", CODEPAGE_UTF7).unwrap_err();
        assert!(matches!(
            error,
            Nk2Error::UnsupportedCodepage { codepage: 65000 }
        ));
    }

    #[test]
    fn empty_value_data() {
        assert_eq!(
            utf8_string_size_from_data(ValueType::StringAscii, &[], 1252).unwrap(),
            0
        );
        assert_eq!(
            utf16_string_size_from_data(ValueType::StringUnicode, &[], 1252).unwrap(),
            0
        );
        // copy accessors still write a terminator
        let mut buffer = [0xffu8; 2];
        let written =
            utf8_string_from_data(ValueType::StringAscii, &[], 1252, &mut buffer).unwrap();
        assert_eq!(written, 1);
        assert_eq!(buffer, [0x00, 0xff]);
    }

    #[test]
    fn utf16_copy_round_trip() {
        let size =
            utf16_string_size_from_data(ValueType::StringUnicode, &UTF16_NAME, 1252).unwrap();
        assert_eq!(size, 13);
        let mut buffer = vec![0xffffu16; size];
        let written =
            utf16_string_from_data(ValueType::StringUnicode, &UTF16_NAME, 1252, &mut buffer)
                .unwrap();
        assert_eq!(written, size);
        assert_eq!(buffer[size - 1], 0);
        let decoded = String::from_utf16(&buffer[..size - 1]).unwrap();
        assert_eq!(decoded, "Joachim Metz");
    }

    #[test]
    fn undersized_buffer() {
        let mut buffer = [0u8; 4];
        let error =
            utf8_string_from_data(ValueType::StringUnicode, &UTF16_NAME, 1252, &mut buffer)
                .unwrap_err();
        assert!(matches!(error, Nk2Error::InvalidValueSize { size: 4, .. }));
    }
}
