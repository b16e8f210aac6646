use super::error::{Nk2Error, Result};
use super::io_handle::IoHandle;
use super::logger::{format_data, Logger};
use super::mapi_value;
use super::value_type::ValueType;

/// Upper bound on an out-of-line value data length read from disk.
/// Larger lengths are treated as corruption instead of being allocated.
pub const MAXIMUM_VALUE_DATA_SIZE: usize = 64 * 1024 * 1024;

/// Where a record entry's value bytes live.
///
/// Fixed-size values of at most 8 bytes are stored in the entry header
/// itself; everything else is a separately owned buffer. The entry owns
/// its bytes either way, so value data never aliases a shared read
/// buffer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueStorage {
    Inline { data: [u8; 8], size: u8 },
    Heap(Box<[u8]>),
}

impl ValueStorage {
    fn as_slice(&self) -> &[u8] {
        match self {
            ValueStorage::Inline { data, size } => &data[..usize::from(*size)],
            ValueStorage::Heap(data) => data,
        }
    }
}

/// # Record entry
///
/// A single MAPI property of an alias item. On disk an entry is a fixed
/// 16 byte header, followed by a length-prefixed data blob for
/// variable-size value types:
///
/// | Offset | Size | Field            | Description |
/// | ------ | ---- | ---------------- | ----------- |
/// | 0      | 2    | Value type       | Low word of the MAPI property tag. |
/// | 2      | 2    | Entry type       | High word of the MAPI property tag. |
/// | 4      | 4    | Unknown          | |
/// | 8      | 8    | Value data array | The value for fixed-size types of at most 8 bytes, otherwise a placeholder. |
///
/// For out-of-line values the header is followed by a 4 byte data size
/// and that many data bytes. GUID values are stored out of line but must
/// carry exactly 16 bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    value_type: ValueType,
    entry_type: u16,
    ascii_codepage: u16,
    storage: ValueStorage,
}

impl RecordEntry {
    pub(crate) const HEADER_SIZE: usize = 16;

    pub(crate) fn read(
        handle: &mut IoHandle,
        ascii_codepage: u16,
        logger: &dyn Logger,
    ) -> Result<RecordEntry> {
        let mut data = [0u8; Self::HEADER_SIZE];
        handle.read_exact("record entry data", &mut data)?;

        let value_type_code = u16::from_le_bytes(data[0..2].try_into().unwrap());
        let entry_type = u16::from_le_bytes(data[2..4].try_into().unwrap());
        let unknown1 = u32::from_le_bytes(data[4..8].try_into().unwrap());

        let mut value_data_array = [0u8; 8];
        value_data_array.copy_from_slice(&data[8..16]);

        let value_type = ValueType::from_entry_code(value_type_code)?;

        if logger.enabled() {
            logger.debug(&format!(
                "record entry: value type: 0x{value_type_code:04x} ({} : {})",
                value_type.identifier(),
                value_type.description()
            ));
            logger.debug(&format!("record entry: entry type: 0x{entry_type:04x}"));
            logger.debug(&format!("record entry: unknown1: 0x{unknown1:08x}"));
            logger.debug(&format!(
                "record entry: value data array: {}",
                format_data(&value_data_array)
            ));
        }
        let storage = if value_type.is_stored_inline() {
            ValueStorage::Inline {
                data: value_data_array,
                size: value_type.metadata().data_size as u8,
            }
        } else {
            Self::read_value_data(handle, value_type, logger)?
        };
        Ok(RecordEntry {
            value_type,
            entry_type,
            ascii_codepage,
            storage,
        })
    }

    /// The value data size of out-of-line values is stored after the
    /// entry header.
    fn read_value_data(
        handle: &mut IoHandle,
        value_type: ValueType,
        logger: &dyn Logger,
    ) -> Result<ValueStorage> {
        let stored_size = handle.read_u32("value data size")?;
        let size = stored_size as usize;

        if logger.enabled() {
            logger.debug(&format!("record entry: value data size: {stored_size}"));
        }
        if size == 0 || size > MAXIMUM_VALUE_DATA_SIZE {
            return Err(Nk2Error::InvalidValueSize {
                context: "record entry value data",
                size,
            });
        }
        if value_type == ValueType::Guid && size != 16 {
            return Err(Nk2Error::InvalidValueSize {
                context: "GUID value data",
                size,
            });
        }
        let mut value_data = Vec::new();
        value_data
            .try_reserve_exact(size)
            .map_err(|_| Nk2Error::OutOfMemory { requested: size })?;
        value_data.resize(size, 0);

        handle.read_exact("value data", &mut value_data)?;
        Ok(ValueStorage::Heap(value_data.into_boxed_slice()))
    }

    /// High word of the MAPI property tag.
    pub fn entry_type(&self) -> u32 {
        u32::from(self.entry_type)
    }

    /// Low word of the MAPI property tag.
    pub fn value_type(&self) -> u32 {
        u32::from(self.value_type.code())
    }

    /// The full 32-bit MAPI property tag, `(entry_type << 16) | value_type`.
    pub fn property_tag(&self) -> u32 {
        (u32::from(self.entry_type) << 16) | u32::from(self.value_type.code())
    }

    /// The raw value data bytes.
    pub fn data(&self) -> &[u8] {
        self.storage.as_slice()
    }

    pub fn value_data_size(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// The codepage used to decode ASCII string values, inherited from
    /// the file.
    pub fn ascii_codepage(&self) -> u16 {
        self.ascii_codepage
    }

    pub(crate) fn set_ascii_codepage(&mut self, ascii_codepage: u16) {
        self.ascii_codepage = ascii_codepage;
    }

    fn require_value_type(&self, context: &'static str, accepted: &[ValueType]) -> Result<()> {
        if accepted.contains(&self.value_type) {
            Ok(())
        } else {
            Err(Nk2Error::UnsupportedValueType {
                context,
                value_type: u32::from(self.value_type.code()),
            })
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.require_value_type("boolean value", &[ValueType::Boolean])?;
        mapi_value::boolean_from_data(self.data())
    }

    pub fn as_i16(&self) -> Result<i16> {
        self.require_value_type("16-bit integer value", &[ValueType::Integer16])?;
        mapi_value::integer_16bit_from_data(self.data())
    }

    /// Error values decode like 32-bit integers.
    pub fn as_i32(&self) -> Result<i32> {
        self.require_value_type(
            "32-bit integer value",
            &[ValueType::Integer32, ValueType::ErrorCode],
        )?;
        mapi_value::integer_32bit_from_data(self.data())
    }

    /// Currency values decode like 64-bit integers.
    pub fn as_i64(&self) -> Result<i64> {
        self.require_value_type(
            "64-bit integer value",
            &[ValueType::Integer64, ValueType::Currency],
        )?;
        mapi_value::integer_64bit_from_data(self.data())
    }

    /// Windows filetime, 100-nanosecond ticks since 1601-01-01 UTC.
    pub fn as_filetime(&self) -> Result<u64> {
        self.require_value_type("filetime value", &[ValueType::Filetime])?;
        mapi_value::filetime_from_data(self.data())
    }

    /// OLE date, fractional days since 1899-12-30.
    pub fn as_floatingtime(&self) -> Result<f64> {
        self.require_value_type("floatingtime value", &[ValueType::Floatingtime])?;
        mapi_value::floatingtime_from_data(self.data())
    }

    pub fn as_floating_point(&self) -> Result<f64> {
        self.require_value_type(
            "floating point value",
            &[ValueType::Float32, ValueType::Double64],
        )?;
        mapi_value::floating_point_from_data(self.value_type, self.data())
    }

    pub fn as_size(&self) -> Result<u64> {
        self.require_value_type(
            "size value",
            &[ValueType::Integer32, ValueType::Integer64],
        )?;
        mapi_value::size_from_data(self.value_type, self.data())
    }

    /// Copies the 16 GUID bytes in file order.
    pub fn as_guid(&self, guid: &mut [u8; 16]) -> Result<()> {
        self.require_value_type("GUID value", &[ValueType::Guid])?;
        mapi_value::guid_from_data(self.data(), guid)
    }

    /// Size of the value as a UTF-8 string in bytes, including the
    /// terminating NUL.
    pub fn as_utf8_string_size(&self) -> Result<usize> {
        self.require_value_type(
            "UTF-8 string value",
            &[ValueType::StringAscii, ValueType::StringUnicode],
        )?;
        mapi_value::utf8_string_size_from_data(self.value_type, self.data(), self.ascii_codepage)
    }

    /// Copies the value as a NUL-terminated UTF-8 string. Returns the
    /// number of bytes written.
    pub fn as_utf8_string(&self, utf8_string: &mut [u8]) -> Result<usize> {
        self.require_value_type(
            "UTF-8 string value",
            &[ValueType::StringAscii, ValueType::StringUnicode],
        )?;
        mapi_value::utf8_string_from_data(
            self.value_type,
            self.data(),
            self.ascii_codepage,
            utf8_string,
        )
    }

    /// Size of the value as a UTF-16 string in code units, including the
    /// terminating NUL.
    pub fn as_utf16_string_size(&self) -> Result<usize> {
        self.require_value_type(
            "UTF-16 string value",
            &[ValueType::StringAscii, ValueType::StringUnicode],
        )?;
        mapi_value::utf16_string_size_from_data(self.value_type, self.data(), self.ascii_codepage)
    }

    /// Copies the value as a NUL-terminated UTF-16 string. Returns the
    /// number of code units written.
    pub fn as_utf16_string(&self, utf16_string: &mut [u16]) -> Result<usize> {
        self.require_value_type(
            "UTF-16 string value",
            &[ValueType::StringAscii, ValueType::StringUnicode],
        )?;
        mapi_value::utf16_string_from_data(
            self.value_type,
            self.data(),
            self.ascii_codepage,
            utf16_string,
        )
    }

    /// The value as an owned UTF-8 string, without the terminator.
    pub fn to_utf8_string(&self) -> Result<String> {
        self.require_value_type(
            "UTF-8 string value",
            &[ValueType::StringAscii, ValueType::StringUnicode],
        )?;
        mapi_value::string_from_data(self.value_type, self.data(), self.ascii_codepage)
    }
}
