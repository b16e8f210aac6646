use super::error::{Nk2Error, Result};
use super::io_handle::IoHandle;
use super::logger::Logger;

/// # Nickfile header
///
/// A Nickfile starts with a fixed 16 byte header:
///
/// | Offset | Size | Field           | Description |
/// | ------ | ---- | --------------- | ----------- |
/// | 0      | 4    | Signature       | `0x0d 0xf0 0xad 0xba` (`0xbaadf00d` little-endian). |
/// | 4      | 4    | Unknown         | Seen as 10 in files written by Outlook. |
/// | 8      | 4    | Unknown         | Seen as 1. |
/// | 12     | 4    | Number of items | Upper bound on the number of alias items that follow. |
#[derive(Debug)]
pub struct FileHeader {
    pub unknown1: u32,
    pub unknown2: u32,
    pub number_of_items: u32,
}

/// `0xbaadf00d`
pub const SIGNATURE: u32 = 0xbaad_f00d;

impl FileHeader {
    pub const SIZE: usize = 16;

    pub(crate) fn read(handle: &mut IoHandle, logger: &dyn Logger) -> Result<FileHeader> {
        let mut data = [0u8; Self::SIZE];
        handle.read_exact("file header", &mut data)?;
        Self::from_bytes(&data, logger)
    }

    pub(crate) fn from_bytes(data: &[u8; Self::SIZE], logger: &dyn Logger) -> Result<FileHeader> {
        let signature = u32::from_le_bytes(data[0..4].try_into().unwrap());

        if signature != SIGNATURE {
            return Err(Nk2Error::InvalidSignature { read: signature });
        }
        let header = FileHeader {
            unknown1: u32::from_le_bytes(data[4..8].try_into().unwrap()),
            unknown2: u32::from_le_bytes(data[8..12].try_into().unwrap()),
            number_of_items: u32::from_le_bytes(data[12..16].try_into().unwrap()),
        };
        if logger.enabled() {
            logger.debug(&format!("file header: signature: 0x{signature:08x}"));
            logger.debug(&format!("file header: unknown1: 0x{:08x}", header.unknown1));
            logger.debug(&format!("file header: unknown2: 0x{:08x}", header.unknown2));
            logger.debug(&format!(
                "file header: number of items: {}",
                header.number_of_items
            ));
        }
        Ok(header)
    }
}
