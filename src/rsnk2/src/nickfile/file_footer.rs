use super::error::Result;
use super::io_handle::IoHandle;
use super::logger::Logger;

/// # Nickfile footer
///
/// After the last item a Nickfile may carry a fixed 12 byte footer:
///
/// | Offset | Size | Field             | Description |
/// | ------ | ---- | ----------------- | ----------- |
/// | 0      | 4    | Unknown           | |
/// | 4      | 8    | Modification time | Filetime of the last write. |
///
/// Files truncated before or inside the footer are still readable; the
/// modification time is simply absent.
#[derive(Debug)]
pub struct FileFooter {
    pub unknown1: u32,
    /// Windows filetime, 100-nanosecond ticks since 1601-01-01 UTC
    pub modification_time: u64,
}

impl FileFooter {
    pub const SIZE: usize = 12;

    /// Reads the footer if the remaining input holds one.
    pub(crate) fn read(handle: &mut IoHandle, logger: &dyn Logger) -> Result<Option<FileFooter>> {
        let mut data = [0u8; Self::SIZE];
        if !handle.read_exact_optional("file footer", &mut data)? {
            if logger.enabled() {
                logger.debug("file footer: not present");
            }
            return Ok(None);
        }
        Ok(Some(Self::from_bytes(&data, logger)))
    }

    pub(crate) fn from_bytes(data: &[u8; Self::SIZE], logger: &dyn Logger) -> FileFooter {
        let footer = FileFooter {
            unknown1: u32::from_le_bytes(data[0..4].try_into().unwrap()),
            modification_time: u64::from_le_bytes(data[4..12].try_into().unwrap()),
        };
        if logger.enabled() {
            logger.debug(&format!("file footer: unknown1: 0x{:08x}", footer.unknown1));
            logger.debug(&format!(
                "file footer: modification time: 0x{:016x}",
                footer.modification_time
            ));
        }
        footer
    }
}
