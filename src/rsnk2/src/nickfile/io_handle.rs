use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use super::error::{Nk2Error, Result};

/// Byte source the reader can operate on.
///
/// Implemented for anything that can be read and seeked; the handle owns
/// the source for the lifetime of the file that opened it. The `Send +
/// Sync` bounds keep an opened file shareable between threads.
pub trait ByteSource: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> ByteSource for T {}

/// Thin adapter over the underlying byte source.
///
/// The parser reads sequentially forward after a single seek to the start;
/// every read is exact-sized and a short read is reported as such rather
/// than as a generic i/o failure.
pub(crate) struct IoHandle {
    source: Box<dyn ByteSource>,
}

impl std::fmt::Debug for IoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoHandle").finish_non_exhaustive()
    }
}

impl IoHandle {
    pub fn new(source: Box<dyn ByteSource>) -> Self {
        Self { source }
    }

    pub fn seek_start(&mut self) -> Result<()> {
        self.source
            .seek(SeekFrom::Start(0))
            .map_err(|source| Nk2Error::Io {
                context: "start of file",
                source,
            })?;
        Ok(())
    }

    /// Current offset in the source, for debug output.
    pub fn offset(&mut self) -> Result<u64> {
        self.source.stream_position().map_err(|source| Nk2Error::Io {
            context: "stream position",
            source,
        })
    }

    pub fn size(&mut self) -> Result<u64> {
        let current = self.offset()?;
        let size = self
            .source
            .seek(SeekFrom::End(0))
            .map_err(|source| Nk2Error::Io {
                context: "end of file",
                source,
            })?;
        self.source
            .seek(SeekFrom::Start(current))
            .map_err(|source| Nk2Error::Io {
                context: "stream position",
                source,
            })?;
        Ok(size)
    }

    /// Reads exactly `buffer.len()` bytes of `target`.
    pub fn read_exact(&mut self, target: &'static str, buffer: &mut [u8]) -> Result<()> {
        self.source
            .read_exact(buffer)
            .map_err(|source| read_error(source, target, buffer.len()))
    }

    /// Reads exactly `buffer.len()` bytes, reporting end-of-input as absent
    /// data instead of an error. Used for the optional file footer.
    pub fn read_exact_optional(&mut self, target: &'static str, buffer: &mut [u8]) -> Result<bool> {
        match self.source.read_exact(buffer) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(source) => Err(Nk2Error::Io {
                context: target,
                source,
            }),
        }
    }

    pub fn read_u32(&mut self, target: &'static str) -> Result<u32> {
        self.source
            .read_u32::<LittleEndian>()
            .map_err(|source| read_error(source, target, 4))
    }
}

fn read_error(source: io::Error, target: &'static str, requested: usize) -> Nk2Error {
    if source.kind() == io::ErrorKind::UnexpectedEof {
        Nk2Error::ShortRead {
            target,
            requested,
            source,
        }
    } else {
        Nk2Error::Io {
            context: target,
            source,
        }
    }
}
