use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::codepage::{self, CODEPAGE_WINDOWS_1252};
use super::error::{Nk2Error, Result};
use super::file_footer::FileFooter;
use super::file_header::FileHeader;
use super::io_handle::{ByteSource, IoHandle};
use super::item::Item;
use super::logger::{Logger, NullLogger};

/// Open-time configuration for a [`NickFile`].
pub struct OpenOptions {
    ascii_codepage: u16,
    abort: Option<Arc<AtomicBool>>,
    logger: Option<Box<dyn Logger>>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self {
            ascii_codepage: CODEPAGE_WINDOWS_1252,
            abort: None,
            logger: None,
        }
    }

    /// Codepage for single-byte string properties, validated at open.
    pub fn ascii_codepage(mut self, ascii_codepage: u16) -> Self {
        self.ascii_codepage = ascii_codepage;
        self
    }

    /// Shared cooperative abort flag. Raising it from another thread
    /// makes the open return [`Nk2Error::Aborted`]; the parser polls it
    /// between items and between record entries only.
    pub fn abort_flag(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Debug message sink for the decode path.
    pub fn logger(mut self, logger: Box<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// # Nickfile
///
/// A parsed Outlook auto-complete cache file. Opening reads the whole
/// file: header, every alias item with its record entries, and the
/// optional footer. The decoded tree is read-only afterwards and owns
/// all of its value data; items and entries borrow from the file.
#[derive(Debug)]
pub struct NickFile {
    handle: Option<IoHandle>,
    items: Vec<Item>,
    modification_time: Option<u64>,
    ascii_codepage: u16,
    abort: Arc<AtomicBool>,
}

impl NickFile {
    /// Opens a Nickfile on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<NickFile> {
        Self::open_with_options(path, OpenOptions::new())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: OpenOptions) -> Result<NickFile> {
        let file = fs::File::open(path).map_err(|source| Nk2Error::Io {
            context: "file path",
            source,
        })?;
        Self::open_handle(IoHandle::new(Box::new(BufReader::new(file))), options)
    }

    /// Opens a Nickfile from any seekable byte source, for example an
    /// in-memory buffer.
    pub fn open_from_byte_source<S: ByteSource + 'static>(source: S) -> Result<NickFile> {
        Self::open_from_byte_source_with_options(source, OpenOptions::new())
    }

    pub fn open_from_byte_source_with_options<S: ByteSource + 'static>(
        source: S,
        options: OpenOptions,
    ) -> Result<NickFile> {
        Self::open_handle(IoHandle::new(Box::new(source)), options)
    }

    fn open_handle(mut handle: IoHandle, options: OpenOptions) -> Result<NickFile> {
        let ascii_codepage = codepage::validate(options.ascii_codepage)?;
        let abort = options
            .abort
            .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
        let logger = options
            .logger
            .unwrap_or_else(|| Box::new(NullLogger) as Box<dyn Logger>);
        let logger = &*logger;

        handle.seek_start()?;
        if logger.enabled() {
            logger.debug(&format!("file: size: {}", handle.size()?));
        }
        let header = FileHeader::read(&mut handle, logger)?;

        let mut items = Vec::new();

        for item_index in 0..header.number_of_items {
            if abort.load(Ordering::Relaxed) {
                return Err(Nk2Error::Aborted);
            }
            let number_of_entries = handle.read_u32("number of record entries")?;

            // A zero record count marks the end of the items; the header
            // count is an upper bound, not an exact total.
            if number_of_entries == 0 {
                if logger.enabled() {
                    logger.debug(&format!("file: item: {item_index}: end of items marker"));
                }
                break;
            }
            if logger.enabled() {
                logger.debug(&format!(
                    "file: item: {item_index}: number of record entries: {number_of_entries} at offset: {}",
                    handle.offset()?
                ));
            }
            items.push(Item::read(
                &mut handle,
                number_of_entries,
                ascii_codepage,
                &abort,
                logger,
            )?);
        }
        let footer = FileFooter::read(&mut handle, logger)?;

        Ok(NickFile {
            handle: Some(handle),
            items,
            modification_time: footer.map(|footer| footer.modification_time),
            ascii_codepage,
            abort,
        })
    }

    /// Releases the underlying byte source. The decoded items stay
    /// accessible; closing an already closed file is an error.
    pub fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(_) => Ok(()),
            None => Err(Nk2Error::ValueMissing {
                context: "file byte source",
            }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Raises the cooperative abort flag shared with the open path.
    pub fn signal_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn ascii_codepage(&self) -> u16 {
        self.ascii_codepage
    }

    /// Changes the codepage used for single-byte string properties.
    /// Every decoded record entry is re-stamped, so subsequent string
    /// accessors use the new codepage.
    pub fn set_ascii_codepage(&mut self, ascii_codepage: u16) -> Result<()> {
        self.ascii_codepage = codepage::validate(ascii_codepage)?;
        for item in &mut self.items {
            item.set_ascii_codepage(ascii_codepage);
        }
        Ok(())
    }

    /// Modification filetime from the footer, absent when the file has
    /// no (complete) footer.
    pub fn modification_time(&self) -> Option<u64> {
        self.modification_time
    }

    pub fn number_of_items(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> Result<&Item> {
        self.items.get(index).ok_or(Nk2Error::IndexOutOfRange {
            context: "item",
            index,
            count: self.items.len(),
        })
    }

    /// The alias items in file order.
    pub fn items(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}
