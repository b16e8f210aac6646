use std::sync::atomic::{AtomicBool, Ordering};

use super::error::{Nk2Error, Result};
use super::io_handle::IoHandle;
use super::logger::Logger;
use super::record_entry::RecordEntry;

/// Match entries on their entry type alone, taking whatever value type
/// the entry carries. Without this flag the value type must match too.
pub const MATCH_ANY_VALUE_TYPE: u8 = 0x01;

/// # Item
///
/// One cached recipient (alias) of a Nickfile: an ordered collection of
/// record entries. On disk an item is a 4 byte record entry count
/// followed by that many record entries. The file order of the entries
/// is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    entries: Vec<RecordEntry>,
}

impl Item {
    pub(crate) fn read(
        handle: &mut IoHandle,
        number_of_entries: u32,
        ascii_codepage: u16,
        abort: &AtomicBool,
        logger: &dyn Logger,
    ) -> Result<Item> {
        // the count comes from disk, the entries grow as they decode
        let mut entries = Vec::new();

        for entry_index in 0..number_of_entries {
            if abort.load(Ordering::Relaxed) {
                return Err(Nk2Error::Aborted);
            }
            if logger.enabled() {
                logger.debug(&format!("item: record entry: {entry_index}"));
            }
            entries.push(RecordEntry::read(handle, ascii_codepage, logger)?);
        }
        Ok(Item { entries })
    }

    pub fn number_of_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Result<&RecordEntry> {
        self.entries.get(index).ok_or(Nk2Error::IndexOutOfRange {
            context: "record entry",
            index,
            count: self.entries.len(),
        })
    }

    /// The record entries in file order.
    pub fn entries(&self) -> std::slice::Iter<'_, RecordEntry> {
        self.entries.iter()
    }

    /// Finds the first entry with the wanted MAPI property tag.
    ///
    /// The entry type must match; the value type must match too unless
    /// [`MATCH_ANY_VALUE_TYPE`] is set in `flags`. Returns `None` when
    /// the item holds no matching entry.
    pub fn entry_by_type(
        &self,
        entry_type: u32,
        value_type: u32,
        flags: u8,
    ) -> Result<Option<&RecordEntry>> {
        let match_any_value_type = (flags & MATCH_ANY_VALUE_TYPE) != 0;

        for entry in &self.entries {
            if entry.entry_type() != entry_type {
                continue;
            }
            if match_any_value_type || entry.value_type() == value_type {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    pub(crate) fn set_ascii_codepage(&mut self, ascii_codepage: u16) {
        for entry in &mut self.entries {
            entry.set_ascii_codepage(ascii_codepage);
        }
    }
}
