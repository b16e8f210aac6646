//! Reader for Microsoft Outlook Nickfile (NK2) auto-complete cache
//! files.
//!
//! ```no_run
//! use rsnk2::NickFile;
//!
//! let file = NickFile::open("Outlook.NK2")?;
//! for item in file.items() {
//!     for entry in item.entries() {
//!         println!("0x{:08x}", entry.property_tag());
//!     }
//! }
//! # Ok::<(), rsnk2::Nk2Error>(())
//! ```

mod nickfile;

pub use nickfile::*;
