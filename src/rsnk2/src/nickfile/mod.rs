mod codepage;
mod error;
mod file;
mod file_footer;
mod file_header;
mod io_handle;
mod item;
mod logger;
mod mapi_value;
mod record_entry;
mod value_type;

pub use codepage::{
    CODEPAGE_ASCII, CODEPAGE_UNICODE, CODEPAGE_UTF7, CODEPAGE_UTF8, CODEPAGE_WINDOWS_1252,
};
pub use error::{ErrorDomain, Nk2Error, Result};
pub use file::{NickFile, OpenOptions};
pub use file_footer::FileFooter;
pub use file_header::{FileHeader, SIGNATURE};
pub use io_handle::ByteSource;
pub use item::{Item, MATCH_ANY_VALUE_TYPE};
pub use logger::{Logger, NullLogger, StderrLogger};
pub use record_entry::{RecordEntry, MAXIMUM_VALUE_DATA_SIZE};
pub use value_type::{data_contains_zero_bytes, ValueType, ValueTypeMetadata};
