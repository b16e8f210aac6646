use std::io;

use thiserror::Error;

/// Result type alias for Nickfile operations
pub type Result<T> = std::result::Result<T, Nk2Error>;

/// Error domain, modeled after the MAPI provider error classification.
///
/// Every [`Nk2Error`] kind belongs to exactly one domain, see
/// [`Nk2Error::domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    Arguments,
    Conversion,
    Io,
    Memory,
    Runtime,
}

impl std::fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorDomain::Arguments => write!(f, "arguments"),
            ErrorDomain::Conversion => write!(f, "conversion"),
            ErrorDomain::Io => write!(f, "io"),
            ErrorDomain::Memory => write!(f, "memory"),
            ErrorDomain::Runtime => write!(f, "runtime"),
        }
    }
}

/// Main error type for Nickfile operations
#[derive(Error, Debug)]
pub enum Nk2Error {
    #[error("invalid file signature: 0x{read:08x}")]
    InvalidSignature { read: u32 },

    #[error("short read while reading {target}: requested {requested} bytes")]
    ShortRead {
        target: &'static str,
        requested: usize,
        #[source]
        source: io::Error,
    },

    #[error("{context}: unsupported value type: 0x{value_type:04x}")]
    UnsupportedValueType {
        context: &'static str,
        value_type: u32,
    },

    #[error("{context}: invalid value data size: {size}")]
    InvalidValueSize { context: &'static str, size: usize },

    #[error("unsupported ASCII codepage: {codepage}")]
    UnsupportedCodepage { codepage: u16 },

    #[error("{context}: missing value")]
    ValueMissing { context: &'static str },

    #[error("{context}: index {index} out of range: 0..{count}")]
    IndexOutOfRange {
        context: &'static str,
        index: usize,
        count: usize,
    },

    #[error("unable to allocate {requested} bytes of value data")]
    OutOfMemory { requested: usize },

    #[error("operation aborted")]
    Aborted,

    #[error("i/o error while reading {context}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl Nk2Error {
    /// The error domain this kind belongs to.
    pub fn domain(&self) -> ErrorDomain {
        match self {
            Nk2Error::InvalidSignature { .. } => ErrorDomain::Runtime,
            Nk2Error::ShortRead { .. } => ErrorDomain::Io,
            Nk2Error::UnsupportedValueType { .. } => ErrorDomain::Runtime,
            Nk2Error::InvalidValueSize { .. } => ErrorDomain::Runtime,
            Nk2Error::UnsupportedCodepage { .. } => ErrorDomain::Conversion,
            Nk2Error::ValueMissing { .. } => ErrorDomain::Runtime,
            Nk2Error::IndexOutOfRange { .. } => ErrorDomain::Arguments,
            Nk2Error::OutOfMemory { .. } => ErrorDomain::Memory,
            Nk2Error::Aborted => ErrorDomain::Runtime,
            Nk2Error::Io { .. } => ErrorDomain::Io,
        }
    }

    /// Numeric sub-kind within the domain, stable across releases.
    pub fn code(&self) -> u8 {
        match self {
            Nk2Error::InvalidSignature { .. } => 1,
            Nk2Error::ShortRead { .. } => 2,
            Nk2Error::UnsupportedValueType { .. } => 3,
            Nk2Error::InvalidValueSize { .. } => 4,
            Nk2Error::UnsupportedCodepage { .. } => 5,
            Nk2Error::ValueMissing { .. } => 6,
            Nk2Error::IndexOutOfRange { .. } => 7,
            Nk2Error::OutOfMemory { .. } => 8,
            Nk2Error::Aborted => 9,
            Nk2Error::Io { .. } => 10,
        }
    }

    /// Check if this error is recoverable for the file as a whole.
    ///
    /// Typed-accessor and lookup errors report per call and leave the
    /// decoded file usable; parse errors do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Nk2Error::UnsupportedValueType { .. }
                | Nk2Error::InvalidValueSize { .. }
                | Nk2Error::UnsupportedCodepage { .. }
                | Nk2Error::ValueMissing { .. }
                | Nk2Error::IndexOutOfRange { .. }
        )
    }
}
