//! ASCII codepage handling.
//!
//! Nickfiles do not record which codepage their single-byte string
//! properties use; the reader carries a configurable codepage instead.
//! The numeric values are the Windows codepage identifiers.

use encoding_rs::Encoding;

use super::error::{Nk2Error, Result};

/// 7-bit ASCII (US-ASCII, IANA 20127)
pub const CODEPAGE_ASCII: u16 = 20127;

/// Unicode marker codepage. Strings tagged with an ASCII value type in a
/// file configured for codepage 1200 may actually carry UTF-16 data; see
/// the string accessors on `RecordEntry`.
pub const CODEPAGE_UNICODE: u16 = 1200;

/// UTF-7, not supported by the string conversion path
pub const CODEPAGE_UTF7: u16 = 65000;

/// UTF-8
pub const CODEPAGE_UTF8: u16 = 65001;

/// Default codepage for newly opened files (Windows Western European)
pub const CODEPAGE_WINDOWS_1252: u16 = 1252;

/// Checks whether a codepage may be configured on a file.
///
/// The accepted set is the Windows codepages observed in real-world
/// Nickfiles plus US-ASCII and the Unicode marker. The ISO-8859 and KOI8
/// families are deliberately not accepted.
pub fn is_supported(codepage: u16) -> bool {
    matches!(
        codepage,
        CODEPAGE_ASCII | CODEPAGE_UNICODE | 874 | 932 | 936 | 949 | 950 | 1250..=1258
    )
}

/// Validates a codepage for use as a file's ASCII codepage.
pub fn validate(codepage: u16) -> Result<u16> {
    if is_supported(codepage) {
        Ok(codepage)
    } else {
        Err(Nk2Error::UnsupportedCodepage { codepage })
    }
}

/// Looks up the byte-stream decoder for a Windows codepage.
///
/// ASCII and the Unicode/UTF marker values are handled by the caller and
/// have no byte-stream encoding here.
pub(crate) fn encoding(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        874 => Some(encoding_rs::WINDOWS_874),
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),
        _ => None,
    }
}
