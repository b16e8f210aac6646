//! Debug output for the decode path.
//!
//! The parser reports the fields it decodes but does not validate (unknown
//! header words, raw value data) through an explicit [`Logger`] passed in at
//! open time, instead of a process-wide verbose flag.

/// Sink for decode-time debug messages.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    /// Whether debug messages will be observed at all.
    ///
    /// Callers use this to skip formatting work for the default sink.
    fn enabled(&self) -> bool {
        true
    }
}

/// Default sink that discards everything.
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Sink that writes each message as a line on standard error.
pub struct StderrLogger;

impl Logger for StderrLogger {
    fn debug(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Formats a byte run as space-separated hex for debug output.
pub(crate) fn format_data(data: &[u8]) -> String {
    let mut formatted = String::with_capacity(data.len() * 3);
    for (index, byte) in data.iter().enumerate() {
        if index > 0 {
            formatted.push(' ');
        }
        formatted.push_str(&format!("{byte:02x}"));
    }
    formatted
}
