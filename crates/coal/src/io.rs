use std::{
    borrow::Cow,
    io::{self, Write as _},
};

/// Trait for handling output from the `print:` family of built-ins.
///
/// Implement this trait to capture or redirect print output from Coal
/// code. The default implementation [`StdPrint`] writes to stdout.
pub trait PrintWriter {
    /// Called with the formatted text for a single printed value, without
    /// any terminator. Terminators (newlines, custom separators) are
    /// emitted via [`PrintWriter::stdout_push`].
    fn stdout_write(&mut self, output: Cow<'_, str>);

    /// Appends a terminator string to stdout.
    fn stdout_push(&mut self, end: &str);
}

/// Default `PrintWriter` that writes directly to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(output.as_bytes());
    }

    fn stdout_push(&mut self, end: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(end.as_bytes());
        let _ = stdout.flush();
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing or capturing print output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    /// Creates a new empty `CollectStringPrint`.
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Returns the collected output as a string slice.
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) {
        self.0.push_str(&output);
    }

    fn stdout_push(&mut self, end: &str) {
        self.0.push_str(end);
    }
}

/// `PrintWriter` that ignores all output.
///
/// Useful for suppressing print output during testing or benchmarking.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) {}

    fn stdout_push(&mut self, _end: &str) {}
}
