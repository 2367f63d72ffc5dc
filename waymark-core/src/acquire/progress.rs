use std::io::{self, Write};

use log::debug;

use super::AcquireError;

/// Observer for batch progress.
///
/// Purely informational: nothing a reporter does can change the outcome of
/// a run.
pub trait ProgressReporter {
    /// Processing of the element at `index` with `key` has started.
    fn item(&mut self, index: usize, key: &str);

    /// The element at `index` failed and the failure was recorded.
    fn failed(&mut self, _index: usize, _error: &AcquireError) {}

    /// The run completed with `error_count` recorded failures.
    fn finished(&mut self, _error_count: usize) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn item(&mut self, index: usize, key: &str) {
        (**self).item(index, key);
    }

    fn failed(&mut self, index: usize, error: &AcquireError) {
        (**self).failed(index, error);
    }

    fn finished(&mut self, error_count: usize) {
        (**self).finished(error_count);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn item(&mut self, _index: usize, _key: &str) {}
}

/// Single refreshed line per element, written to a terminal-like stream.
///
/// Each element overwrites the previous line with `\r`; failures and the
/// closing error count get lines of their own.
#[derive(Debug)]
pub struct LineProgress<W> {
    out: W,
}

impl<W: Write> LineProgress<W> {
    /// Report to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        let outcome = self.out.write_fmt(args).and_then(|()| self.out.flush());
        if let Err(err) = outcome {
            debug!("progress output failed: {err}");
        }
    }
}

impl LineProgress<io::Stderr> {
    /// Report to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

const PAD: &str = "                              ";

impl<W: Write> ProgressReporter for LineProgress<W> {
    fn item(&mut self, index: usize, key: &str) {
        self.emit(format_args!("\r{index:04}: {key}{PAD}"));
    }

    fn failed(&mut self, _index: usize, error: &AcquireError) {
        self.emit(format_args!("\nERROR: {error}\n"));
    }

    fn finished(&mut self, error_count: usize) {
        self.emit(format_args!("\nNumber of errors: {error_count}\n"));
    }
}
