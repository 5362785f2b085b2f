//! Emitter contract and output targets.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::aggregate::AggregatedReport;
use crate::config::OutputFormat;
use crate::error_handling::EmissionError;

/// Writes an aggregated report in one format.
///
/// Emitters only read the report. Write failures are returned, never
/// swallowed.
pub trait ReportEmitter {
    fn format(&self) -> OutputFormat;

    fn emit(&self, report: &AggregatedReport, target: &ReportTarget) -> Result<(), EmissionError>;
}

/// Where a report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    File(PathBuf),
    Stdout,
}

impl ReportTarget {
    /// Resolves the user-supplied output path for `format`.
    ///
    /// `-` means stdout. Otherwise `.<ext>` is appended unless the path
    /// already ends with that extension (case-insensitive).
    pub fn resolve(output: &Path, format: OutputFormat) -> Self {
        if output.as_os_str() == "-" {
            return ReportTarget::Stdout;
        }

        let ext = format.extension();
        let has_ext = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if has_ext {
            ReportTarget::File(output.to_path_buf())
        } else {
            let mut name = output.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            ReportTarget::File(PathBuf::from(name))
        }
    }

    pub(crate) fn open(&self) -> Result<Box<dyn Write>, EmissionError> {
        Ok(match self {
            ReportTarget::File(path) => Box::new(BufWriter::new(File::create(path)?)),
            ReportTarget::Stdout => Box::new(IgnoreBrokenPipe::new(io::stdout())),
        })
    }
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportTarget::File(path) => write!(f, "{}", path.display()),
            ReportTarget::Stdout => f.write_str("<stdout>"),
        }
    }
}

/// Stdout wrapper that treats a closed pipe (`| head`) as success.
pub(crate) struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_appends_extension() {
        assert_eq!(
            ReportTarget::resolve(Path::new("WappalyzerResults"), OutputFormat::Xlsx),
            ReportTarget::File(PathBuf::from("WappalyzerResults.xlsx"))
        );
        assert_eq!(
            ReportTarget::resolve(Path::new("out/report.json"), OutputFormat::Csv),
            ReportTarget::File(PathBuf::from("out/report.json.csv"))
        );
    }

    #[test]
    fn test_resolve_keeps_matching_extension() {
        assert_eq!(
            ReportTarget::resolve(Path::new("report.CSV"), OutputFormat::Csv),
            ReportTarget::File(PathBuf::from("report.CSV"))
        );
    }

    #[test]
    fn test_resolve_stdout() {
        assert_eq!(
            ReportTarget::resolve(Path::new("-"), OutputFormat::Json),
            ReportTarget::Stdout
        );
        assert_eq!(ReportTarget::Stdout.to_string(), "<stdout>");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_ignore_broken_pipe() {
        let mut writer = IgnoreBrokenPipe::new(ClosedPipe);
        assert_eq!(writer.write(b"abc").unwrap(), 3);
        assert!(writer.flush().is_ok());
    }
}
