use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_aggregate_hints(err);
        collector.collect_smooth_hints(err);
        collector.collect_config_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use attn_census::io::{Error as IoError, Format};

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue at line {} of the {}",
                    line, format
                ));
                if *format == Format::BatchStream {
                    self.add("Each non-blank line must be one JSON object with `atoms`, `interactions`, and `bonds`");
                    self.add("Atoms need `element` (atomic number) and `position` ([x, y, z])");
                }
            }

            IoError::Encoding { format, .. } => {
                self.add(format!("The file could not be decoded as a {}", format));
                self.add("Check that the path points to a file written by `acensus extract`");
                self.add("Snapshots from a different version may not be readable");
            }

            IoError::Corrupt(_) => {
                self.add("The snapshot decoded but its matrices or raw arrays disagree");
                self.add("Re-run `acensus extract` to regenerate it");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The snapshot may be truncated or incomplete");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_aggregate_hints(&mut self, err: &Error) {
        use attn_census::AggregateError;

        let Some(agg_err) = err.downcast_ref::<AggregateError>() else {
            return;
        };

        self.mark_typed();

        match agg_err {
            AggregateError::UnknownElement(e) => {
                self.add(format!("Atomic number {} is not supported", e.0));
                self.add("Supported elements: H (1), C (6), N (7), O (8), F (9)");
            }

            AggregateError::EmptyBatch => {
                self.add("A batch lists interactions or bonds but no atoms");
                self.add("Check that the exporter writes the `atoms` array");
            }

            AggregateError::InvalidInteraction { i, j, .. } => {
                self.add(format!("Interaction {} → {} points outside the batch", i, j));
                self.add("Atom indices are zero-based and local to their batch");
            }

            AggregateError::InvalidBond { i, j, .. } => {
                self.add(format!("Reference bond {} → {} points outside the batch", i, j));
                self.add("Atom indices are zero-based and local to their batch");
            }

            AggregateError::InvalidValue { .. } => {
                self.add("Attention weights and distances must be finite and non-negative");
                self.add("Check for NaN or infinite coordinates in the batch");
            }
        }
    }

    fn collect_smooth_hints(&mut self, err: &Error) {
        use attn_census::SmoothError;

        let Some(smooth_err) = err.downcast_ref::<SmoothError>() else {
            return;
        };

        self.mark_typed();

        match smooth_err {
            SmoothError::InvalidWindow => {
                self.add("Use --window with a value of at least 1");
            }

            SmoothError::InvalidBins => {
                self.add("Use --bins with a value of at least 1");
            }

            SmoothError::LengthMismatch { .. } => {
                self.add("The snapshot's raw edge arrays are inconsistent");
                self.add("Re-run `acensus extract` to regenerate it");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        use attn_census::config::Error as ConfigError;

        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Parse(_) => {
                self.add("Settings file has invalid TOML syntax or an unknown key");
                self.add("Allowed sections: [curve] (pair, window, bins) and [matrix] (normalize_attention)");
            }

            ConfigError::Invalid { key, .. } => {
                self.add(format!("Check the value of '{}' in the settings file", key));
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") || msg.contains("tty") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe batches to stdin");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = err.to_string();

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
