use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::Path;

use anyhow::{Context, Result};

use attn_census::Aggregates;
use attn_census::io::read_snapshot;

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

pub enum BatchSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for BatchSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BatchSource::File(r) => r.read(buf),
            BatchSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for BatchSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            BatchSource::File(r) => r.fill_buf(),
            BatchSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            BatchSource::File(r) => r.consume(amt),
            BatchSource::Stdin(r) => r.consume(amt),
        }
    }
}

/// Opens the batch stream; a missing file fails before anything is read.
pub fn open_batches(path: Option<&Path>) -> Result<BatchSource> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open batch stream: {}", p.display()))?;
            Ok(BatchSource::File(BufReader::new(file)))
        }
        None => Ok(BatchSource::Stdin(BufReader::new(io::stdin()))),
    }
}

pub fn load_snapshot(path: &Path) -> Result<Aggregates> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
    read_snapshot(BufReader::new(file))
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))
}

pub fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub enum OutputTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::File(w) => w.write(buf),
            OutputTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::File(w) => w.flush(),
            OutputTarget::Stdout(w) => w.flush(),
        }
    }
}

pub fn create_output(path: Option<&Path>) -> Result<OutputTarget> {
    match path {
        Some(p) => Ok(OutputTarget::File(create_file(p)?)),
        None => Ok(OutputTarget::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}
