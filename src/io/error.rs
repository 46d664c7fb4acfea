use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("failed to encode or decode {format} data: {details}")]
    Encoding { format: Format, details: String },

    #[error("inconsistent snapshot record: {0}")]
    Corrupt(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        match *e {
            bincode::ErrorKind::Io(source) => Error::Io { source },
            other => Error::Encoding {
                format: Format::Snapshot,
                details: other.to_string(),
            },
        }
    }
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn corrupt(details: impl Into<String>) -> Self {
        Self::Corrupt(details.into())
    }
}
