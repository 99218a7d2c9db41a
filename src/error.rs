use std::fmt;

/// Errors produced by the map and the homophone tooling built on it.
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading a dictionary
    Io(std::io::Error),

    /// A dictionary line could not be parsed (1-based line number)
    MalformedRecord { line: usize, reason: &'static str },

    /// Homophones must share at least one phoneme
    InvalidSuffixLength,

    /// The probe sequence visited every slot without finding room.
    ///
    /// The resize policy keeps at least one free slot after every insert,
    /// so this indicates a broken table invariant.
    TableFull { capacity: usize },

    /// Growing the table would overflow `usize`
    CapacityOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "dictionary I/O failed: {e}"),
            Self::MalformedRecord { line, reason } => {
                write!(f, "malformed dictionary record on line {line}: {reason}")
            }
            Self::InvalidSuffixLength => f.write_str("phoneme suffix length must be positive"),
            Self::TableFull { capacity } => {
                write!(f, "no free slot left in table of capacity {capacity}")
            }
            Self::CapacityOverflow => f.write_str("table capacity overflow"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Crate result
pub type Result<T> = std::result::Result<T, Error>;
