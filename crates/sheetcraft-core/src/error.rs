//! Error types for sheetcraft-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// Row or column beyond the sheet limits
    #[error("Cell ({row}, {col}) is outside the sheet limits")]
    CoordinateOutOfRange { row: u32, col: u32 },

    /// Write behind the buffered row in constant-memory mode
    #[error("Row {row} was written after row {buffered_row} in constant-memory mode")]
    OrderingViolation { row: u32, buffered_row: u32 },

    /// A string, URL or tooltip exceeds its length limit
    #[error("{what} length {actual} exceeds limit {limit}")]
    CapacityExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// NaN or infinite cell value
    #[error("Number {0} cannot be stored in a cell")]
    NonFiniteNumber(f64),

    /// URL with no recognised scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Merge intersects an existing merged range
    #[error("Merged range {0} overlaps an existing merged range")]
    MergedRangeOverlap(String),

    /// Operation that needs access to earlier rows
    #[error("{0} is not supported in constant-memory mode")]
    UnsupportedInConstantMemory(&'static str),

    /// Format handle not registered with this workbook
    #[error("Unknown format id: {0}")]
    UnknownFormat(u32),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Temp-file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn capacity(what: &'static str, limit: usize, actual: usize) -> Self {
        Error::CapacityExceeded {
            what,
            limit,
            actual,
        }
    }
}
