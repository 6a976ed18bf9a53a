//! Cell storage
//!
//! - [`CellValue`] and [`CellData`] - what a cell holds
//! - [`CellAddress`] and [`CellRange`] - A1-style coordinates
//! - [`CellGrid`] - sparse random-access storage
//! - [`StreamingRowController`] - one-row buffer for constant-memory mode

mod address;
mod grid;
mod streaming;
mod value;

pub(crate) use address::check_coordinates;
pub use address::{column_to_letters, letters_to_column, write_cell_ref, CellAddress, CellRange};
pub use grid::{CellGrid, Dimensions, Row};
pub use streaming::StreamingRowController;
pub use value::{CellData, CellInput, CellValue};
