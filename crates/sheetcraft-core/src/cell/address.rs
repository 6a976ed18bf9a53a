//! A1-style cell references

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{COL_MAX, ROW_MAX};

/// Zero-based cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse `B7` or `$B$7` into a zero-based address.
    ///
    /// ```
    /// use sheetcraft_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("C10").unwrap();
    /// assert_eq!((addr.row, addr.col), (9, 2));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidAddress(s.to_string());

        let body = s.strip_prefix('$').unwrap_or(s);
        let split = body
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = body.split_at(split);
        let digits = digits.strip_prefix('$').unwrap_or(digits);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let col = letters_to_column(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        let row = row - 1;

        if row >= ROW_MAX || col >= COL_MAX as u32 {
            return Err(Error::CoordinateOutOfRange { row, col });
        }
        Ok(Self::new(row, col as u16))
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut out = String::with_capacity(8);
        write_cell_ref(&mut out, self.row, self.col);
        out
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Reject coordinates beyond the sheet limits.
pub(crate) fn check_coordinates(row: u32, col: u16) -> Result<()> {
    if row >= ROW_MAX || col >= COL_MAX {
        return Err(Error::CoordinateOutOfRange {
            row,
            col: col as u32,
        });
    }
    Ok(())
}

/// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_to_letters(col: u16) -> String {
    let mut letters = [0u8; 3];
    let mut len = 0;
    let mut n = col as u32 + 1;
    while n > 0 {
        n -= 1;
        letters[len] = b'A' + (n % 26) as u8;
        len += 1;
        n /= 26;
    }
    letters[..len].iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters to a zero-based index. Returns `None` for an
/// empty or non-alphabetic input; the result may exceed the sheet limit.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 4 {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (b.to_ascii_uppercase() - b'A') as u32 + 1;
    }
    Some(col - 1)
}

/// Append the A1 reference of `(row, col)` to `out`.
pub fn write_cell_ref(out: &mut String, row: u32, col: u16) {
    out.push_str(&column_to_letters(col));
    out.push_str(&(row + 1).to_string());
}

/// A rectangular range of cells, always stored top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first: CellAddress,
    pub last: CellAddress,
}

impl CellRange {
    /// Create a range from any two corners
    pub fn new(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self {
            first: CellAddress::new(first_row.min(last_row), first_col.min(last_col)),
            last: CellAddress::new(first_row.max(last_row), first_col.max(last_col)),
        }
    }

    pub fn single(addr: CellAddress) -> Self {
        Self {
            first: addr,
            last: addr,
        }
    }

    /// Parse `A1:B10` or a single reference
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().split_once(':') {
            Some((first, last)) => {
                let first = CellAddress::parse(first)?;
                let last = CellAddress::parse(last)?;
                Ok(Self::new(first.row, first.col, last.row, last.col))
            }
            None => CellAddress::parse(s).map(Self::single),
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.first == self.last
    }

    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.first.row..=self.last.row).contains(&row)
            && (self.first.col..=self.last.col).contains(&col)
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.first.row <= other.last.row
            && self.last.row >= other.first.row
            && self.first.col <= other.last.col
            && self.last.col >= other.first.col
    }

    /// Every address in the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let (first, last) = (self.first, self.last);
        (first.row..=last.row)
            .flat_map(move |row| (first.col..=last.col).map(move |col| CellAddress::new(row, col)))
    }

    pub fn to_a1_string(&self) -> String {
        if self.is_single_cell() {
            self.first.to_a1_string()
        } else {
            format!("{}:{}", self.first, self.last)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
