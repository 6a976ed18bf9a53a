//! Workbook-wide shared string table.

use crate::intern::InternTable;

/// Deduplicates cell text across every worksheet of a workbook.
///
/// Indices are assigned densely from 0 in first-seen order and never change.
#[derive(Debug, Default, Clone)]
pub struct SharedStringTable {
    strings: InternTable<Box<str>, u32>,
    string_count: u32,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `text`, adding it if it has not been seen.
    ///
    /// Every call counts towards [`string_count`](Self::string_count),
    /// whether or not the text was new. The stored copy is available
    /// through [`get`](Self::get).
    pub fn get_or_create(&mut self, text: &str) -> u32 {
        self.string_count += 1;

        if let Some((_, &index)) = self.strings.exists(text) {
            return index;
        }
        let index = self.unique_count();
        *self.strings.insert(text.into(), index).value
    }

    /// Number of distinct strings
    pub fn unique_count(&self) -> u32 {
        self.strings.len() as u32
    }

    /// Total number of string references, duplicates included
    pub fn string_count(&self) -> u32 {
        self.string_count
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get_index(index as usize).map(|(s, _)| &**s)
    }

    /// Strings in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.strings.iter().map(|(s, &index)| (index, &**s))
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
