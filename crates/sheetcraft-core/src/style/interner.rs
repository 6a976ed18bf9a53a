//! Workbook-wide format deduplication
//!
//! Resolution happens in two phases:
//!
//! 1. While cells are written, [`FormatInterner::xf_index`] gives each used
//!    format an xf (cell style record) index. Formats with equal content
//!    share one index, assigned in order of first use.
//! 2. When the workbook is closed, [`FormatInterner::prepare`] walks the xf
//!    records in order and assigns font, number format, border and fill
//!    indices, each from its own counter.
//!
//! Registered formats are frozen: the registry owns them, so a format's
//! content can never change after it has been resolved.

use std::hash::Hash;

use crate::error::{Error, Result};
use crate::intern::InternTable;

use super::{BorderStyle, FillStyle, FontStyle, Format, NumberFormat, PatternType};

/// Handle to a format registered with a [`FormatInterner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatId(u32);

impl FormatId {
    /// The workbook default format (xf index 0)
    pub const DEFAULT: FormatId = FormatId(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Indices resolved for one registered format.
///
/// `has_*` is true only on the format that introduced a new record, so the
/// serializer writes each font/border/fill/number format exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub xf_index: Option<u32>,
    pub font_index: u32,
    pub has_font: bool,
    pub num_format_index: u32,
    pub has_num_format: bool,
    pub border_index: u32,
    pub has_border: bool,
    pub fill_index: u32,
    pub has_fill: bool,
}

/// Deduplicates formats into xf records and their sub-records.
#[derive(Debug, Clone)]
pub struct FormatInterner {
    formats: Vec<(Format, ResolvedFormat)>,
    /// Content to xf index
    xf_table: InternTable<Format, u32>,
    /// Canonical owner of each xf record, in xf order
    xf_owners: Vec<FormatId>,
    fonts: InternTable<FontStyle, u32>,
    num_formats: InternTable<String, u32>,
    borders: InternTable<BorderStyle, u32>,
    fills: InternTable<FillStyle, u32>,
    /// Number of xf records already run through `prepare`
    prepared_upto: usize,
}

impl Default for FormatInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatInterner {
    /// Create an interner holding the default format at xf index 0.
    pub fn new() -> Self {
        let mut fills = InternTable::new();
        fills.insert(FillStyle::default(), 0);
        fills.insert(
            FillStyle::pattern(PatternType::Gray125, Default::default(), Default::default()),
            1,
        );

        let mut interner = Self {
            formats: Vec::with_capacity(16),
            xf_table: InternTable::new(),
            xf_owners: Vec::with_capacity(16),
            fonts: InternTable::new(),
            num_formats: InternTable::new(),
            borders: InternTable::new(),
            fills,
            prepared_upto: 0,
        };

        let default = interner.register(Format::default());
        interner.assign_xf(default);
        interner
    }

    /// Register a format and return its handle.
    ///
    /// No index is assigned until a cell, row or column uses the format.
    pub fn register(&mut self, format: Format) -> FormatId {
        let id = FormatId(self.formats.len() as u32);
        self.formats.push((format, ResolvedFormat::default()));
        id
    }

    pub fn get(&self, id: FormatId) -> Option<&Format> {
        self.formats.get(id.0 as usize).map(|(format, _)| format)
    }

    pub fn resolved(&self, id: FormatId) -> Option<&ResolvedFormat> {
        self.formats.get(id.0 as usize).map(|(_, resolved)| resolved)
    }

    /// Return the xf index for `id`, assigning one on first use.
    pub fn xf_index(&mut self, id: FormatId) -> Result<u32> {
        if id.0 as usize >= self.formats.len() {
            return Err(Error::UnknownFormat(id.0));
        }
        Ok(self.assign_xf(id))
    }

    /// Like [`xf_index`](Self::xf_index) but maps `None` to the default
    /// format, which is always xf 0.
    pub fn resolve(&mut self, id: Option<FormatId>) -> Result<u32> {
        match id {
            Some(id) => self.xf_index(id),
            None => Ok(0),
        }
    }

    fn assign_xf(&mut self, id: FormatId) -> u32 {
        let (format, resolved) = &mut self.formats[id.0 as usize];
        if let Some(xf) = resolved.xf_index {
            return xf;
        }

        let xf = match self.xf_table.exists(&*format) {
            Some((_, &xf)) => xf,
            None => {
                let xf = self.xf_owners.len() as u32;
                self.xf_table.insert(format.clone(), xf);
                self.xf_owners.push(id);
                xf
            }
        };
        resolved.xf_index = Some(xf);
        xf
    }

    /// Assign font, number format, border and fill indices to every xf
    /// record that has not been prepared yet.
    ///
    /// Safe to call repeatedly; earlier assignments never change.
    pub fn prepare(&mut self) {
        let start = self.prepared_upto;
        let pending = &self.xf_owners[start..];

        for owner in pending {
            let (format, resolved) = &mut self.formats[owner.0 as usize];
            let next = self.fonts.len() as u32;
            (resolved.font_index, resolved.has_font) = intern(&mut self.fonts, &format.font, next);
        }

        for owner in pending {
            let (format, resolved) = &mut self.formats[owner.0 as usize];
            match format.number_format.builtin_id() {
                Some(id) => {
                    resolved.num_format_index = id;
                    resolved.has_num_format = false;
                }
                None => {
                    let code = format.number_format.format_string().unwrap_or_default();
                    let next = NumberFormat::FIRST_CUSTOM_ID + self.num_formats.len() as u32;
                    (resolved.num_format_index, resolved.has_num_format) =
                        intern(&mut self.num_formats, code, next);
                }
            }
        }

        for owner in pending {
            let (format, resolved) = &mut self.formats[owner.0 as usize];
            let next = self.borders.len() as u32;
            (resolved.border_index, resolved.has_border) =
                intern(&mut self.borders, &format.border, next);
        }

        for owner in pending {
            let (format, resolved) = &mut self.formats[owner.0 as usize];
            let fill = format.fill.normalized();
            let next = self.fills.len() as u32;
            (resolved.fill_index, resolved.has_fill) = intern(&mut self.fills, &fill, next);
        }

        self.prepared_upto = self.xf_owners.len();

        // Formats that share content with an owner take the owner's indices.
        for index in 0..self.formats.len() {
            let Some(xf) = self.formats[index].1.xf_index else {
                continue;
            };
            let owner = self.xf_owners[xf as usize];
            if owner.0 as usize == index {
                continue;
            }
            let canonical = self.formats[owner.0 as usize].1;
            self.formats[index].1 = ResolvedFormat {
                has_font: false,
                has_num_format: false,
                has_border: false,
                has_fill: false,
                ..canonical
            };
        }

        log::debug!(
            "prepared {} xf records: {} fonts, {} number formats, {} borders, {} fills",
            self.xf_owners.len(),
            self.fonts.len(),
            self.num_formats.len(),
            self.borders.len(),
            self.fills.len()
        );
    }

    pub fn xf_count(&self) -> usize {
        self.xf_owners.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn border_count(&self) -> usize {
        self.borders.len()
    }

    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    /// Number of custom number formats (ids 164 and up)
    pub fn num_format_count(&self) -> usize {
        self.num_formats.len()
    }

    /// Canonical formats in xf order
    pub fn xf_formats(&self) -> impl Iterator<Item = (u32, &Format, &ResolvedFormat)> + '_ {
        self.xf_owners.iter().enumerate().map(|(xf, owner)| {
            let (format, resolved) = &self.formats[owner.0 as usize];
            (xf as u32, format, resolved)
        })
    }

    pub fn fonts(&self) -> impl Iterator<Item = (u32, &FontStyle)> + '_ {
        self.fonts.iter().map(|(font, &index)| (index, font))
    }

    pub fn borders(&self) -> impl Iterator<Item = (u32, &BorderStyle)> + '_ {
        self.borders.iter().map(|(border, &index)| (index, border))
    }

    /// Normalized fills, including the two reserved records
    pub fn fills(&self) -> impl Iterator<Item = (u32, &FillStyle)> + '_ {
        self.fills.iter().map(|(fill, &index)| (index, fill))
    }

    /// Custom number formats as `(id, code)`
    pub fn num_formats(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.num_formats
            .iter()
            .map(|(code, &index)| (index, code.as_str()))
    }
}

/// Look `key` up in `table`, inserting it with index `next` on a miss.
fn intern<K, Q>(table: &mut InternTable<K, u32>, key: &Q, next: u32) -> (u32, bool)
where
    K: Hash + Eq + std::borrow::Borrow<Q>,
    Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
{
    match table.exists(key) {
        Some((_, &index)) => (index, false),
        None => (*table.insert(key.to_owned(), next).value, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLineStyle, Color};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_format_is_xf_zero() {
        let mut interner = FormatInterner::new();
        assert_eq!(interner.xf_index(FormatId::DEFAULT).unwrap(), 0);
        assert_eq!(interner.resolve(None).unwrap(), 0);
        assert_eq!(interner.xf_count(), 1);
    }

    #[test]
    fn test_unknown_format() {
        let mut interner = FormatInterner::new();
        assert!(matches!(
            interner.xf_index(FormatId(42)),
            Err(Error::UnknownFormat(42))
        ));
    }

    #[test]
    fn test_equal_content_shares_xf() {
        let mut interner = FormatInterner::new();
        let a = interner.register(Format::new().bold(true));
        let b = interner.register(Format::new().bold(true));
        let c = interner.register(Format::new().italic(true));

        assert_eq!(interner.xf_index(a).unwrap(), 1);
        assert_eq!(interner.xf_index(b).unwrap(), 1);
        assert_eq!(interner.xf_index(c).unwrap(), 2);
        assert_eq!(interner.xf_count(), 3);
    }

    #[test]
    fn test_xf_follows_first_use() {
        let mut interner = FormatInterner::new();
        let first = interner.register(Format::new().bold(true));
        let second = interner.register(Format::new().italic(true));

        assert_eq!(interner.xf_index(second).unwrap(), 1);
        assert_eq!(interner.xf_index(first).unwrap(), 2);
    }

    #[test]
    fn test_unused_format_gets_no_records() {
        let mut interner = FormatInterner::new();
        let unused = interner.register(Format::new().font_name("Arial"));
        interner.prepare();
        assert_eq!(interner.resolved(unused).unwrap().xf_index, None);
        assert_eq!(interner.font_count(), 1);
    }

    #[test]
    fn test_prepare_assigns_sub_records() {
        let mut interner = FormatInterner::new();
        let bold = interner.register(Format::new().bold(true));
        let bordered = interner
            .register(Format::new().border(BorderStyle::all(BorderLineStyle::Thin, Color::BLACK)));
        interner.xf_index(bold).unwrap();
        interner.xf_index(bordered).unwrap();
        interner.prepare();

        let bold = *interner.resolved(bold).unwrap();
        assert_eq!(bold.font_index, 1);
        assert!(bold.has_font);
        assert_eq!(bold.border_index, 0);
        assert!(!bold.has_border);
        assert_eq!(bold.fill_index, 0);

        let bordered = *interner.resolved(bordered).unwrap();
        assert_eq!(bordered.font_index, 0);
        assert!(!bordered.has_font);
        assert_eq!(bordered.border_index, 1);
        assert!(bordered.has_border);

        assert_eq!(interner.font_count(), 2);
        assert_eq!(interner.border_count(), 2);
        assert_eq!(interner.fill_count(), 2);
    }

    #[test]
    fn test_duplicate_content_copies_owner_indices() {
        let mut interner = FormatInterner::new();
        let a = interner.register(Format::new().fill_color(Color::RED).bold(true));
        let b = interner.register(Format::new().fill_color(Color::RED).bold(true));
        interner.xf_index(a).unwrap();
        interner.xf_index(b).unwrap();
        interner.prepare();

        let ra = *interner.resolved(a).unwrap();
        let rb = *interner.resolved(b).unwrap();
        assert!(ra.has_font && ra.has_fill);
        assert_eq!(rb.xf_index, ra.xf_index);
        assert_eq!(rb.font_index, ra.font_index);
        assert_eq!(rb.fill_index, 2);
        assert!(!rb.has_font && !rb.has_fill && !rb.has_border && !rb.has_num_format);
    }

    #[test]
    fn test_custom_number_formats_from_164() {
        let mut interner = FormatInterner::new();
        let ids: Vec<_> = ["0.000", "#,##0.0000", "0.000", "0.00"]
            .into_iter()
            .enumerate()
            .map(|(i, code)| interner.register(Format::new().number_format(code).italic(i == 2)))
            .collect();
        for &id in &ids {
            interner.xf_index(id).unwrap();
        }
        interner.prepare();

        let index = |i: usize| interner.resolved(ids[i]).unwrap().num_format_index;
        assert_eq!(index(0), 164);
        assert_eq!(index(1), 165);
        assert_eq!(index(2), 164);
        assert!(!interner.resolved(ids[2]).unwrap().has_num_format);
        // "0.00" is built-in format 2
        assert_eq!(index(3), 2);
        assert!(!interner.resolved(ids[3]).unwrap().has_num_format);

        let codes: Vec<_> = interner.num_formats().collect();
        assert_eq!(codes, vec![(164, "0.000"), (165, "#,##0.0000")]);
    }

    #[test]
    fn test_background_only_fill_matches_solid_fill() {
        let mut interner = FormatInterner::new();
        let bg = interner.register(Format::new().bg_color(Color::RED));
        let solid = interner.register(Format::new().fill_color(Color::RED));
        interner.xf_index(bg).unwrap();
        interner.xf_index(solid).unwrap();
        interner.prepare();

        assert_ne!(
            interner.resolved(bg).unwrap().xf_index,
            interner.resolved(solid).unwrap().xf_index
        );
        assert_eq!(interner.resolved(bg).unwrap().fill_index, 2);
        assert_eq!(interner.resolved(solid).unwrap().fill_index, 2);
        assert!(!interner.resolved(solid).unwrap().has_fill);
        assert_eq!(interner.fill_count(), 3);
    }

    #[test]
    fn test_prepare_is_incremental() {
        let mut interner = FormatInterner::new();
        let a = interner.register(Format::new().bold(true));
        interner.xf_index(a).unwrap();
        interner.prepare();
        let before = *interner.resolved(a).unwrap();

        let b = interner.register(Format::new().italic(true));
        interner.xf_index(b).unwrap();
        interner.prepare();
        interner.prepare();

        assert_eq!(*interner.resolved(a).unwrap(), before);
        assert_eq!(interner.resolved(b).unwrap().font_index, 2);
        assert_eq!(interner.font_count(), 3);
    }
}
