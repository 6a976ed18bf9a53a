//! Sheet data encoding
//!
//! Both storage modes hand their rows to [`write_row`], so a sheet produces
//! the same `<row>`/`<c>` bytes whether it was written in random-access or
//! constant-memory mode.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::cell::{write_cell_ref, CellData, CellValue};
use crate::hyperlink::DisplayText;
use crate::row::RowOptions;

/// Escape `&`, `<` and `>` in element text
pub fn escape_data(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

/// Escape element text plus `"` and newlines for attribute values
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    escape(text, true)
}

fn escape(text: &str, attr: bool) -> Cow<'_, str> {
    let special = |c: char| matches!(c, '&' | '<' | '>') || (attr && matches!(c, '"' | '\n'));
    if !text.contains(special) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            '\n' if attr => out.push_str("&#xA;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Append one `<row>` element with its cells to `out`.
///
/// Cells must be supplied in ascending column order.
pub fn write_row<'a, I>(
    out: &mut String,
    row_num: u32,
    options: &RowOptions,
    xf_index: Option<u32>,
    cells: I,
) where
    I: IntoIterator<Item = (u16, &'a CellData)>,
{
    let _ = write!(out, r#"<row r="{}""#, row_num + 1);
    if let Some(xf) = xf_index {
        let _ = write!(out, r#" s="{xf}" customFormat="1""#);
    }
    if let Some(height) = options.height {
        let _ = write!(out, r#" ht="{height}" customHeight="1""#);
    }
    if options.hidden {
        out.push_str(r#" hidden="1""#);
    }
    if options.outline_level > 0 {
        let _ = write!(out, r#" outlineLevel="{}""#, options.outline_level);
    }
    if options.collapsed {
        out.push_str(r#" collapsed="1""#);
    }

    let mut cells = cells.into_iter().peekable();
    if cells.peek().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for (col, cell) in cells {
        write_cell(out, row_num, col, cell);
    }
    out.push_str("</row>");
}

fn write_cell(out: &mut String, row: u32, col: u16, cell: &CellData) {
    out.push_str(r#"<c r=""#);
    write_cell_ref(out, row, col);
    out.push('"');
    if cell.xf_index != 0 {
        let _ = write!(out, r#" s="{}""#, cell.xf_index);
    }

    match &cell.value {
        CellValue::Number(n) => {
            let _ = write!(out, "><v>{n}</v></c>");
        }
        CellValue::SharedString(index) => write_shared(out, *index),
        CellValue::InlineString(text) => write_inline(out, text),
        CellValue::Formula { formula, result } => {
            let _ = write!(out, "><f>{}</f><v>{result}</v></c>", escape_data(formula));
        }
        CellValue::ArrayFormula {
            formula,
            range,
            result,
        } => {
            let _ = write!(
                out,
                r#"><f t="array" ref="{range}">{}</f><v>{result}</v></c>"#,
                escape_data(formula)
            );
        }
        CellValue::Blank => out.push_str("/>"),
        CellValue::Boolean(b) => {
            let _ = write!(out, r#" t="b"><v>{}</v></c>"#, u8::from(*b));
        }
        CellValue::Hyperlink(link) => match &link.display {
            DisplayText::Shared(index) => write_shared(out, *index),
            DisplayText::Inline(text) => write_inline(out, text),
        },
    }
}

fn write_shared(out: &mut String, index: u32) {
    let _ = write!(out, r#" t="s"><v>{index}</v></c>"#);
}

fn write_inline(out: &mut String, text: &str) {
    let preserve = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    out.push_str(r#" t="inlineStr"><is><t"#);
    if preserve {
        out.push_str(r#" xml:space="preserve""#);
    }
    let _ = write!(out, ">{}</t></is></c>", escape_data(text));
}
