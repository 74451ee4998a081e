use std::ops::Range;

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::{debug, warn};

use regdesk_core::ServiceError;

use super::row_cells;
use crate::model::{Faculty, Registration};

const TITLE: &str = "Student Registrations";
const HEADERS: [&str; 9] = [
    "ID", "Name", "Faculty", "Batch", "Gender", "DOB", "Phone", "Email", "Registered",
];

// A4 landscape. All vertical positions below are measured from the top edge.
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN: f32 = 14.0;
const COL_WIDTHS: [f32; 9] = [18.0, 42.0, 46.0, 20.0, 16.0, 20.0, 28.0, 50.0, 29.0];

const ROW_H: f32 = 6.0;
const FONT_SIZE: f32 = 8.0;
const CELL_PAD: f32 = 1.5;
/// Millimetres per point.
const PT_MM: f32 = 0.3528;

/// Helvetica advance widths for `' '..='~'`, in 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for `' '..='~'`, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Upper bound for glyphs outside the ASCII tables; no WinAnsi glyph is wider.
const WIDE_GLYPH: u16 = 1000;
const ELLIPSIS: char = '\u{2026}';

const TABLE_TOP_FIRST: f32 = 36.0;
const TABLE_TOP_FILTERED: f32 = 44.0;
const TABLE_TOP_NEXT: f32 = MARGIN;
const TABLE_BOTTOM: f32 = 190.0;
const FOOTER_Y: f32 = 200.0;

fn rows_fitting(top: f32) -> usize {
    // One row height goes to the repeated header.
    ((TABLE_BOTTOM - top - ROW_H) / ROW_H).floor() as usize
}

/// Split `rows` table rows into per-page ranges.
///
/// Always at least one page; ranges are contiguous and cover every row.
pub(crate) fn layout(rows: usize, filtered: bool) -> Vec<Range<usize>> {
    let first = rows_fitting(if filtered { TABLE_TOP_FILTERED } else { TABLE_TOP_FIRST });
    let next = rows_fitting(TABLE_TOP_NEXT);

    let mut pages = vec![0..rows.min(first)];
    let mut start = rows.min(first);
    while start < rows {
        let end = (start + next).min(rows);
        pages.push(start..end);
        start = end;
    }
    pages
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn advance(self, c: char) -> u32 {
        let table = match self {
            Face::Regular => &HELVETICA,
            Face::Bold => &HELVETICA_BOLD,
        };
        let w = match c {
            ' '..='~' => table[c as usize - 0x20],
            _ => WIDE_GLYPH,
        };
        u32::from(w)
    }

    /// Width of `text` in 1/1000 em.
    fn units(self, text: &str) -> u32 {
        text.chars().map(|c| self.advance(c)).sum()
    }
}

/// Width in mm of `text` set at [`FONT_SIZE`].
fn text_width(text: &str, face: Face) -> f32 {
    face.units(text) as f32 / 1000.0 * FONT_SIZE * PT_MM
}

/// Truncate `text` to fit a column `width` mm wide, marking the cut with
/// an ellipsis. Empty when not even the ellipsis fits.
fn fit_cell(text: &str, width: f32, face: Face) -> String {
    let avail = ((width - 2.0 * CELL_PAD) / (FONT_SIZE * PT_MM) * 1000.0).max(0.0) as u32;
    if face.units(text) <= avail {
        return text.to_string();
    }
    let Some(budget) = avail.checked_sub(face.advance(ELLIPSIS)) else {
        return String::new();
    };

    let mut used = 0;
    let mut cut: String = text
        .chars()
        .take_while(|&c| {
            used += face.advance(c);
            used <= budget
        })
        .collect();
    cut.push(ELLIPSIS);
    cut
}

/// Whether WinAnsiEncoding, used by the built-in PDF fonts, can encode `c`.
fn win_ansi(c: char) -> bool {
    matches!(
        c,
        ' '..='~'
            | '\u{A0}'..='\u{FF}'
            // The 0x80..=0x9F block.
            | '\u{20AC}' | '\u{201A}' | '\u{0192}' | '\u{201E}' | '\u{2026}' | '\u{2020}'
            | '\u{2021}' | '\u{02C6}' | '\u{2030}' | '\u{0160}' | '\u{2039}' | '\u{0152}'
            | '\u{017D}' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2022}'
            | '\u{2013}' | '\u{2014}' | '\u{02DC}' | '\u{2122}' | '\u{0161}' | '\u{203A}'
            | '\u{0153}' | '\u{017E}' | '\u{0178}'
    )
}

/// Replace characters the built-in fonts cannot draw with `?`, returning the
/// text and the number of replacements. printpdf drops them silently.
fn to_win_ansi(text: &str) -> (String, usize) {
    let mut replaced = 0;
    let out = text
        .chars()
        .map(|c| {
            if win_ansi(c) {
                c
            } else {
                replaced += 1;
                '?'
            }
        })
        .collect();
    (out, replaced)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render the paginated registrations table.
///
/// `generated_at` is stamped in the header; `faculty` is the active filter,
/// if any.
pub fn render_pdf(
    records: &[Registration],
    faculty: Option<Faculty>,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ServiceError> {
    let pdf_err =
        |e: printpdf::Error| ServiceError::Internal(format!("pdf rendering failed: {e:?}"));

    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
    };

    let pages = layout(records.len(), faculty.is_some());
    let total = pages.len();
    let mut replaced_rows = 0;

    for (index, range) in pages.into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            doc.get_page(p).get_layer(l)
        };

        let top = if index == 0 {
            draw_heading(&layer, &fonts, faculty, generated_at)
        } else {
            TABLE_TOP_NEXT
        };

        draw_row(&layer, &fonts.bold, Face::Bold, top, HEADERS.map(String::from));
        for (i, record) in records[range].iter().enumerate() {
            let mut replaced = 0;
            let cells = row_cells(record, "%Y-%m-%d %H:%M").map(|cell| {
                let (cell, n) = to_win_ansi(&cell);
                replaced += n;
                cell
            });
            if replaced > 0 {
                replaced_rows += 1;
                debug!(id = %record.registration_id, replaced, "unencodable characters in row");
            }
            let y = top + ROW_H * (i + 1) as f32;
            draw_row(&layer, &fonts.regular, Face::Regular, y, cells);
        }

        text(
            &layer,
            &fonts.regular,
            format!("Page {} of {}", index + 1, total),
            FONT_SIZE,
            PAGE_W - MARGIN - 22.0,
            FOOTER_Y,
        );
    }

    if replaced_rows > 0 {
        warn!(
            rows = replaced_rows,
            "pdf export replaced characters the built-in font cannot draw"
        );
    }
    doc.save_to_bytes().map_err(pdf_err)
}

/// Title block of the first page. Returns where the table starts.
fn draw_heading(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    faculty: Option<Faculty>,
    generated_at: DateTime<Utc>,
) -> f32 {
    text(layer, &fonts.bold, TITLE, 18.0, MARGIN, 22.0);
    text(
        layer,
        &fonts.regular,
        format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M")),
        10.0,
        MARGIN,
        29.0,
    );
    match faculty {
        Some(f) => {
            text(layer, &fonts.regular, format!("Faculty: {f}"), 10.0, MARGIN, 36.0);
            TABLE_TOP_FILTERED
        }
        None => TABLE_TOP_FIRST,
    }
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    face: Face,
    top: f32,
    cells: [String; 9],
) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COL_WIDTHS) {
        let cell = fit_cell(cell, width, face);
        // Baseline sits a little above the bottom of the row.
        text(layer, font, cell, FONT_SIZE, x + CELL_PAD, top + ROW_H - 1.8);
        x += width;
    }
}

/// Place text with `y` measured from the top edge.
fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    s: impl Into<String>,
    size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(s, size, Mm(x), Mm(PAGE_H - y), font);
}
