//! PDF backend: encodes a laid-out `Document` with the Helvetica base fonts.
//!
//! The layout model measures from the top edge; PDF user space measures from
//! the bottom edge, so every y is flipped against the page height here.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use crate::errors::AppError;
use crate::layout::document::{
    Document as ReportDocument, Element, PlacedTable, RgbColor, Rule as ReportRule, TextBlock,
};
use crate::layout::font_metrics::PT_TO_MM;

/// Text baseline sits this far below the top of the line box, as a share of
/// the font size.
const BASELINE_RATIO: f32 = 0.8;
const GRID_THICKNESS_PT: f32 = 0.3;
const RULE_THICKNESS_PT: f32 = 0.5;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn color(c: RgbColor) -> Color {
    Color::Rgb(Rgb::new(
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0,
        None,
    ))
}

fn render_err(what: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Render(format!("PDF {what} error: {e}"))
}

impl ReportDocument {
    /// Encodes every page into a single PDF file.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, AppError> {
        let width = Mm(self.page_width_mm);
        let height = Mm(self.page_height_mm);
        let (doc, first_page, first_layer) = PdfDocument::new(&self.title, width, height, "Capa 1");

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| render_err("font", e))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| render_err("font", e))?,
        };

        for (i, page) in self.pages.iter().enumerate() {
            let layer = if i == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (p, l) = doc.add_page(width, height, format!("Capa {}", page.number));
                doc.get_page(p).get_layer(l)
            };
            let painter = Painter {
                layer: &layer,
                fonts: &fonts,
                page_height: self.page_height_mm,
            };
            for element in &page.elements {
                match element {
                    Element::Text(text) => painter.text(text),
                    Element::Table(table) => painter.table(table),
                    Element::Rule(rule) => painter.rule(rule),
                }
            }
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf).map_err(|e| render_err("save", e))?;
        buf.into_inner().map_err(|e| render_err("buffer", e))
    }
}

struct Painter<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f32,
}

impl Painter<'_> {
    fn flip(&self, y: f32) -> Mm {
        Mm(self.page_height - y)
    }

    fn put_text(&self, text: &str, x: f32, top: f32, size_pt: f32, bold: bool, fill: RgbColor) {
        if text.is_empty() {
            return;
        }
        let baseline = top + size_pt * PT_TO_MM * BASELINE_RATIO;
        self.layer.set_fill_color(color(fill));
        self.layer
            .use_text(text, size_pt, Mm(x), self.flip(baseline), self.fonts.pick(bold));
    }

    fn text(&self, block: &TextBlock) {
        self.put_text(&block.text, block.x, block.y, block.size_pt, block.bold, block.color);
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) {
        let rect = Rect::new(Mm(x), self.flip(y + h), Mm(x + w), self.flip(y)).with_mode(mode);
        self.layer.add_rect(rect);
    }

    fn rule(&self, rule: &ReportRule) {
        self.layer.set_outline_color(color(RgbColor::GRID));
        self.layer.set_outline_thickness(RULE_THICKNESS_PT);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(rule.x1), self.flip(rule.y)), false),
                (Point::new(Mm(rule.x2), self.flip(rule.y)), false),
            ],
            is_closed: false,
        });
    }

    fn table(&self, table: &PlacedTable) {
        self.layer.set_outline_color(color(RgbColor::GRID));
        self.layer.set_outline_thickness(GRID_THICKNESS_PT);

        let mut y = table.y;
        for (index, row) in std::iter::once(&table.header).chain(&table.rows).enumerate() {
            let is_header = index == 0;
            let (fill, ink) = if is_header {
                (Some(table.header_fill), RgbColor::WHITE)
            } else if index % 2 == 0 {
                (Some(RgbColor::STRIPE), RgbColor::BLACK)
            } else {
                (None, RgbColor::BLACK)
            };

            let mut x = table.x;
            for (col, width) in table.column_widths.iter().enumerate() {
                if let Some(fill) = fill {
                    self.layer.set_fill_color(color(fill));
                    self.rect(x, y, *width, row.height, PaintMode::FillStroke);
                } else {
                    self.rect(x, y, *width, row.height, PaintMode::Stroke);
                }

                let lines = row.cells.get(col).map(Vec::as_slice).unwrap_or(&[]);
                for (n, line) in lines.iter().enumerate() {
                    let top = y + table.cell_padding + n as f32 * table.line_height;
                    self.put_text(line, x + table.cell_padding, top, table.size_pt, is_header, ink);
                }
                x += width;
            }
            y += row.height;
        }
    }
}
