//! Table measurement: wraps every cell to its column and sizes each row to its
//! tallest cell.

use crate::layout::document::{PlacedRow, PlacedTable, RgbColor, TableKind};
use crate::layout::font_metrics::{get_metrics, FontFamily, PageConfig};
use crate::layout::wrap::wrap_text;

/// An unplaced table: header, body rows and column widths.
#[derive(Debug, Clone)]
pub struct TableContent {
    pub kind: TableKind,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_widths: Vec<f32>,
    pub header_fill: RgbColor,
}

impl TableContent {
    /// Two-column table whose first column has a fixed width; the second takes
    /// the rest of the content width.
    pub fn two_column(
        kind: TableKind,
        header: [&str; 2],
        rows: Vec<Vec<String>>,
        first_width: f32,
        header_fill: RgbColor,
        config: &PageConfig,
    ) -> Self {
        let rest = (config.content_width_mm() - first_width).max(0.0);
        Self {
            kind,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
            column_widths: vec![first_width, rest],
            header_fill,
        }
    }

    /// Total height once laid out.
    pub fn measure(&self, config: &PageConfig) -> f32 {
        self.place(0.0, 0.0, config).height()
    }

    /// Lays the table out with its top-left corner at (`x`, `y`).
    pub fn place(&self, x: f32, y: f32, config: &PageConfig) -> PlacedTable {
        let size_pt = config.table_size_pt;
        let padding = config.cell_padding_mm;
        let line_height = config.line_height_mm(size_pt);

        let header = self.layout_row(&self.header, FontFamily::HelveticaBold, config);
        let rows = self
            .rows
            .iter()
            .map(|row| self.layout_row(row, FontFamily::Helvetica, config))
            .collect();

        PlacedTable {
            kind: self.kind,
            x,
            y,
            column_widths: self.column_widths.clone(),
            header,
            rows,
            header_fill: self.header_fill,
            size_pt,
            cell_padding: padding,
            line_height,
        }
    }

    fn layout_row(&self, cells: &[String], font: FontFamily, config: &PageConfig) -> PlacedRow {
        let metrics = get_metrics(&font);
        let size_pt = config.table_size_pt;
        let padding = config.cell_padding_mm;

        let wrapped: Vec<Vec<String>> = self
            .column_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                wrap_text(text, metrics, size_pt, (width - 2.0 * padding).max(1.0))
            })
            .collect();

        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        PlacedRow {
            height: max_lines as f32 * config.line_height_mm(size_pt) + 2.0 * padding,
            cells: wrapped,
        }
    }
}
