//! The laid-out report: pages of positioned elements, independent of any PDF
//! library. Coordinates are millimetres from the top-left corner of the page.

use crate::models::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);
    pub const SKY: RgbColor = RgbColor(14, 165, 233);
    pub const TEAL: RgbColor = RgbColor(20, 184, 166);
    pub const STRIPE: RgbColor = RgbColor(245, 245, 245);
    pub const GRID: RgbColor = RgbColor(210, 214, 220);
    pub const MUTED: RgbColor = RgbColor(100, 116, 139);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Timestamp,
    DayTitle,
    DaySummary,
    WeeklyTotal,
    Footer,
}

/// A single line of text. `y` is the top of its line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub role: TextRole,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub size_pt: f32,
    pub bold: bool,
    pub color: RgbColor,
}

impl TextBlock {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Macros,
    Meals,
}

/// One table row; `cells[i]` holds the wrapped lines of column `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub cells: Vec<Vec<String>>,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTable {
    pub kind: TableKind,
    pub x: f32,
    pub y: f32,
    pub column_widths: Vec<f32>,
    pub header: PlacedRow,
    pub rows: Vec<PlacedRow>,
    pub header_fill: RgbColor,
    pub size_pt: f32,
    pub cell_padding: f32,
    pub line_height: f32,
}

impl PlacedTable {
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn height(&self) -> f32 {
        self.header.height + self.rows.iter().map(|r| r.height).sum::<f32>()
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height()
    }

    /// First column of every body row, unwrapped.
    pub fn row_labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.cells.first().map(|c| c.join(" ")).unwrap_or_default())
            .collect()
    }
}

/// Horizontal separator line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextBlock),
    Table(PlacedTable),
    Rule(Rule),
}

impl Element {
    /// Top and bottom edge of the element.
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self {
            Element::Text(t) => (t.y, t.bottom()),
            Element::Table(t) => (t.y, t.bottom()),
            Element::Rule(r) => (r.y, r.y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// One-based.
    pub number: usize,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self { number, elements: Vec::new() }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &PlacedTable> {
        self.elements.iter().filter_map(|e| match e {
            Element::Table(t) => Some(t),
            _ => None,
        })
    }
}

/// A field the report could not fill from the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    MissingTotalKcal,
    MissingMacros,
    MissingMacro(&'static str),
    MissingMeals,
    /// The day is taller than the space it starts in (a fresh page, or the
    /// space below the header for the first day); it overflows into the bottom margin.
    OversizedDay { height_mm: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderIssue {
    pub day: Weekday,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<Page>,
    pub issues: Vec<RenderIssue>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text block with the number of the page it sits on, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &TextBlock)> {
        self.pages
            .iter()
            .flat_map(|p| p.texts().map(move |t| (p.number, t)))
    }

    pub fn texts_with_role(&self, role: TextRole) -> Vec<(usize, &TextBlock)> {
        self.texts().filter(|(_, t)| t.role == role).collect()
    }

    /// Day titles in drawing order.
    pub fn day_titles(&self) -> Vec<&str> {
        self.texts_with_role(TextRole::DayTitle)
            .into_iter()
            .map(|(_, t)| t.text.as_str())
            .collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = (usize, &PlacedTable)> {
        self.pages
            .iter()
            .flat_map(|p| p.tables().map(move |t| (p.number, t)))
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
