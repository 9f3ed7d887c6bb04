//! Static font-metric tables for the two PDF base fonts the report uses.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Helvetica and Helvetica-Bold AFM files. All tables cover ASCII 0x20..=0x7E
//! (95 printable characters), index = (char as usize) - 32. The few non-ASCII
//! characters the Spanish strings use get explicit widths; anything else falls
//! back to `average_char_width`.
//!
//! This module also holds the page geometry (`PageConfig`), since every
//! measurement the layout pass makes combines the two.

/// Points → millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    HelveticaBold,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry and typography of the exported report. All lengths in millimetres,
/// all vertical positions measured from the top edge of the page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    /// Top of the title line on the first page.
    pub title_top_mm: f32,
    /// Where the first day starts on the first page (below title and timestamp).
    pub content_top_mm: f32,
    /// Cursor position after a page break.
    pub top_margin_mm: f32,
    /// A day boundary whose cursor lies within this distance of the page bottom
    /// forces a page break.
    pub break_threshold_mm: f32,
    /// Nothing but the footer is placed below `page_height_mm - bottom_margin_mm`.
    pub bottom_margin_mm: f32,
    /// Top of the page-number footer, measured up from the page bottom.
    pub footer_offset_mm: f32,

    pub title_size_pt: f32,
    pub timestamp_size_pt: f32,
    pub day_title_size_pt: f32,
    pub summary_size_pt: f32,
    pub table_size_pt: f32,
    pub weekly_total_size_pt: f32,
    pub footer_size_pt: f32,
    /// Line box height as a multiple of the font size.
    pub line_spacing: f32,
    /// Extra space below free-standing text lines.
    pub paragraph_gap_mm: f32,

    pub cell_padding_mm: f32,
    /// Gap below every table.
    pub table_spacing_mm: f32,
    /// Space consumed by the separator drawn between days.
    pub separator_spacing_mm: f32,
    /// Fixed width of the macro table's label column.
    pub macro_label_width_mm: f32,
    /// Fixed width of the meals table's meal-name column.
    pub meal_name_width_mm: f32,
    /// Joins the formatted items of one meal inside its table cell.
    pub item_separator: String,
}

impl PageConfig {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// Lowest y any content may reach.
    pub fn content_bottom_mm(&self) -> f32 {
        self.page_height_mm - self.bottom_margin_mm
    }

    /// Height available to content on a page that starts at the top margin.
    pub fn usable_height_mm(&self) -> f32 {
        self.content_bottom_mm() - self.top_margin_mm
    }

    pub fn line_height_mm(&self, size_pt: f32) -> f32 {
        size_pt * PT_TO_MM * self.line_spacing
    }

    /// Cursor advance for a free-standing text line.
    pub fn text_advance_mm(&self, size_pt: f32) -> f32 {
        self.line_height_mm(size_pt) + self.paragraph_gap_mm
    }
}

/// A4 portrait with 14 mm side margins and Helvetica 9 pt tables.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_left_mm: 14.0,
        margin_right_mm: 14.0,
        title_top_mm: 14.0,
        content_top_mm: 32.0,
        top_margin_mm: 20.0,
        break_threshold_mm: 40.0,
        bottom_margin_mm: 18.0,
        footer_offset_mm: 12.0,
        title_size_pt: 16.0,
        timestamp_size_pt: 9.0,
        day_title_size_pt: 13.0,
        summary_size_pt: 10.0,
        table_size_pt: 9.0,
        weekly_total_size_pt: 12.0,
        footer_size_pt: 8.0,
        line_spacing: 1.15,
        paragraph_gap_mm: 1.5,
        cell_padding_mm: 1.6,
        table_spacing_mm: 4.0,
        separator_spacing_mm: 5.0,
        macro_label_width_mm: 60.0,
        meal_name_width_mm: 40.0,
        item_separator: ", ".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em units.
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback width for characters without an entry.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '—' => 1.0,
            '–' => 0.556,
            'í' | 'ì' | 'Í' => 0.278,
            'ñ' | 'á' | 'é' | 'ó' | 'ú' | 'ü' => self.widths['n' as usize - 32],
            'Á' | 'É' | 'Ó' | 'Ú' | 'Ñ' => 0.722,
            _ => self.average_char_width,
        }
    }

    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width of a string in millimetres at `size_pt`.
    pub fn width_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt * PT_TO_MM
    }

    pub fn space_width_mm(&self, size_pt: f32) -> f32 {
        self.space_width * size_pt * PT_TO_MM
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given font.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
