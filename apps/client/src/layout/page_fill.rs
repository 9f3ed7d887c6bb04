//! Page Fill Tracking: the vertical cursor and the page-break decision.
//!
//! Breaks happen only at day boundaries. Two rules, checked in order:
//! - cursor within `break_threshold_mm` of the page bottom → break
//! - the next day, measured in advance, would cross `content_bottom_mm` → break
//!
//! After a break the cursor restarts at `top_margin_mm`.

use crate::layout::font_metrics::PageConfig;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakReason {
    /// The cursor passed the fixed threshold near the page bottom.
    BelowThreshold,
    /// The next block is taller than the space left on the page.
    NextBlockOverflows { needed_mm: f32, remaining_mm: f32 },
}

/// Vertical position on the current page (mm from the top edge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    page_index: usize,
    y: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

impl PageCursor {
    pub fn new(start_y: f32) -> Self {
        Self { page_index: 0, y: start_y }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Zero-based index of the page the cursor is on.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    /// Moves the cursor down to `y`; never moves it up.
    pub fn move_to(&mut self, y: f32) {
        self.y = self.y.max(y);
    }

    /// Space left above the bottom margin.
    pub fn remaining(&self, config: &PageConfig) -> f32 {
        config.content_bottom_mm() - self.y
    }

    pub fn fits(&self, height: f32, config: &PageConfig) -> bool {
        height <= self.remaining(config)
    }

    /// Decides whether a break is due before a block of `next_height` mm.
    pub fn check_break(&self, next_height: f32, config: &PageConfig) -> Option<BreakReason> {
        if self.y >= config.page_height_mm - config.break_threshold_mm {
            return Some(BreakReason::BelowThreshold);
        }
        if !self.fits(next_height, config) {
            return Some(BreakReason::NextBlockOverflows {
                needed_mm: next_height,
                remaining_mm: self.remaining(config),
            });
        }
        None
    }

    /// Starts a new page.
    pub fn break_page(&mut self, config: &PageConfig) {
        self.page_index += 1;
        self.y = config.top_margin_mm;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    #[test]
    fn test_no_break_when_block_fits() {
        let config = default_page_config();
        let cursor = PageCursor::new(40.0);
        assert_eq!(cursor.check_break(80.0, &config), None);
    }

    #[test]
    fn test_break_below_threshold_even_for_tiny_block() {
        let config = default_page_config();
        let cursor = PageCursor::new(config.page_height_mm - config.break_threshold_mm);
        assert_eq!(cursor.check_break(1.0, &config), Some(BreakReason::BelowThreshold));
    }

    #[test]
    fn test_lookahead_break_when_next_block_overflows() {
        let config = default_page_config();
        let cursor = PageCursor::new(150.0);
        // 129 mm left above the bottom margin
        match cursor.check_break(140.0, &config) {
            Some(BreakReason::NextBlockOverflows { needed_mm, remaining_mm }) => {
                assert_eq!(needed_mm, 140.0);
                assert!((remaining_mm - (config.content_bottom_mm() - 150.0)).abs() < 1e-4);
            }
            other => panic!("expected look-ahead break, got {other:?}"),
        }
    }

    #[test]
    fn test_break_page_resets_to_top_margin() {
        let config = default_page_config();
        let mut cursor = PageCursor::new(config.content_top_mm);
        cursor.advance(200.0);
        cursor.break_page(&config);
        assert_eq!(cursor.page_index(), 1);
        assert_eq!(cursor.y(), config.top_margin_mm);
    }

    #[test]
    fn test_move_to_never_moves_up() {
        let mut cursor = PageCursor::new(50.0);
        cursor.move_to(40.0);
        assert_eq!(cursor.y(), 50.0);
        cursor.move_to(65.0);
        assert_eq!(cursor.y(), 65.0);
    }
}
