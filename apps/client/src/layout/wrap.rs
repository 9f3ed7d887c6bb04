//! Greedy line wrapping against the static font metrics.
//!
//! Widths are accumulated word by word; a word that does not fit on the current
//! line opens a new one. A single word wider than the whole line is split
//! between characters so no text ever overflows its cell.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_mm` at `size_pt`.
///
/// Always returns at least one line; empty input yields one empty line so that
/// an empty cell still occupies a row.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let space_w = metrics.space_width_mm(size_pt);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let word_w = metrics.width_mm(word, size_pt);

        if word_w > max_width_mm {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = split_word(word, metrics, size_pt, max_width_mm);
            // The tail of an over-long word keeps accepting the words after it.
            let tail = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = metrics.width_mm(&tail, size_pt);
            current = tail;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_mm {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    lines.push(current);
    lines
}

/// Breaks one word into chunks that each fit `max_width_mm`.
fn split_word(word: &str, metrics: &FontMetricTable, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = metrics.width_mm(c.encode_utf8(&mut buf), size_pt);
        // A chunk always takes at least one character.
        if !piece.is_empty() && width + char_w > max_width_mm {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += char_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
