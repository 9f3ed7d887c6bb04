// Weekly meal-plan report: font metrics, line wrapping, table measurement,
// day-boundary pagination and the PDF backend.
// Layout is CPU-bound and synchronous; async callers run it inside
// tokio::task::spawn_blocking (see export::export_plan).

pub mod document;
pub mod engine;
pub mod font_metrics;
pub mod page_fill;
pub mod pdf;
pub mod table;
pub mod wrap;

// Re-export the public API consumed by export and the binary.
pub use document::{Document, Element, IssueKind, Page, PlacedTable, RenderIssue, TableKind, TextRole};
pub use engine::{render_report, render_report_at, REPORT_TITLE};
pub use font_metrics::{default_page_config, FontFamily, PageConfig};
