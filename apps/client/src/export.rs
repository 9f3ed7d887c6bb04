//! Export: lays out the plan, encodes it and writes the PDF to disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::layout::{render_report, Document};
use crate::models::MealPlan;

/// Encodes `document` and writes it to `path`, creating parent directories.
pub fn write_report(document: &Document, path: &Path) -> Result<PathBuf, AppError> {
    let bytes = document.to_pdf_bytes()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        pages = document.page_count(),
        bytes = bytes.len(),
        "Meal plan exported"
    );
    Ok(path.to_path_buf())
}

/// Lays out and writes the report off the async executor.
///
/// Returns the written path and the document, whose `issues` list every field
/// that was printed as a placeholder.
pub async fn export_plan(plan: MealPlan, path: PathBuf) -> Result<(PathBuf, Document), AppError> {
    // CPU-bound layout and encoding: spawn_blocking keeps the runtime free.
    tokio::task::spawn_blocking(move || {
        let document = render_report(&plan);
        let written = write_report(&document, &path)?;
        Ok((written, document))
    })
    .await
    .map_err(|e| AppError::Render(format!("spawn_blocking failed in export: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render_report_at;
    use crate::layout::default_page_config;
    use crate::test_support::sample_plan;
    use chrono::NaiveDate;

    #[test]
    fn test_write_report_creates_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("informes").join("plan_semanal.pdf");
        let generated_at = NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let document = render_report_at(&sample_plan(), generated_at, &default_page_config());

        let written = write_report(&document, &path).unwrap();
        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_write_report_below_a_regular_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot act as a parent directory.
        let blocker = dir.path().join("archivo");
        std::fs::write(&blocker, b"x").unwrap();
        let document = render_report(&sample_plan());

        let err = write_report(&document, &blocker.join("plan.pdf")).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[tokio::test]
    async fn test_export_plan_runs_layout_off_executor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan_semanal.pdf");
        let (written, document) = export_plan(sample_plan(), path.clone()).await.unwrap();
        assert_eq!(written, path);
        assert_eq!(document.day_titles().len(), 7);
        assert!(path.exists());
    }
}
