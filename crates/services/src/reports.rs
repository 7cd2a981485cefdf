use std::path::{Path, PathBuf};

use crate::api::{BackendClient, ReportTicket};
use crate::error::ReportError;

/// File name for a downloaded report. The id must stay inside one path
/// component.
///
/// # Errors
///
/// Returns `ReportError::InvalidReportId` for an empty id or one containing
/// a path separator or `..`.
pub fn report_file_name(report_id: &str) -> Result<String, ReportError> {
    if report_id.trim().is_empty()
        || report_id.contains(['/', '\\'])
        || report_id.contains("..")
    {
        return Err(ReportError::InvalidReportId(report_id.to_string()));
    }
    Ok(format!("cognitive-assessment-report-{report_id}.pdf"))
}

/// Request and fetch PDF reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    client: BackendClient,
}

impl ReportService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ReportError::Api` when the backend call fails.
    pub async fn generate(&self, report_type: &str) -> Result<ReportTicket, ReportError> {
        let ticket = self.client.generate_report(report_type).await?;
        tracing::info!(
            target: "reports",
            report_type,
            report_id = ticket.report_id.as_deref().unwrap_or("-"),
            "report_generated"
        );
        Ok(ticket)
    }

    /// Download report `report_id` into `dir`, returning the written path.
    ///
    /// # Errors
    ///
    /// `ReportError::InvalidReportId` before any request for an id that is not
    /// a plain file name, `ReportError::Api` on a failed download,
    /// `ReportError::Io` if the file cannot be written.
    pub async fn download(&self, report_id: &str, dir: &Path) -> Result<PathBuf, ReportError> {
        let file_name = report_file_name(report_id)?;
        let bytes = self.client.download_report(Some(report_id)).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(
            target: "reports",
            report_id,
            bytes = bytes.len(),
            path = %path.display(),
            "report_downloaded"
        );
        Ok(path)
    }

    /// Generate a report and immediately download it.
    ///
    /// # Errors
    ///
    /// `ReportError::MissingReportId` when the backend does not name the new
    /// report, otherwise as [`generate`](Self::generate) and
    /// [`download`](Self::download).
    pub async fn generate_and_download(
        &self,
        report_type: &str,
        dir: &Path,
    ) -> Result<PathBuf, ReportError> {
        let ticket = self.generate(report_type).await?;
        let id = ticket.report_id.ok_or(ReportError::MissingReportId)?;
        self.download(&id, dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_carries_id() {
        assert_eq!(
            report_file_name("42").unwrap(),
            "cognitive-assessment-report-42.pdf"
        );
    }

    #[test]
    fn ids_that_leave_the_directory_are_rejected() {
        for id in ["a/b", "..", "..\\x", "", "  "] {
            assert!(
                matches!(report_file_name(id), Err(ReportError::InvalidReportId(_))),
                "{id:?} accepted"
            );
        }
    }
}
