//! Download flow: exports what is currently rendered.
//!
//! Images are fetched again from the server and written as-is; the summary
//! is re-derived from the rendered statistic tables. Every path restores the
//! triggering control before returning.

use crate::core::{AnalysisKind, ArtifactFormat};
use crate::error::{DashError, DashResult};
use crate::render::{ResultCards, SummaryCard};
use crate::services::control::ControlState;
use crate::services::transport::{Transport, TransportFuture};
use chrono::NaiveDate;
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const SUMMARY_CSV_HEADER: &str = "Column,Statistic,Value";

/// `YYYY-MM-DD` stamp used in download file names
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Keep column names from escaping the download directory
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// File name for an artifact of `kind` plotted over `columns`
pub fn artifact_filename(kind: AnalysisKind, columns: &[String], date: NaiveDate) -> String {
    let stamp = date_stamp(date);
    let column = |i: usize| columns.get(i).map(|c| file_safe(c)).unwrap_or_default();
    let stem = match kind {
        AnalysisKind::Summary => "summary_statistics".to_string(),
        AnalysisKind::Correlation => "correlation_matrix".to_string(),
        AnalysisKind::Histogram => format!("histogram_{}", column(0)),
        AnalysisKind::Scatter => format!("scatter_{}_vs_{}", column(0), column(1)),
    };
    format!("{stem}_{stamp}.{}", kind.artifact_format())
}

/// CSV text of the rendered summary: a bare header, then one fully quoted
/// `Column,Statistic,Value` row per statistic
pub fn summary_csv(card: &SummaryCard) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for table in &card.tables {
        for (statistic, value) in &table.rows {
            writer.write_record([table.column.as_str(), statistic.as_str(), value.as_str()])?;
        }
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let body = String::from_utf8(bytes)?;
    Ok(format!("{SUMMARY_CSV_HEADER}\n{body}"))
}

/// Write an artifact into `dir`, creating it if needed
pub fn save_artifact(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTicket {
    pub kind: AnalysisKind,
    pub filename: String,
}

/// An image download whose bytes are still being fetched
pub struct PendingDownload {
    pub ticket: DownloadTicket,
    pub bytes: TransportFuture<Vec<u8>>,
}

/// Result of triggering a download
pub enum DownloadStart {
    /// Written synchronously
    Saved(PathBuf),
    /// Waiting for the image fetch
    Pending(PendingDownload),
}

pub struct DownloadFlow {
    controls: [ControlState; 4],
    dir: PathBuf,
}

impl DownloadFlow {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            controls: AnalysisKind::ALL.map(|_| ControlState::new("Download", "Downloading...")),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn control(&self, kind: AnalysisKind) -> &ControlState {
        &self.controls[kind.index()]
    }

    /// Start a download of the `kind` card
    ///
    /// `Ok(None)` means the control is busy and the trigger was ignored.
    pub fn begin(
        &mut self,
        kind: AnalysisKind,
        has_session: bool,
        cards: &ResultCards,
        transport: &dyn Transport,
        today: NaiveDate,
    ) -> DashResult<Option<DownloadStart>> {
        if !self.controls[kind.index()].begin() {
            debug!("{kind} download ignored: already downloading");
            return Ok(None);
        }
        let started = self.start(kind, has_session, cards, transport, today);
        if !matches!(started, Ok(DownloadStart::Pending(_))) {
            self.controls[kind.index()].restore();
        }
        started.map(Some)
    }

    fn start(
        &self,
        kind: AnalysisKind,
        has_session: bool,
        cards: &ResultCards,
        transport: &dyn Transport,
        today: NaiveDate,
    ) -> DashResult<DownloadStart> {
        if !has_session {
            return Err(DashError::not_found("No data available to download"));
        }
        if kind.artifact_format() == ArtifactFormat::Csv {
            let card = cards
                .summary()
                .ok_or_else(|| DashError::not_found("No summary data found to download"))?;
            let filename = artifact_filename(kind, &[], today);
            let path = summary_csv(card)
                .and_then(|csv| Ok(save_artifact(&self.dir, &filename, csv.as_bytes())?))
                .map_err(|e| {
                    error!("Writing {filename} failed: {e:?}");
                    DashError::transport("Failed to save summary statistics")
                })?;
            info!("Saved {}", path.display());
            return Ok(DownloadStart::Saved(path));
        }

        let image = cards
            .image(kind)
            .ok_or_else(|| DashError::not_found("No image found to download"))?;
        let columns = match kind {
            AnalysisKind::Histogram => cards.histogram().map(|c| c.columns.clone()),
            AnalysisKind::Scatter => cards.scatter().map(|c| c.columns.clone()),
            AnalysisKind::Summary | AnalysisKind::Correlation => None,
        }
        .unwrap_or_default();
        let filename = artifact_filename(kind, &columns, today);
        debug!("Fetching {} for {filename}", image.src);
        Ok(DownloadStart::Pending(PendingDownload {
            bytes: transport.fetch_bytes(&image.src),
            ticket: DownloadTicket { kind, filename },
        }))
    }

    /// Write fetched image bytes; restores the control on every path
    pub fn finish(&mut self, ticket: &DownloadTicket, outcome: Result<Vec<u8>>) -> DashResult<PathBuf> {
        self.controls[ticket.kind.index()].restore();
        let bytes = outcome.map_err(|e| {
            error!("Error downloading image {}: {e:?}", ticket.filename);
            DashError::transport("Failed to download image")
        })?;
        let path = save_artifact(&self.dir, &ticket.filename, &bytes).map_err(|e| {
            error!("Writing {} failed: {e:?}", ticket.filename);
            DashError::transport("Failed to download image")
        })?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SummaryTableView;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_filenames() {
        let cols = vec!["Revenue".to_string(), "Cost/Unit".to_string()];
        assert_eq!(
            artifact_filename(AnalysisKind::Histogram, &cols[..1], date()),
            "histogram_Revenue_2024-03-07.png"
        );
        assert_eq!(
            artifact_filename(AnalysisKind::Scatter, &cols, date()),
            "scatter_Revenue_vs_Cost_Unit_2024-03-07.png"
        );
        assert_eq!(
            artifact_filename(AnalysisKind::Correlation, &[], date()),
            "correlation_matrix_2024-03-07.png"
        );
        assert_eq!(
            artifact_filename(AnalysisKind::Summary, &[], date()),
            "summary_statistics_2024-03-07.csv"
        );
    }

    #[test]
    fn test_filename_extension_follows_artifact_format() {
        let cols = vec!["A".to_string(), "B".to_string()];
        for kind in AnalysisKind::ALL {
            let name = artifact_filename(kind, &cols, date());
            let expected = match kind.artifact_format() {
                ArtifactFormat::Csv => ".csv",
                ArtifactFormat::Png => ".png",
            };
            assert!(name.ends_with(expected), "{kind}: {name}");
        }
        assert_eq!(AnalysisKind::Summary.artifact_format(), ArtifactFormat::Csv);
    }

    #[test]
    fn test_summary_csv_rows_are_quoted() {
        let card = SummaryCard {
            tables: vec![SummaryTableView {
                column: "Revenue".into(),
                rows: vec![
                    ("mean".into(), "1234.5000".into()),
                    ("std".into(), "10.0000".into()),
                ],
            }],
        };
        let csv = summary_csv(&card).unwrap();
        assert_eq!(
            csv,
            "Column,Statistic,Value\n\"Revenue\",\"mean\",\"1234.5000\"\n\"Revenue\",\"std\",\"10.0000\"\n"
        );
    }

    #[test]
    fn test_summary_csv_escapes_quotes() {
        let card = SummaryCard {
            tables: vec![SummaryTableView {
                column: "say \"hi\"".into(),
                rows: vec![("top".into(), "a,b".into())],
            }],
        };
        let csv = summary_csv(&card).unwrap();
        assert!(csv.ends_with("\"say \"\"hi\"\"\",\"top\",\"a,b\"\n"));
    }

    #[test]
    fn test_save_artifact_creates_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");
        let path = save_artifact(&target, "a.png", b"png").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png");
    }
}
