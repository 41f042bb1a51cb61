use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Analysis types offered by the backend
///
/// Serialized as the `analysis_type` value of the `/analyze` contract.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisKind {
    Summary,
    Correlation,
    Histogram,
    Scatter,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Summary,
        AnalysisKind::Correlation,
        AnalysisKind::Histogram,
        AnalysisKind::Scatter,
    ];

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Title shown on controls and result cards
    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Summary Statistics",
            Self::Correlation => "Correlation Matrix",
            Self::Histogram => "Histogram",
            Self::Scatter => "Scatter Plot",
        }
    }

    /// Stable slot index, used for per-kind bookkeeping arrays
    pub fn index(&self) -> usize {
        match self {
            Self::Summary => 0,
            Self::Correlation => 1,
            Self::Histogram => 2,
            Self::Scatter => 3,
        }
    }

    /// Kind of file a download of this result produces
    pub fn artifact_format(&self) -> ArtifactFormat {
        match self {
            Self::Summary => ArtifactFormat::Csv,
            Self::Correlation | Self::Histogram | Self::Scatter => ArtifactFormat::Png,
        }
    }
}

/// File format of a downloaded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ArtifactFormat {
    #[strum(serialize = "png")]
    Png,
    #[strum(serialize = "csv")]
    Csv,
}

/// A file the user picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl UploadFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self { path, file_name }
    }

    /// Lowercased extension taken after the last dot of the file name
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

impl fmt::Display for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name)
    }
}

/// The three column pickers of the analysis section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ColumnSelector {
    Histogram,
    ScatterX,
    ScatterY,
}

impl ColumnSelector {
    pub const ALL: [ColumnSelector; 3] = [
        ColumnSelector::Histogram,
        ColumnSelector::ScatterX,
        ColumnSelector::ScatterY,
    ];

    /// Text of the empty option
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Histogram => "Select a column",
            Self::ScatterX => "Select X column",
            Self::ScatterY => "Select Y column",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_analysis_kind_conversion() {
        assert_eq!(AnalysisKind::from_str("scatter").unwrap(), AnalysisKind::Scatter);
        assert_eq!(AnalysisKind::Correlation.as_str(), "correlation");
        assert_eq!(AnalysisKind::Histogram.to_string(), "histogram");
        assert!(AnalysisKind::from_str("pie").is_err());
    }

    #[test]
    fn test_analysis_kind_serialization() {
        let json = serde_json::to_string(&AnalysisKind::Summary).unwrap();
        assert_eq!(json, "\"summary\"");
        let kind: AnalysisKind = serde_json::from_str("\"histogram\"").unwrap();
        assert_eq!(kind, AnalysisKind::Histogram);
    }

    #[test]
    fn test_indices_are_distinct() {
        let mut seen = [false; 4];
        for kind in AnalysisKind::ALL {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
    }

    #[test]
    fn test_upload_file_extension() {
        let file = UploadFile::from_path("/tmp/Report.Final.XLSX");
        assert_eq!(file.file_name, "Report.Final.XLSX");
        assert_eq!(file.extension().as_deref(), Some("xlsx"));
        assert_eq!(UploadFile::from_path("/tmp/README").extension(), None);
    }
}
