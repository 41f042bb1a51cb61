//! Upload flow: file selection, extension check, submission and response
//! intake.

use crate::core::{UploadFile, UploadResponse};
use crate::error::{DashError, DashResult};
use crate::services::control::ControlState;
use crate::services::transport::{Transport, TransportFuture};
use color_eyre::Result;
use tracing::{debug, error, warn};

/// Extensions the backend accepts, compared case-insensitively
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

pub const NO_FILE_LABEL: &str = "Choose a file or drag it here";

/// Reject anything that is not a CSV or Excel file name
pub fn validate_file_name(file_name: &str) -> DashResult<()> {
    let accepted = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    if accepted {
        Ok(())
    } else {
        Err(DashError::validation("Please upload a CSV or Excel file"))
    }
}

/// Identifies one upload submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    pub seq: u64,
}

/// A submitted upload whose response is still outstanding
pub struct PendingUpload {
    pub ticket: UploadTicket,
    pub file: UploadFile,
    pub response: TransportFuture<UploadResponse>,
}

/// An upload the server accepted
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedUpload {
    pub session_id: String,
    pub file: UploadFile,
    pub response: UploadResponse,
}

pub struct UploadFlow {
    selected: Option<UploadFile>,
    control: ControlState,
    seq: u64,
    in_flight: Option<UploadFile>,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadFlow {
    pub fn new() -> Self {
        Self {
            selected: None,
            control: ControlState::new("Upload", "Uploading..."),
            seq: 0,
            in_flight: None,
        }
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.selected = file;
    }

    pub fn selected(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    /// Text of the file picker
    pub fn file_label(&self) -> &str {
        self.selected
            .as_ref()
            .map(|f| f.file_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(NO_FILE_LABEL)
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    /// Validate the selection and submit it
    ///
    /// `Ok(None)` means the control is busy and the trigger was ignored.
    pub fn begin(&mut self, transport: &dyn Transport) -> DashResult<Option<PendingUpload>> {
        if !self.control.is_enabled() {
            debug!("Upload trigger ignored: request outstanding");
            return Ok(None);
        }
        let file = self
            .selected
            .clone()
            .filter(|f| !f.file_name.is_empty())
            .ok_or_else(|| DashError::validation("Please select a file to upload"))?;
        validate_file_name(&file.file_name)?;

        self.control.begin();
        self.seq += 1;
        self.in_flight = Some(file.clone());
        debug!("Upload #{} of {} requesting", self.seq, file.file_name);
        Ok(Some(PendingUpload {
            ticket: UploadTicket { seq: self.seq },
            response: transport.upload(file.clone()),
            file,
        }))
    }

    /// Apply the outcome of a submission
    ///
    /// `Ok(None)` means the response was superseded by a later upload and
    /// must not touch session state.
    pub fn finish(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<UploadResponse>,
    ) -> DashResult<Option<AcceptedUpload>> {
        if ticket.seq != self.seq {
            warn!("Discarding stale upload response #{} (latest #{})", ticket.seq, self.seq);
            return Ok(None);
        }
        self.control.restore();
        let file = self
            .in_flight
            .take()
            .or_else(|| self.selected.clone())
            .unwrap_or_else(|| UploadFile::from_path(""));

        let response = outcome.map_err(|e| {
            error!("Upload of {} failed: {e:?}", file.file_name);
            DashError::transport("An error occurred while uploading the file")
        })?;
        if let Some(message) = response.error.clone() {
            return Err(DashError::Server(message));
        }
        let session_id = response.session_id.clone().ok_or_else(|| {
            error!("Upload response for {} has no session_id", file.file_name);
            DashError::transport("An error occurred while uploading the file")
        })?;
        Ok(Some(AcceptedUpload {
            session_id,
            file,
            response,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        for ok in ["data.csv", "DATA.CSV", "book.xls", "book.XlSx", "a.b.csv"] {
            assert!(validate_file_name(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["data.txt", "data", "csv", "data.csv.gz", "data.xlsm", ".", ""] {
            assert_eq!(
                validate_file_name(bad),
                Err(DashError::validation("Please upload a CSV or Excel file")),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_file_label() {
        let mut flow = UploadFlow::new();
        assert_eq!(flow.file_label(), NO_FILE_LABEL);
        flow.select_file(Some(UploadFile::from_path("/data/sales.csv")));
        assert_eq!(flow.file_label(), "sales.csv");
        flow.select_file(None);
        assert_eq!(flow.file_label(), NO_FILE_LABEL);
    }
}
