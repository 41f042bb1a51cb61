//! The dashboard: application state plus the flows that act on it.
//!
//! All mutation happens through `&mut Dashboard` on one thread. Network
//! round-trips are split into `begin_*` (validate, flip controls, hand back a
//! future) and `finish_*` (apply the outcome), so several requests can be
//! outstanding while the owner keeps handling input. Errors never escape:
//! they are surfaced on the notice channel.

use crate::core::{
    AnalysisKind, AnalyzeResponse, AppState, ColumnSelector, UploadFile, UploadResponse,
};
use crate::render::{self, PreviewView, ResultCards, Section};
use crate::services::{
    AnalysisFlow, AnalysisPhase, AnalysisTicket, ControlState, DownloadFlow, DownloadStart,
    DownloadTicket, Notices, PendingAnalysis, PendingDownload, PendingUpload, Selections,
    Transport, UploadFlow, UploadTicket,
};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub download_dir: PathBuf,
    pub notice_timeout: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            notice_timeout: crate::services::notices::DEFAULT_NOTICE_TIMEOUT,
        }
    }
}

pub struct Dashboard {
    transport: Arc<dyn Transport>,
    state: AppState,
    upload: UploadFlow,
    analysis: AnalysisFlow,
    download: DownloadFlow,
    selections: Selections,
    preview: PreviewView,
    results: ResultCards,
    notices: Notices,
    scroll_target: Option<Section>,
}

impl Dashboard {
    pub fn new(transport: Arc<dyn Transport>, options: DashboardOptions) -> Self {
        Self {
            transport,
            state: AppState::new(),
            upload: UploadFlow::new(),
            analysis: AnalysisFlow::new(),
            download: DownloadFlow::new(options.download_dir),
            selections: Selections::default(),
            preview: render::render_preview(None, None, ""),
            results: ResultCards::default(),
            notices: Notices::new(options.notice_timeout),
            scroll_target: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn preview(&self) -> &PreviewView {
        &self.preview
    }

    pub fn results(&self) -> &ResultCards {
        &self.results
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn download_dir(&self) -> &Path {
        self.download.dir()
    }

    pub fn file_label(&self) -> &str {
        self.upload.file_label()
    }

    pub fn upload_control(&self) -> &ControlState {
        self.upload.control()
    }

    pub fn analysis_control(&self, kind: AnalysisKind) -> &ControlState {
        self.analysis.control(kind)
    }

    pub fn analysis_phase(&self, kind: AnalysisKind) -> AnalysisPhase {
        self.analysis.phase(kind)
    }

    pub fn download_control(&self, kind: AnalysisKind) -> &ControlState {
        self.download.control(kind)
    }

    /// Section to bring into view, consumed by the caller
    pub fn take_scroll_target(&mut self) -> Option<Section> {
        self.scroll_target.take()
    }

    /// Expire old notices
    pub fn tick(&mut self, now: Instant) {
        self.notices.expire(now);
    }

    // Upload

    pub fn select_file(&mut self, path: Option<PathBuf>) {
        self.upload.select_file(path.map(UploadFile::from_path));
    }

    pub fn begin_upload(&mut self) -> Option<PendingUpload> {
        match self.upload.begin(self.transport.as_ref()) {
            Ok(pending) => pending,
            Err(e) => {
                self.notices.raise(&e);
                None
            }
        }
    }

    /// Apply an upload outcome; true when a new session was installed
    pub fn finish_upload(&mut self, ticket: UploadTicket, outcome: Result<UploadResponse>) -> bool {
        let accepted = match self.upload.finish(ticket, outcome) {
            Ok(Some(accepted)) => accepted,
            Ok(None) => return false,
            Err(e) => {
                self.notices.raise(&e);
                return false;
            }
        };
        let response = accepted.response;
        self.state.set_session(
            accepted.session_id,
            response.columns.clone(),
            &response.dtypes,
        );
        self.selections.clear();
        self.preview = render::render_preview(
            Some(&response),
            self.state.columns(),
            &accepted.file.file_name,
        );
        self.scroll_target = Some(Section::Preview);
        info!(
            "Session installed for {} ({} rows, {} columns)",
            self.preview.filename, self.preview.row_count, self.preview.column_count
        );
        true
    }

    /// Submit the selected file and wait for the response
    pub async fn upload(&mut self) -> bool {
        let Some(pending) = self.begin_upload() else {
            return false;
        };
        let outcome = pending.response.await;
        self.finish_upload(pending.ticket, outcome)
    }

    // Column pickers

    /// Set a picker; only values the picker offers (or `None`) are accepted
    pub fn select_column(&mut self, selector: ColumnSelector, value: Option<String>) -> bool {
        if let Some(v) = &value {
            if !self.preview.selector(selector).options.contains(v) {
                return false;
            }
        }
        self.selections.set(selector, value);
        true
    }

    /// Step a picker through placeholder and options, wrapping around
    pub fn cycle_column(&mut self, selector: ColumnSelector, forward: bool) {
        let options = &self.preview.selector(selector).options;
        if options.is_empty() {
            return;
        }
        // Position 0 is the placeholder.
        let len = options.len() + 1;
        let current = self
            .selections
            .get(selector)
            .and_then(|v| options.iter().position(|o| o == v))
            .map_or(0, |i| i + 1);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let value = next.checked_sub(1).map(|i| options[i].clone());
        self.selections.set(selector, value);
    }

    // Analysis

    pub fn begin_analysis(&mut self, kind: AnalysisKind) -> Option<PendingAnalysis> {
        match self
            .analysis
            .begin(kind, &self.state, &self.selections, self.transport.as_ref())
        {
            Ok(pending) => pending,
            Err(e) => {
                self.notices.raise(&e);
                None
            }
        }
    }

    /// Apply an analysis outcome; true when a card was rendered
    pub fn finish_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<AnalyzeResponse>,
    ) -> bool {
        match self.analysis.finish(ticket, outcome, self.state.epoch()) {
            Ok(Some(result)) => {
                let now = chrono::Utc::now().timestamp_millis();
                self.results.show(render::render_card(&result, now));
                self.scroll_target = Some(Section::Results);
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.notices.raise(&e);
                false
            }
        }
    }

    /// Run one analysis and wait for the response
    pub async fn analyze(&mut self, kind: AnalysisKind) -> bool {
        let Some(pending) = self.begin_analysis(kind) else {
            return false;
        };
        let outcome = pending.response.await;
        self.finish_analysis(&pending.ticket, outcome)
    }

    // Download

    /// Start a download; summary CSVs are written immediately
    pub fn begin_download(&mut self, kind: AnalysisKind) -> Option<PendingDownload> {
        let today = chrono::Local::now().date_naive();
        match self.download.begin(
            kind,
            self.state.has_session(),
            &self.results,
            self.transport.as_ref(),
            today,
        ) {
            Ok(Some(DownloadStart::Pending(pending))) => Some(pending),
            Ok(Some(DownloadStart::Saved(path))) => {
                self.notices.info(format!("Saved {}", path.display()));
                None
            }
            Ok(None) => None,
            Err(e) => {
                self.notices.raise(&e);
                None
            }
        }
    }

    pub fn finish_download(
        &mut self,
        ticket: &DownloadTicket,
        outcome: Result<Vec<u8>>,
    ) -> Option<PathBuf> {
        match self.download.finish(ticket, outcome) {
            Ok(path) => {
                self.notices.info(format!("Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.notices.raise(&e);
                None
            }
        }
    }

    /// Download the `kind` artifact and wait for any image fetch
    pub async fn download(&mut self, kind: AnalysisKind) {
        if let Some(pending) = self.begin_download(kind) {
            let outcome = pending.bytes.await;
            self.finish_download(&pending.ticket, outcome);
        }
    }
}
