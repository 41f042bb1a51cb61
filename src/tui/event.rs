//! Terminal input, ticks and finished network requests on one channel.

use crate::core::{AnalyzeResponse, UploadResponse};
use crate::services::{
    AnalysisTicket, DownloadTicket, PendingAnalysis, PendingDownload, PendingUpload, UploadTicket,
};
use color_eyre::Result;
use crossterm::event::{Event as CEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Completed(Completion),
}

/// A network request that has come back, paired with its ticket
#[derive(Debug)]
pub enum Completion {
    Upload(UploadTicket, Result<UploadResponse>),
    Analysis(AnalysisTicket, Result<AnalyzeResponse>),
    Download(DownloadTicket, Result<Vec<u8>>),
}

/// Runs pending requests in the background and reports their outcome
#[derive(Debug, Clone)]
pub struct Tasks {
    tx: UnboundedSender<AppEvent>,
}

impl Tasks {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn upload(&self, pending: PendingUpload) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = pending.response.await;
            Self::report(&tx, Completion::Upload(pending.ticket, outcome));
        });
    }

    pub fn analysis(&self, pending: PendingAnalysis) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = pending.response.await;
            Self::report(&tx, Completion::Analysis(pending.ticket, outcome));
        });
    }

    pub fn download(&self, pending: PendingDownload) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = pending.bytes.await;
            Self::report(&tx, Completion::Download(pending.ticket, outcome));
        });
    }

    fn report(tx: &UnboundedSender<AppEvent>, completion: Completion) {
        if tx.send(AppEvent::Completed(completion)).is_err() {
            // The UI loop is gone; nothing left to update.
            debug!("Dropping completion after shutdown");
        }
    }
}

/// Merges terminal events and ticks into the completion channel
pub struct EventLoop {
    rx: UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
    reader: Option<JoinHandle<()>>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            tx,
            reader: None,
        }
    }

    pub fn tasks(&self) -> Tasks {
        Tasks::new(self.tx.clone())
    }

    /// Start reading the terminal; call once the terminal is in raw mode
    pub fn start(&mut self, tick_rate: Duration) {
        let tx = self.tx.clone();
        self.reader = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut ticks = tokio::time::interval(tick_rate);
            loop {
                let event = tokio::select! {
                    _ = ticks.tick() => AppEvent::Tick,
                    maybe = reader.next() => match maybe {
                        Some(Ok(CEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            AppEvent::Key(key)
                        }
                        Some(Ok(CEvent::Resize(w, h))) => AppEvent::Resize(w, h),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            error!("Terminal event error: {e}");
                            continue;
                        }
                        None => break,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
