//! Analysis flow.
//!
//! Each trigger walks `Idle -> Validating -> Requesting -> (Success | Failed)
//! -> Idle`. Validation and the terminal states are instantaneous, so only
//! `Idle` and `Requesting` are ever observable between calls. Every analysis
//! kind owns its own control, so different kinds may be in flight at once.

use crate::core::{
    AnalysisKind, AnalysisParams, AnalysisRequest, AnalysisResult, AnalyzeRequestBody,
    AnalyzeResponse, AppState, ColumnSelector,
};
use crate::error::{DashError, DashResult};
use crate::services::control::ControlState;
use crate::services::transport::{Transport, TransportFuture};
use color_eyre::Result;
use tracing::{debug, error, info, warn};

/// Current values of the three column pickers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub histogram: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
}

impl Selections {
    pub fn get(&self, selector: ColumnSelector) -> Option<&str> {
        match selector {
            ColumnSelector::Histogram => self.histogram.as_deref(),
            ColumnSelector::ScatterX => self.scatter_x.as_deref(),
            ColumnSelector::ScatterY => self.scatter_y.as_deref(),
        }
    }

    pub fn set(&mut self, selector: ColumnSelector, value: Option<String>) {
        let slot = match selector {
            ColumnSelector::Histogram => &mut self.histogram,
            ColumnSelector::ScatterX => &mut self.scatter_x,
            ColumnSelector::ScatterY => &mut self.scatter_y,
        };
        *slot = value.filter(|v| !v.is_empty());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Observable phase of one analysis control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Requesting,
}

/// Identifies one analysis submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub kind: AnalysisKind,
    /// Per-kind monotonic request number
    pub seq: u64,
    /// Session epoch the request was built against
    pub epoch: u64,
    pub params: AnalysisParams,
}

/// A submitted analysis whose response is still outstanding
pub struct PendingAnalysis {
    pub ticket: AnalysisTicket,
    pub request: AnalysisRequest,
    pub response: TransportFuture<AnalyzeResponse>,
}

/// Check the guards and build the request for `kind`
///
/// Scatter plots may use the same column on both axes.
pub fn build_request(
    kind: AnalysisKind,
    state: &AppState,
    selections: &Selections,
) -> DashResult<AnalysisRequest> {
    let session_id = state
        .session_id()
        .cloned()
        .ok_or_else(|| DashError::validation("No data uploaded. Please upload a file first."))?;
    let params = match kind {
        AnalysisKind::Summary => AnalysisParams::Summary,
        AnalysisKind::Correlation => AnalysisParams::Correlation,
        AnalysisKind::Histogram => {
            let column = selections
                .histogram
                .clone()
                .ok_or_else(|| DashError::validation("Please select a column for the histogram"))?;
            AnalysisParams::Histogram { column }
        }
        AnalysisKind::Scatter => match (&selections.scatter_x, &selections.scatter_y) {
            (Some(x), Some(y)) => AnalysisParams::Scatter {
                x_column: x.clone(),
                y_column: y.clone(),
            },
            _ => {
                return Err(DashError::validation(
                    "Please select both X and Y columns for the scatter plot",
                ));
            }
        },
    };
    Ok(AnalysisRequest { session_id, params })
}

struct Slot {
    control: ControlState,
    seq: u64,
}

pub struct AnalysisFlow {
    slots: [Slot; 4],
}

impl Default for AnalysisFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisFlow {
    pub fn new() -> Self {
        Self {
            slots: AnalysisKind::ALL.map(|kind| Slot {
                control: ControlState::new(kind.title(), "Loading..."),
                seq: 0,
            }),
        }
    }

    pub fn control(&self, kind: AnalysisKind) -> &ControlState {
        &self.slots[kind.index()].control
    }

    pub fn phase(&self, kind: AnalysisKind) -> AnalysisPhase {
        if self.control(kind).is_enabled() {
            AnalysisPhase::Idle
        } else {
            AnalysisPhase::Requesting
        }
    }

    /// Validate and submit one analysis
    ///
    /// `Ok(None)` means the control for `kind` is busy and the trigger was
    /// ignored. A validation error leaves the control untouched and sends
    /// nothing.
    pub fn begin(
        &mut self,
        kind: AnalysisKind,
        state: &AppState,
        selections: &Selections,
        transport: &dyn Transport,
    ) -> DashResult<Option<PendingAnalysis>> {
        let slot = &mut self.slots[kind.index()];
        if !slot.control.is_enabled() {
            debug!("{kind} trigger ignored: request outstanding");
            return Ok(None);
        }
        debug!("{kind}: Idle -> Validating");
        let request = build_request(kind, state, selections).inspect_err(|e| {
            debug!("{kind}: Validating -> Idle ({e})");
        })?;

        slot.control.begin();
        slot.seq += 1;
        debug!("{kind}: Validating -> Requesting (#{})", slot.seq);
        let ticket = AnalysisTicket {
            kind,
            seq: slot.seq,
            epoch: state.epoch(),
            params: request.params.clone(),
        };
        let response = transport.analyze(AnalyzeRequestBody::from(&request));
        Ok(Some(PendingAnalysis {
            ticket,
            request,
            response,
        }))
    }

    /// Apply the outcome of a submission
    ///
    /// The control is restored on every path. `Ok(None)` means the response
    /// is stale (a newer request of the same kind exists, or the session
    /// changed) and must not be rendered.
    pub fn finish(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<AnalyzeResponse>,
        current_epoch: u64,
    ) -> DashResult<Option<AnalysisResult>> {
        let kind = ticket.kind;
        let slot = &mut self.slots[kind.index()];
        if ticket.seq == slot.seq {
            slot.control.restore();
        }
        if ticket.seq != slot.seq || ticket.epoch != current_epoch {
            warn!(
                "Discarding stale {kind} response #{} (latest #{}, epoch {} vs {})",
                ticket.seq, slot.seq, ticket.epoch, current_epoch
            );
            return Ok(None);
        }

        let response = outcome.map_err(|e| {
            error!("{kind} analysis failed: {e:?}");
            debug!("{kind}: Requesting -> Failed -> Idle");
            DashError::transport("An error occurred during analysis")
        })?;
        match AnalysisResult::from_response(&ticket.params, response) {
            Ok(result) => {
                info!("{kind} analysis completed");
                debug!("{kind}: Requesting -> Success -> Idle");
                Ok(Some(result))
            }
            Err(e) => {
                debug!("{kind}: Requesting -> Failed -> Idle ({e})");
                Err(e)
            }
        }
    }
}
