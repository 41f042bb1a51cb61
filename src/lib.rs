#![allow(clippy::collapsible_if)]

pub mod config;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod render;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use core::{AnalysisKind, AppState, ColumnSet, SessionId};
pub use dashboard::{Dashboard, DashboardOptions};
pub use error::{DashError, DashResult};
pub use services::{HttpTransport, Transport};
pub use tui::{Action, ActionCategory};
