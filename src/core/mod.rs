pub mod models;
pub mod session;
pub mod types;
pub mod wire;

pub use models::*;
pub use session::{AppState, ColumnSet, Session, SessionId};
pub use types::*;
pub use wire::{AnalyzeRequestBody, AnalyzeResponse, PreviewRow, TableStats, UploadResponse};
