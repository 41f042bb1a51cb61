pub mod analysis;
pub mod control;
pub mod download;
pub mod notices;
pub mod transport;
pub mod upload;

pub use analysis::{AnalysisFlow, AnalysisPhase, AnalysisTicket, PendingAnalysis, Selections};
pub use control::ControlState;
pub use download::{DownloadFlow, DownloadStart, DownloadTicket, PendingDownload};
pub use notices::{Notice, NoticeKind, Notices};
pub use transport::{HttpTransport, Transport, TransportFuture};
pub use upload::{AcceptedUpload, PendingUpload, UploadFlow, UploadTicket};
