pub mod codec;
pub mod editor;
mod loader;
pub mod session;
pub mod workbench;

pub use codec::encode;
pub use editor::{EditOutcome, PointerEvent};
pub use session::{AlignmentSummary, Session};
pub use workbench::{LoadTicket, SentenceStore, StoreError, Workbench, WorkbenchError};
