//! Supplier notifications: message composition, the transport seam, and
//! failure-isolating dispatch.

pub mod compose;
pub mod dispatch;
pub mod in_memory_transport;
pub mod transport;

pub use compose::{compose, item_line, SUBJECT};
pub use dispatch::{DispatchResult, NotificationDispatcher};
pub use in_memory_transport::{RecordingTransport, SentMessage};
pub use transport::{MessageTransport, TransportError};
