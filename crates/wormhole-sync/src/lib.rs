//! Client-side synchronization for Wormhole short URLs.
//!
//! [`Session`] reconciles the remote service (any [`wormhole_core::UrlApi`])
//! with the persisted [`wormhole_cache::LocalCache`], resolves search
//! queries without racing stale lookups, and tracks transient per-record
//! state for a presentation layer.

pub mod clipboard;
pub mod error;
pub mod interaction;
pub mod scheduler;
pub mod search;
pub mod session;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use error::{Action, ErrorSlot, Result, SessionError};
pub use interaction::{CopyFeedback, CopyVariant, EditSession, InteractionState};
pub use scheduler::{TaskSlot, Ticket};
pub use search::{SearchPhase, SearchResolver, SearchState, SearchView};
pub use session::{Session, SessionConfig, SessionView};
