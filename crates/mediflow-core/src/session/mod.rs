//! Session domain module.
//!
//! This module contains the conversation-side domain models: messages, the
//! document context slot, the request state machine's states and the history
//! rows recorded for completed exchanges.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `context`: Single-slot document context (`ConversationContext`)
//! - `state`: Request lifecycle (`SessionState`)
//! - `history`: Persisted summary rows (`HistoryEntry`)

mod context;
mod history;
mod message;
mod state;

// Re-export public API
pub use context::ConversationContext;
pub use history::{HistoryEntry, PREVIEW_CHARS, SUMMARY_CHARS, truncate_with_ellipsis};
pub use message::{Message, MessageRole, message_timestamp};
pub use state::SessionState;
