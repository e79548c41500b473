//! Speech input capability.

use async_trait::async_trait;

/// A source of finished, transcribed user text (e.g. a speech recognizer).
///
/// Chat sessions never depend on a capture mechanism directly; they only
/// receive the final transcript.
#[async_trait]
pub trait VoiceInputSource: Send + Sync {
    /// Waits for the next complete transcript.
    ///
    /// `Ok(None)` means capture ended without producing text.
    async fn next_transcript(&self) -> anyhow::Result<Option<String>>;
}
