//! Chat session state machine.
//!
//! `ChatSession` orchestrates one conversation: it appends the user's message
//! before any request is issued, augments questions with the current document
//! context, calls the analysis service, and appends the reply (or a fixed
//! error notice) once the call settles. Completed exchanges are recorded in
//! the persisted history; failed ones are not.

use crate::outbound::with_timeout;
use chrono::Local;
use mediflow_core::analysis::{AnalysisService, DocumentUpload, ServiceError};
use mediflow_core::error::{MediflowError, Result};
use mediflow_core::session::{ConversationContext, Message, SessionState, message_timestamp};
use mediflow_core::storage::SessionHistoryStore;
use mediflow_core::voice::VoiceInputSource;
use std::sync::Arc;
use std::time::Duration;

/// Shown when a chat call fails for any reason.
pub const CHAT_CONNECTION_ERROR: &str =
    "⚠️ **Connection Error**: Unable to reach the medical server. Is the backend running?";
/// Shown when a document analysis call fails for any reason.
pub const DOCUMENT_ANALYSIS_ERROR: &str = "⚠️ **Analysis Failed**: Could not process the document.";
/// Substituted for an empty assistant reply.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't process that request.";

/// How a `send_message` / `upload_document` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    /// Nothing was sent (blank input or no transcript).
    Ignored,
    Succeeded,
    /// The call failed; a synthetic assistant message was appended.
    Failed(ServiceError),
}

pub struct ChatSession {
    service: Arc<dyn AnalysisService>,
    history: SessionHistoryStore,
    context: ConversationContext,
    messages: Vec<Message>,
    state: SessionState,
    request_timeout: Duration,
}

impl ChatSession {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        history: SessionHistoryStore,
        request_timeout: Duration,
    ) -> Self {
        Self {
            service,
            history,
            context: ConversationContext::new(),
            messages: Vec::new(),
            state: SessionState::Idle,
            request_timeout,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while a request is outstanding; callers should block input.
    pub fn is_typing(&self) -> bool {
        self.state.is_busy()
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn history(&self) -> &SessionHistoryStore {
        &self.history
    }

    /// Forgets the current document context.
    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Starts a fresh conversation: no messages, no context, `Idle`.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.context.clear();
        self.state = SessionState::Idle;
    }

    /// Sends a user question, augmented with the document context if one is set.
    ///
    /// # Errors
    ///
    /// Returns `MediflowError::Busy` if another request is outstanding.
    /// Service failures are not errors: they end in `ExchangeOutcome::Failed`.
    pub async fn send_message(&mut self, text: &str) -> Result<ExchangeOutcome> {
        if text.trim().is_empty() {
            return Ok(ExchangeOutcome::Ignored);
        }
        let service = Arc::clone(&self.service);
        let limit = self.request_timeout;
        let query = self.context.build_query(text);

        let mut pending = self.begin(Message::user(text, now()), CHAT_CONNECTION_ERROR)?;
        let result = with_timeout(limit, service.ask(&query)).await;
        let session = pending.settle();

        match result {
            Ok(reply) => {
                session.state = SessionState::Succeeded;
                let content = if reply.is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    reply
                };
                session.messages.push(Message::assistant(content, now()));

                // The exchange itself succeeded even if the history write fails.
                if let Err(err) = session
                    .history
                    .record_exchange(&session.messages, &Local::now())
                {
                    tracing::error!("[ChatSession] Failed to record history: {}", err);
                }
                session.finish();
                Ok(ExchangeOutcome::Succeeded)
            }
            Err(err) => {
                tracing::warn!("[ChatSession] Chat request failed: {}", err);
                session.fail(CHAT_CONNECTION_ERROR);
                Ok(ExchangeOutcome::Failed(err))
            }
        }
    }

    /// Uploads a document for analysis and, on success, makes its analysis the
    /// context for later questions.
    ///
    /// On failure the previous context is kept as-is.
    pub async fn upload_document(&mut self, upload: &DocumentUpload) -> Result<ExchangeOutcome> {
        let service = Arc::clone(&self.service);
        let limit = self.request_timeout;

        let mut pending = self.begin(
            Message::user(format!("📎 Uploaded: **{}**", upload.filename), now()),
            DOCUMENT_ANALYSIS_ERROR,
        )?;
        let result = with_timeout(limit, service.analyze_report(upload)).await;
        let session = pending.settle();

        match result {
            Ok(analysis) => {
                session.state = SessionState::Succeeded;
                session.messages.push(Message::assistant(
                    format!(
                        "### 📄 Analysis Result for {}\n\n{}\n\n*I have memorized this report. You can now ask me questions about it!*",
                        upload.filename, analysis
                    ),
                    now(),
                ));
                session.context.set_context(analysis);
                tracing::info!(
                    "[ChatSession] Document context set from '{}'",
                    upload.filename
                );
                session.finish();
                Ok(ExchangeOutcome::Succeeded)
            }
            Err(err) => {
                tracing::warn!(
                    "[ChatSession] Analysis of '{}' failed: {}",
                    upload.filename,
                    err
                );
                session.fail(DOCUMENT_ANALYSIS_ERROR);
                Ok(ExchangeOutcome::Failed(err))
            }
        }
    }

    /// Sends the next finished transcript from a voice source as a message.
    ///
    /// Capture problems are logged and treated as "nothing said".
    pub async fn accept_voice(&mut self, source: &dyn VoiceInputSource) -> Result<ExchangeOutcome> {
        match source.next_transcript().await {
            Ok(Some(text)) => self.send_message(&text).await,
            Ok(None) => Ok(ExchangeOutcome::Ignored),
            Err(err) => {
                tracing::warn!("[ChatSession] Voice capture failed: {}", err);
                Ok(ExchangeOutcome::Ignored)
            }
        }
    }

    /// Appends the user message and enters `Sending`.
    ///
    /// The returned guard falls back to `notice` if it is dropped before the
    /// call settles.
    fn begin(&mut self, user_message: Message, notice: &'static str) -> Result<InFlight<'_>> {
        if self.state.is_busy() {
            return Err(MediflowError::Busy);
        }
        self.messages.push(user_message);
        self.state = SessionState::Sending;
        Ok(InFlight {
            session: self,
            notice,
            settled: false,
        })
    }

    fn fail(&mut self, notice: &str) {
        self.state = SessionState::Failed;
        self.messages.push(Message::assistant(notice, now()));
        self.finish();
    }

    fn finish(&mut self) {
        self.state = SessionState::Idle;
    }
}

/// An outstanding call. Abandoning it (the caller dropped the future) settles
/// the exchange as failed so the session returns to `Idle`.
struct InFlight<'a> {
    session: &'a mut ChatSession,
    notice: &'static str,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(&mut self) -> &mut ChatSession {
        self.settled = true;
        &mut *self.session
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("[ChatSession] Request abandoned before it settled");
            self.session.fail(self.notice);
        }
    }
}

fn now() -> String {
    message_timestamp(&Local::now())
}
