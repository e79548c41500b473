//! Document context injection.

use serde::{Deserialize, Serialize};

const CONTEXT_HEADER: &str = "[System Note: Context from uploaded medical file]\n";
const QUESTION_MARKER: &str = "\n\n[User Question]: ";

/// Holds the extracted text of the most recently analyzed document.
///
/// Single slot, last write wins. The context never expires on its own; it is
/// replaced by the next successful document analysis or dropped by `clear`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    document: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any stored context.
    pub fn set_context(&mut self, text: impl Into<String>) {
        self.document = Some(text.into());
    }

    pub fn clear(&mut self) {
        self.document = None;
    }

    pub fn get(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.document.is_some()
    }

    /// Builds the outgoing query.
    ///
    /// With a context set the result is
    ///
    /// ```text
    /// [System Note: Context from uploaded medical file]
    /// <context>
    ///
    /// [User Question]: <user_text>
    /// ```
    ///
    /// Without one, `user_text` is returned unchanged.
    pub fn build_query(&self, user_text: &str) -> String {
        match &self.document {
            Some(context) => format!("{CONTEXT_HEADER}{context}{QUESTION_MARKER}{user_text}"),
            None => user_text.to_string(),
        }
    }

    /// Splits a query produced by [`build_query`](Self::build_query) into
    /// `(context, question)`.
    ///
    /// Returns `None` for a plain query. The question is located by the last
    /// marker, so a context that itself contains the marker text still splits
    /// at the live question.
    pub fn parse_query(query: &str) -> Option<(&str, &str)> {
        let body = query.strip_prefix(CONTEXT_HEADER)?;
        let split = body.rfind(QUESTION_MARKER)?;
        Some((&body[..split], &body[split + QUESTION_MARKER.len()..]))
    }
}
