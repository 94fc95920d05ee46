//! Conversation state owned by the chat widget.
//!
//! The controller holds the ordered message log, the draft being composed
//! and at most one in-flight request. UI components are pure projections
//! of `messages()` and `is_busy()`; all mutation goes through
//! `update_draft`, `submit` and `poll_reply`.

use crate::api::{ChatError, ChatTransport};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Assistant greeting seeded into every fresh conversation.
pub const GREETING: &str = "你好！我是小粉助手，RoboMaster机甲大师赛的AI问答机器人。有什么关于RoboMaster的问题可以问我哦！";

/// Shown in place of a reply whenever the request fails, for any reason.
pub const FALLBACK_REPLY: &str = "抱歉，网络出现问题，请稍后再试。";

/// A single chat message. Ordering in the log is arrival order; there are
/// no ids or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_user: bool,
}

impl Message {
    fn user(text: String) -> Self {
        Self { text, is_user: true }
    }

    fn assistant(text: String) -> Self {
        Self {
            text,
            is_user: false,
        }
    }
}

/// Collapse a request outcome into the text shown to the user. Network
/// errors, bad statuses and malformed bodies are indistinguishable here.
pub fn reply_or_fallback(outcome: Result<String, ChatError>) -> String {
    match outcome {
        Ok(reply) => reply,
        Err(_) => FALLBACK_REPLY.to_string(),
    }
}

/// Owns the conversation for one widget mount. Dropped on exit; nothing
/// is persisted.
pub struct ConversationController {
    messages: Vec<Message>,
    draft: String,
    reply_rx: Option<oneshot::Receiver<Result<String, ChatError>>>,
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationController {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING.to_string())],
            draft: String::new(),
            reply_rx: None,
        }
    }

    /// The message log, oldest first. Never empty.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Text currently in the input line.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// True while exactly one request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.reply_rx.is_some()
    }

    /// Replace the draft. No validation, no length cap.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit the current draft. A silent no-op while busy or when the
    /// trimmed draft is empty. Otherwise the draft is cleared, the user
    /// message appended and one request task spawned before this returns;
    /// the reply arrives through [`poll_reply`](Self::poll_reply).
    ///
    /// Returns whether a request was started.
    pub fn submit<T: ChatTransport>(&mut self, transport: &T) -> bool {
        if self.is_busy() {
            return false;
        }

        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return false;
        }

        self.draft.clear();
        self.messages.push(Message::user(text.clone()));

        let (tx, rx) = oneshot::channel();
        self.reply_rx = Some(rx);

        let transport = transport.clone();
        tokio::spawn(async move {
            let outcome = transport.send(text).await;
            // Receiver may be gone if the widget exited mid-flight.
            let _ = tx.send(outcome);
        });

        true
    }

    /// Drain the in-flight request if it has finished. Called from the
    /// event loop on every tick, whether or not the panel is open.
    ///
    /// Returns true when a reply (or the fallback) was appended.
    pub fn poll_reply(&mut self) -> bool {
        let Some(rx) = self.reply_rx.as_mut() else {
            return false;
        };

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            // Task died without sending; counts as a failed request.
            Err(TryRecvError::Closed) => Err(ChatError::MalformedReply),
        };

        self.messages
            .push(Message::assistant(reply_or_fallback(outcome)));
        self.reply_rx = None;
        true
    }
}
