//! HTTP transport for the chat endpoint.

use crate::config::Config;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Request body sent to `POST /api/chat`. Only the latest message is
/// transmitted; the server keeps no session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body from the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Everything that can go wrong with one chat request. All variants are
/// presented to the user as the same fallback message; the distinction
/// exists for tests and the one-shot CLI.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("response body has no reply field")]
    MalformedReply,
}

/// Seam between the conversation controller and the network. The
/// controller spawns the request task with a clone of the transport.
pub trait ChatTransport: Clone + Send + Sync + 'static {
    /// Send one user message and yield the assistant reply.
    fn send(&self, message: String) -> impl Future<Output = Result<String, ChatError>> + Send;
}

/// Reqwest-backed client for the chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ChatTransport for ChatClient {
    fn send(&self, message: String) -> impl Future<Output = Result<String, ChatError>> + Send {
        let http = self.http.clone();
        let url = format!("{}/api/chat", self.base_url);

        async move {
            let response = http
                .post(&url)
                .json(&ChatRequest { message })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ChatError::Status(status));
            }

            let body: ChatReply = response.json().await?;
            extract_reply(body)
        }
    }
}

/// Pull the reply text out of a decoded body. A body without a usable
/// `reply` field counts as a failed request.
pub fn extract_reply(body: ChatReply) -> Result<String, ChatError> {
    body.reply.ok_or(ChatError::MalformedReply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_field_is_extracted() {
        let body: ChatReply = serde_json::from_str(r#"{"reply":"你好"}"#).unwrap();
        assert_eq!(extract_reply(body).unwrap(), "你好");
    }

    #[test]
    fn empty_body_is_malformed() {
        let body: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_reply(body),
            Err(ChatError::MalformedReply)
        ));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body: ChatReply =
            serde_json::from_str(r#"{"reply":"ok","model":"deepseek"}"#).unwrap();
        assert_eq!(extract_reply(body).unwrap(), "ok");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let config = Config {
            base_url: "http://localhost:8000/".to_string(),
        };
        let client = ChatClient::new(&config);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
