//! One-shot CLI commands that skip the widget.

use crate::api::{ChatClient, ChatTransport};
use crate::config::Config;
use crate::conversation::reply_or_fallback;
use anyhow::Result;

/// Send a single question to the backend and print the reply. A failed
/// request prints the same fallback text the widget shows; it is never an
/// error exit.
pub async fn ask(config: &Config, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        println!("请输入一个问题。");
        return Ok(());
    }

    let client = ChatClient::new(config);
    let outcome = client.send(message.to_string()).await;
    println!("{}", reply_or_fallback(outcome));

    Ok(())
}
