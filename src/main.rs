use anyhow::Result;
use clap::{Parser, Subcommand};

mod api;
mod app;
mod commands;
mod config;
mod conversation;
mod tui;
mod ui;

use config::Config;

#[derive(Parser)]
#[command(name = "xiaofen")]
#[command(version = "0.1.0")]
#[command(about = "小粉助手 — RoboMaster Q&A chat widget for the terminal", long_about = None)]
struct Cli {
    /// Base URL of the chat backend (overrides config and XIAOFEN_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one question and print the reply, without the widget
    Ask { message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        None => app::run(config).await,
        Some(Commands::Ask { message }) => commands::ask(&config, &message).await,
    }
}
