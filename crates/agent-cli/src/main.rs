//! ReAct agent command prompt
//!
//! Reads one query per line and prints the agent's reasoning trace and
//! answer. `exit` or `quit` leaves.

mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::Agent;
use agent_runtime::RuntimeConfig;

#[derive(Parser, Debug)]
#[command(name = "react-agent", version, about = "Chat with a ReAct agent from the terminal")]
struct Args {
    /// Override the model (or Azure deployment) name
    #[arg(long, env = "MODEL_NAME")]
    model: Option<String>,

    /// Maximum think cycles per query
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Print only answers, hiding the reasoning trace
    #[arg(long, short)]
    quiet: bool,
}

fn is_exit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = RuntimeConfig::from_env().context("reading configuration")?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }

    let provider = config.build_provider()?;
    let tools = react_tools::default_registry(config.tavily_api_key.as_deref())?;
    let mut agent = Agent::new(provider, Arc::new(tools), config.agent_config()?);

    println!(
        "{} {} via {} | tools: {}",
        "ReAct agent".bold(),
        config.model.as_str().cyan(),
        agent.provider().name(),
        agent.tools().names().join(", ")
    );
    println!("{}", "Type 'exit' or 'quit' to leave.".dark_grey());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(format!("{} ", "you>".green().bold()).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit(query) {
            break;
        }

        match agent.execute(query).await {
            Ok(messages) => {
                let transcript = agent_core::transcript::split(&messages);
                if !args.quiet {
                    for message in &transcript.trace {
                        println!("{}", render::line(message));
                    }
                }
                for message in &transcript.chat {
                    println!("{} {}", "agent>".cyan().bold(), message.content.trim());
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "query failed");
                println!("{} {}", "agent>".red().bold(), e.user_message());
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
