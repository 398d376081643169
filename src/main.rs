use analytics_agent::cli_adapter::{self, Input};
use analytics_agent::config::Config;
use analytics_agent::render::{self, TYPING_INDICATOR};
use analytics_agent::{ChatSnapshot, IgnoreReason, Submission, TurnController};
use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let _bin = args.remove(0);
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    match args[0].as_str() {
        "chat" => run_chat(&args[1..]).await,
        "ask" => run_ask(&args[1..]),
        "suggest" => {
            println!("{}", cli_adapter::suggestions_text());
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_ask(args: &[String]) -> Result<()> {
    let text = args.join(" ");
    if text.trim().is_empty() {
        print_ask_usage();
        return Ok(());
    }
    init_tracing(&Config::default().logging.filter);

    let topic = analytics_agent::resolve(&text);
    let record = topic.record();
    let out = serde_json::json!({
        "topic": topic,
        "content": record.content,
        "data": record.payload(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("failed to encode response")?
    );
    Ok(())
}

async fn run_chat(args: &[String]) -> Result<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let value = args.get(i + 1).context("--config requires a value")?;
                config_path = Some(PathBuf::from(value));
                i += 2;
            }
            "--help" | "-h" => {
                print_chat_usage();
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown chat argument: {other}"));
            }
        }
    }

    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    init_tracing(&config.logging.filter);
    tracing::info!(config = ?config_path, "starting chat session");

    let controller = TurnController::new();
    let mut replies = controller.subscribe();
    let printer = tokio::spawn(print_snapshots(
        controller.subscribe(),
        config.chat.show_data,
        config.chat.prompt.clone(),
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let input = match cli_adapter::parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("{err:#}");
                prompt(&config.chat.prompt)?;
                continue;
            }
        };

        match input {
            Input::Text(text) => match controller.submit(&text) {
                Submission::Accepted => wait_for_reply(&mut replies).await?,
                Submission::Ignored(IgnoreReason::Empty) => prompt(&config.chat.prompt)?,
                Submission::Ignored(IgnoreReason::Pending) => {
                    eprintln!("still waiting for the previous answer");
                }
            },
            Input::Clear => controller.clear(),
            Input::Suggest => {
                println!("{}", cli_adapter::suggestions_text());
                prompt(&config.chat.prompt)?;
            }
            Input::Json => {
                if let Some(message) = controller.snapshot().messages.last() {
                    println!("{}", render::pretty_message(message)?);
                }
                prompt(&config.chat.prompt)?;
            }
            Input::Help => {
                println!("{}", cli_adapter::help_text());
                prompt(&config.chat.prompt)?;
            }
            Input::Quit => break,
        }
    }

    wait_for_reply(&mut replies).await?;
    drop(controller);
    printer.await.context("printer task failed")?;
    println!();
    Ok(())
}

async fn wait_for_reply(rx: &mut watch::Receiver<ChatSnapshot>) -> Result<()> {
    rx.wait_for(|snapshot| !snapshot.pending)
        .await
        .context("chat session closed")?;
    Ok(())
}

async fn print_snapshots(rx: watch::Receiver<ChatSnapshot>, show_data: bool, prompt_text: String) {
    let mut stream = WatchStream::new(rx);
    let mut last_id: Option<u64> = None;
    while let Some(snapshot) = stream.next().await {
        for message in &snapshot.messages {
            if last_id.is_some_and(|id| message.id <= id) {
                continue;
            }
            println!("{}", render::render_message(message, show_data));
            last_id = Some(message.id);
        }
        if snapshot.pending {
            println!("{TYPING_INDICATOR}");
        } else if let Err(err) = prompt(&prompt_text) {
            tracing::warn!("failed to write prompt: {err:#}");
        }
    }
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}").context("failed to write prompt")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn print_usage() {
    eprintln!(
        "analytics-agent usage:\n  analytics-agent chat [--config <path>]\n  analytics-agent ask <question>\n  analytics-agent suggest"
    );
}

fn print_chat_usage() {
    eprintln!(
        "analytics-agent chat options:\n  --config <path>   TOML config with [chat] and [logging] sections\n\n{}",
        cli_adapter::help_text()
    );
}

fn print_ask_usage() {
    eprintln!("analytics-agent ask <question>");
}
