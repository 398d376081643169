use crate::resolver::SUGGESTED_QUESTIONS;
use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Clear,
    Suggest,
    Json,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input> {
    let trimmed = line.trim();

    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(Input::Text(trimmed.to_string()));
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match (name, arg) {
        ("clear", None) => Ok(Input::Clear),
        ("suggest", None) => Ok(Input::Suggest),
        ("json", None) => Ok(Input::Json),
        ("help", None) => Ok(Input::Help),
        ("quit" | "exit", None) => Ok(Input::Quit),
        ("ask", Some(arg)) => {
            let index: usize = arg.parse().context("/ask expects a question number")?;
            let question = index
                .checked_sub(1)
                .and_then(|i| SUGGESTED_QUESTIONS.get(i))
                .with_context(|| {
                    format!("no suggested question {index} (1-{})", SUGGESTED_QUESTIONS.len())
                })?;
            Ok(Input::Text((*question).to_string()))
        }
        ("ask", None) => bail!("/ask requires a question number"),
        (other, _) => bail!("unknown command: /{other}"),
    }
}

pub fn help_text() -> String {
    "commands:\n  /ask <n>   send suggested question n\n  /suggest   list suggested questions\n  /json      dump the last message as JSON\n  /clear     clear the conversation\n  /help      show this help\n  /quit      exit".to_string()
}

pub fn suggestions_text() -> String {
    SUGGESTED_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| format!("  {}. {q}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
