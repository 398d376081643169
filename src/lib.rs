//! Mock analytics chat agent.
//!
//! A session is a [`TurnController`]: it owns the [`MessageLog`], accepts user
//! submissions and, after a fixed delay, appends a canned reply chosen by the
//! keyword [`resolver`]. Presentation layers observe it through
//! [`TurnController::subscribe`].

pub mod cli_adapter;
pub mod config;
pub mod controller;
pub mod message_log;
pub mod render;
pub mod resolver;
pub mod types;

pub use controller::{IgnoreReason, RESPONSE_DELAY, Submission, TurnController};
pub use message_log::MessageLog;
pub use resolver::{ResponseRecord, SUGGESTED_QUESTIONS, Topic, resolve, respond};
pub use types::{ChatSnapshot, Message, Payload, Role};
