//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use focus_core::FocusError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Nothing to act on (config missing, no active timer)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\nHint: {}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error bubbling out of a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<FocusError>() {
        Some(FocusError::InvalidTransition { .. }) | Some(FocusError::InvalidDuration(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(FocusError::KeyUnavailable(_))
        | Some(FocusError::AuthenticationFailed)
        | Some(FocusError::DecodeError(_))
        | Some(FocusError::Storage(_)) => exit_codes::SECURE_STORAGE,
        _ => 1,
    }
}

/// Split an error message into the message and an optional hint line.
pub fn split_hint(error: &str) -> (String, Option<String>) {
    match error.find("\nHint: ") {
        Some(idx) => (
            error[..idx].to_string(),
            Some(error[idx + "\nHint: ".len()..].to_string()),
        ),
        None => (error.to_string(), contextual_hint(error)),
    }
}

fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("while timer is idle") {
        return Some("Run `focus start` to begin a session.".to_string());
    }
    if error_lower.contains("while timer is completed") {
        return Some("Run `focus finish` to record the session or `focus discard`.".to_string());
    }
    if error_lower.contains("while timer is running")
        || error_lower.contains("while timer is paused")
    {
        return Some("Run `focus status` to see the current timer.".to_string());
    }
    if error_lower.contains("cannot access secure storage") {
        return Some("Run `focus doctor` to inspect the store and key.".to_string());
    }
    None
}
