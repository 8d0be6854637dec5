use std::fmt::Write;

pub use anyhow::Error as RuntimeError;
use thiserror::Error;

use crate::plugin::PluginRequest;

/// A plugin id string that does not satisfy the id grammar.
#[derive(Debug, Error)]
#[error("Invalid plugin id '{id}': {reason}")]
pub struct InvalidPluginId {
    pub id: String,
    pub reason: &'static str,
}

/// One plugin source that was consulted and declined a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    /// Human-readable description of the source, e.g. "Core plugins".
    pub source: String,
    /// Why the source rejected the request.
    pub reason: String,
}

/// No source in the resolver chain could satisfy the request. Carries every
/// consulted source together with its rejection reason, in chain order, so
/// the user can tell which candidate sources were searched and why each one
/// turned the request down.
#[derive(Debug, Error)]
#[error("Plugin {} was not found in any of the following sources:{}", .request, format_attempts(.attempts))]
pub struct PluginNotFoundError {
    pub request: PluginRequest,
    pub attempts: Vec<SourceAttempt>,
}

fn format_attempts(attempts: &[SourceAttempt]) -> String {
    let mut acc = String::new();

    for attempt in attempts {
        write!(&mut acc, "\n- {} ({})", attempt.source, attempt.reason).unwrap();
    }

    acc
}

/// A plugin source failed for a reason other than "no such plugin", e.g. a
/// repository could not be reached. Kept apart from [`PluginNotFoundError`]
/// so "couldn't check" is never mistaken for "doesn't exist".
#[derive(Debug, Error)]
#[error("Plugin source '{resolver}' was unavailable:\n{cause}")]
pub struct ResolverTransportError {
    pub resolver: String,
    pub cause: anyhow::Error,
}

impl ResolverTransportError {
    pub fn new(resolver: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            resolver: resolver.into(),
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    NotFound(#[from] PluginNotFoundError),

    #[error(transparent)]
    Transport(#[from] ResolverTransportError),
}

/// An excluded task name did not resolve to any task in the current build.
#[derive(Debug, Error)]
#[error("Task '{}' was not found in the current build{}", .name, format_detail(.detail))]
pub struct TaskSelectionError {
    pub name: String,
    pub detail: Option<String>,
}

fn format_detail(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(". {detail}"),
        None => String::new(),
    }
}

impl TaskSelectionError {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
