//! In-game diagnostic messages
//!
//! Every decision is traced through `tracing`. On top of that, players can
//! enable in-game logging in the settings; those messages go to the host's
//! message log through a [`MessageSink`]. Whether in-game logging is enabled
//! is cached and only re-read from the settings on [`Diagnostics::refresh`]
//! or after [`Diagnostics::invalidate`].

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::config::SettingsProvider;

pub const MESSAGE_PREFIX: &str = "[KWYD]";

/// Failure reported by the host's message display
#[derive(Debug, Error)]
#[error("message sink unavailable: {reason}")]
pub struct SinkError {
    pub reason: String,
}

impl SinkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Host message log.
pub trait MessageSink {
    fn display(&self, message: &str) -> Result<(), SinkError>;
}

/// Severity of an in-game message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

/// In-game message log with a cached enabled flag.
pub struct Diagnostics {
    sink: Option<Box<dyn MessageSink>>,
    enabled: Cell<Option<bool>>,
    show_debug: bool,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("has_sink", &self.sink.is_some())
            .field("enabled", &self.enabled.get())
            .field("show_debug", &self.show_debug)
            .finish()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::silent()
    }
}

impl Diagnostics {
    pub fn new(sink: Box<dyn MessageSink>) -> Self {
        Self {
            sink: Some(sink),
            enabled: Cell::new(None),
            show_debug: false,
        }
    }

    /// No in-game output; tracing only.
    pub fn silent() -> Self {
        Self {
            sink: None,
            enabled: Cell::new(None),
            show_debug: false,
        }
    }

    /// Also forward debug-level messages to the sink.
    pub fn with_debug_messages(mut self, show_debug: bool) -> Self {
        self.show_debug = show_debug;
        self
    }

    /// Re-read the enabled flag from the settings.
    pub fn refresh(&self, provider: &dyn SettingsProvider) {
        let enabled = provider
            .settings()
            .is_some_and(|s| s.enable_in_game_logging);
        self.enabled.set(Some(enabled));
    }

    /// Drop the cached flag; the next message re-reads the settings.
    pub fn invalidate(&self) {
        self.enabled.set(None);
    }

    /// Cached enabled flag, loading it on first use.
    pub fn is_enabled(&self, provider: &dyn SettingsProvider) -> bool {
        if self.enabled.get().is_none() {
            self.refresh(provider);
        }
        self.enabled.get().unwrap_or(false)
    }

    pub fn info(&self, provider: &dyn SettingsProvider, message: &str) {
        tracing::info!(target: "kwyd", "{message}");
        self.emit(provider, Level::Info, message);
    }

    pub fn debug(&self, provider: &dyn SettingsProvider, message: &str) {
        tracing::debug!(target: "kwyd", "{message}");
        self.emit(provider, Level::Debug, message);
    }

    fn emit(&self, provider: &dyn SettingsProvider, level: Level, message: &str) {
        if level == Level::Debug && !self.show_debug {
            return;
        }
        let Some(sink) = &self.sink else { return };
        if !self.is_enabled(provider) {
            return;
        }
        let line = format!("{MESSAGE_PREFIX} {message}");
        match panic::catch_unwind(AssertUnwindSafe(|| sink.display(&line))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::trace!(error = %err, "In-game message dropped"),
            Err(_) => tracing::warn!("Message sink panicked, in-game message dropped"),
        }
    }
}
