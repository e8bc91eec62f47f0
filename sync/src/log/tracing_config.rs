// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::try_create_layers;
use miette::IntoDiagnostic;
use tracing::dispatcher::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where [`tracing`] output goes, and at what level. Used to install a subscriber that
/// displays the diagnostics this crate emits (event loop lifecycle, panics caught in
/// callbacks) and the records forwarded by the default log handler.
///
/// Installing a subscriber is optional. Without one, every [`tracing`] event is a no-op.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// - `tracing_log_file_path`: [`String`] is the log file path, e.g. `/tmp/app.log`.
/// - `DisplayPreference`: [`DisplayPreference`] is the terminal stream to write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    Display(DisplayPreference),
    File(String /* tracing_log_file_path */),
    DisplayAndFile(DisplayPreference, String /* tracing_log_file_path */),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_file(tracing_log_file_path: impl Into<String>) -> Self {
        Self {
            writer_config: WriterConfig::File(tracing_log_file_path.into()),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }

    /// Global default subscriber, which once set, can't be unset or changed. This is
    /// for apps.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created, or a global subscriber has
    /// already been installed.
    pub fn install_global(self) -> miette::Result<()> {
        let layers = try_create_layers(self)?;
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic()
    }

    /// Thread local subscriber, active until the returned guard is dropped. This is for
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created.
    pub fn install_thread_local(self) -> miette::Result<DefaultGuard> {
        let layers = try_create_layers(self)?;
        Ok(tracing_subscriber::registry().with(layers).set_default())
    }
}
