//! Pipeline configuration types.

use crate::{Classifier, ConfigError, KeyDecoding, SuccessRange};

/// Level at which raw bodies are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Log at debug level.
    #[default]
    Debug,
    /// Log at info level.
    Info,
}

/// Configuration for a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Status codes treated as success.
    pub success_range: SuccessRange,
    /// Status routed to the error decoder before any other non-success status.
    pub error_status: Option<u16>,
    /// Key naming strategy used for JSON payloads.
    ///
    /// Defaults to [`KeyDecoding::UseDefaultKeys`]: snake-case wire keys map
    /// onto snake-case fields unchanged. Shapes declared in camelCase
    /// (`#[serde(rename_all = "camelCase")]`) need
    /// [`KeyDecoding::ConvertFromSnakeCase`]; callers used to decoders that
    /// always convert snake-case keys must opt in to it here.
    pub key_decoding: KeyDecoding,
    /// Whether raw bodies are handed to the body observer.
    pub log_body: bool,
    /// Level used when raw bodies are logged through `tracing`.
    pub log_level: LogLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            success_range: SuccessRange::DEFAULT,
            error_status: None,
            key_decoding: KeyDecoding::default(),
            log_body: false,
            log_level: LogLevel::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Classifier for this configuration.
    #[must_use]
    pub const fn classifier(&self) -> Classifier {
        Classifier::new(self.success_range, self.error_status)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfigBuilder {
    success_range: Option<SuccessRange>,
    error_status: Option<u16>,
    key_decoding: Option<KeyDecoding>,
    log_body: Option<bool>,
    log_level: Option<LogLevel>,
}

impl PipelineConfigBuilder {
    /// Set the inclusive success range.
    #[must_use]
    pub const fn success_range(mut self, start: u16, end: u16) -> Self {
        self.success_range = Some(SuccessRange::new(start, end));
        self
    }

    /// Set the status routed to the error decoder first.
    #[must_use]
    pub const fn error_status(mut self, status: u16) -> Self {
        self.error_status = Some(status);
        self
    }

    /// Set the key naming strategy.
    #[must_use]
    pub const fn key_decoding(mut self, keys: KeyDecoding) -> Self {
        self.key_decoding = Some(keys);
        self
    }

    /// Set whether raw bodies are logged.
    #[must_use]
    pub const fn log_body(mut self, enabled: bool) -> Self {
        self.log_body = Some(enabled);
        self
    }

    /// Set the raw body log level.
    #[must_use]
    pub const fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the success range is empty, or if the error status lies inside
    /// it and could therefore never be selected.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let defaults = PipelineConfig::default();
        let success_range = self.success_range.unwrap_or(defaults.success_range);

        if success_range.is_empty() {
            return Err(ConfigError::EmptySuccessRange {
                start: success_range.start(),
                end: success_range.end(),
            });
        }

        if let Some(status) = self.error_status
            && success_range.contains(status)
        {
            return Err(ConfigError::UnreachableErrorStatus {
                status,
                start: success_range.start(),
                end: success_range.end(),
            });
        }

        Ok(PipelineConfig {
            success_range,
            error_status: self.error_status,
            key_decoding: self.key_decoding.unwrap_or(defaults.key_decoding),
            log_body: self.log_body.unwrap_or(defaults.log_body),
            log_level: self.log_level.unwrap_or(defaults.log_level),
        })
    }
}
