//! Executor configuration types.

use std::time::Duration;

/// Configuration for the [`HyperExecutor`](crate::HyperExecutor).
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Deadline for the whole call, body included.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ExecutorConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

/// Builder for [`ExecutorConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ExecutorConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
        }
    }
}
