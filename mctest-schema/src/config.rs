//! Configuration for reading length-prefixed record streams.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Limits and leniency for [`DelimitedReader`](crate::DelimitedReader).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest accepted record body in bytes.
    pub max_frame_len: usize,
    /// Treat a partial length prefix at end of input as padding to ignore
    /// (logged as a warning) instead of an error.
    pub allow_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { max_frame_len: 64 * 1024 * 1024, allow_trailing_bytes: true }
    }
}

impl CodecConfig {
    /// Create a new builder for constructing a [`CodecConfig`].
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Set the largest accepted record body in bytes.
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Set whether trailing bytes shorter than a length prefix are ignored.
    pub fn allow_trailing_bytes(mut self, allow: bool) -> Self {
        self.config.allow_trailing_bytes = allow;
        self
    }

    /// Build the [`CodecConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ConfigError`] if:
    /// - `max_frame_len == 0`
    /// - `max_frame_len` does not fit the 4-byte length prefix
    pub fn build(self) -> Result<CodecConfig> {
        if self.config.max_frame_len == 0 {
            return Err(SchemaError::ConfigError(
                "max_frame_len must be greater than zero".to_string(),
            ));
        }
        if u32::try_from(self.config.max_frame_len).is_err() {
            return Err(SchemaError::ConfigError(format!(
                "max_frame_len ({}) must fit in a u32 length prefix",
                self.config.max_frame_len
            )));
        }
        Ok(self.config)
    }
}
