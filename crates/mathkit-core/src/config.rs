//! Configuration types for MathKit.
//!
//! Seed values for the widgets and settings for the tutor client, loaded from
//! an optional `mathkit.json`. Every field has a default, so a missing file or
//! an empty object is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composition::DEFAULT_INPUT;
use crate::derivative::{SampleRange, DEFAULT_STEP, MAX_SAMPLES, MAX_X, MIN_X};
use crate::error::{MathKitError, Result};
use crate::place_value::DEFAULT_TARGET;

/// The default config file name.
const CONFIG_FILE_NAME: &str = "mathkit.json";

const fn default_machine_input() -> f64 {
    DEFAULT_INPUT
}

const fn default_place_value_target() -> u64 {
    DEFAULT_TARGET
}

const fn default_plot_start() -> f64 {
    MIN_X
}

const fn default_plot_end() -> f64 {
    MAX_X
}

const fn default_plot_step() -> f64 {
    DEFAULT_STEP
}

/// Default chat model for tutor feedback.
fn default_model() -> String {
    "gpt-4o".to_string()
}

/// Default base URL of the chat-completions API.
fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Default environment variable holding the API key.
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_seconds() -> u32 {
    30
}

/// Main configuration for MathKit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Input value a new function machine starts with.
    #[serde(default = "default_machine_input")]
    pub machine_input: f64,

    /// Number the place-value learner is asked to build.
    #[serde(default = "default_place_value_target")]
    pub place_value_target: u64,

    /// Plot range for the derivative visualizer.
    #[serde(default)]
    pub derivative: DerivativeConfig,

    /// Tutor feedback settings.
    #[serde(default)]
    pub tutor: TutorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            machine_input: default_machine_input(),
            place_value_target: default_place_value_target(),
            derivative: DerivativeConfig::default(),
            tutor: TutorConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `mathkit.json`; falls back to defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            MathKitError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `mathkit.json` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `MathKitError::ConfigParseError` if the file cannot be read or
    /// is not valid JSON, and `MathKitError::ConfigValidationError` if a value
    /// is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(MathKitError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| MathKitError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `MathKitError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if !self.machine_input.is_finite() {
            return Err(MathKitError::config_validation(
                "machineInput must be a finite number",
                "Set machineInput to a plain number in your mathkit.json",
            ));
        }

        let plot = &self.derivative;
        if !(plot.step.is_finite() && plot.step > 0.0) {
            return Err(MathKitError::config_validation(
                "derivative.step must be greater than 0",
                "Set derivative.step to a small positive number such as 0.1",
            ));
        }

        if !(plot.start.is_finite() && plot.end.is_finite() && plot.start < plot.end) {
            return Err(MathKitError::config_validation(
                "derivative.start must be less than derivative.end",
                "Use a range such as start -3 and end 3 in your mathkit.json",
            ));
        }

        if SampleRange::from(*plot).exceeds_limit() {
            return Err(MathKitError::config_validation(
                format!("derivative range holds more than {MAX_SAMPLES} samples"),
                "Increase derivative.step or narrow the start/end range",
            ));
        }

        if self.tutor.model.trim().is_empty() {
            return Err(MathKitError::config_validation(
                "tutor.model must not be empty",
                "Set tutor.model to a chat model name such as \"gpt-4o\"",
            ));
        }

        if self.tutor.api_base.trim().is_empty() {
            return Err(MathKitError::config_validation(
                "tutor.apiBase must not be empty",
                "Set tutor.apiBase to the API root, e.g. \"https://api.openai.com/v1\"",
            ));
        }

        if self.tutor.timeout_seconds == 0 {
            return Err(MathKitError::config_validation(
                "tutor.timeoutSeconds must be greater than 0",
                "Set tutor.timeoutSeconds to at least 1 second in your mathkit.json",
            ));
        }

        Ok(())
    }
}

/// Plot range for the derivative visualizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivativeConfig {
    /// Left edge of the plot.
    #[serde(default = "default_plot_start")]
    pub start: f64,

    /// Right edge of the plot.
    #[serde(default = "default_plot_end")]
    pub end: f64,

    /// Spacing between samples.
    #[serde(default = "default_plot_step")]
    pub step: f64,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            start: default_plot_start(),
            end: default_plot_end(),
            step: default_plot_step(),
        }
    }
}

impl From<DerivativeConfig> for SampleRange {
    fn from(config: DerivativeConfig) -> Self {
        Self {
            start: config.start,
            end: config.end,
            step: config.step,
        }
    }
}

/// Settings for the chat-completion tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorConfig {
    /// Chat model to ask.
    #[serde(default = "default_model")]
    pub model: String,

    /// API root; `/chat/completions` is appended.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable the API key is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
