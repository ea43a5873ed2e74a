// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ChainError;

mod validation;

/// How far a guarded step that observes an absent value reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortCircuit {
    /// The whole remainder of the chain is skipped and the result is absent.
    #[default]
    Chain,
    /// Only the guarded step yields absent; later mandatory steps still run
    /// and fail on it.
    Step,
}

/// Evaluator options, usually loaded from a JSON file.
///
/// Every field has a default, so `{}` is a complete options file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    pub short_circuit: ShortCircuit,
    /// Let a guarded invoke on a present non-function yield absent instead
    /// of failing with `NotInvocable`.
    pub lenient_invoke: bool,
    /// Chains with more steps than this are rejected before evaluation.
    pub max_chain_length: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            short_circuit: ShortCircuit::Chain,
            lenient_invoke: false,
            max_chain_length: 256,
        }
    }
}

impl EvalOptions {
    /// Load options from a JSON file. A leading `~/` is expanded to the
    /// home directory.
    ///
    /// # Example
    /// ```no_run
    /// # use safe_chain::EvalOptions;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let options = EvalOptions::from_file("~/.config/safe-chain/options.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChainError> {
        let raw = path.as_ref().to_string_lossy().to_string();
        let resolved = expand_home(&raw)?;

        let content = fs::read_to_string(&resolved).map_err(|e| ChainError::FileError {
            message: format!("Failed to read file: {}", e),
            path: resolved.to_string_lossy().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(301),
        })?;

        debug!(path = %resolved.display(), "loading evaluator options");
        Self::from_str(&content)
    }

    /// Load options with fallback support.
    ///
    /// Tries the primary path first. If that file cannot be read, the
    /// fallback path is tried. Parse and validation errors from the primary
    /// file are returned as-is.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, ChainError> {
        match Self::from_file(&primary) {
            Ok(options) => Ok(options),
            Err(ChainError::FileError { .. }) => {
                debug!(
                    primary = %primary.as_ref().display(),
                    fallback = %fallback.as_ref().display(),
                    "primary options file unreadable, trying fallback"
                );
                Self::from_file(&fallback).map_err(|e| match e {
                    ChainError::FileError { message, .. } => ChainError::FileError {
                        message: format!(
                            "Failed to load options from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the options files exists".into()),
                        code: Some(302),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Parse options from JSON text and validate them.
    pub fn from_str(content: &str) -> Result<Self, ChainError> {
        let options: EvalOptions = serde_json::from_str(content).map_err(|e| ChainError::ConfigError {
            message: format!("Failed to parse options: {}", e),
            hint: Some("Options must be a JSON object, e.g. {\"short_circuit\": \"chain\"}".into()),
            code: Some(310),
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_short_circuit(mut self, mode: ShortCircuit) -> Self {
        self.short_circuit = mode;
        self
    }

    pub fn with_lenient_invoke(mut self, lenient: bool) -> Self {
        self.lenient_invoke = lenient;
        self
    }

    pub fn with_max_chain_length(mut self, max: usize) -> Self {
        self.max_chain_length = max;
        self
    }
}

/// Expand "~/" against the home directory.
fn expand_home(raw_path: &str) -> Result<PathBuf, ChainError> {
    match raw_path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| ChainError::FileError {
                message: "Could not determine home directory for ~ expansion".into(),
                path: raw_path.to_string(),
                hint: Some("Set HOME or use an absolute path".into()),
                code: Some(300),
            })?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw_path)),
    }
}
