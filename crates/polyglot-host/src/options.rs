//! Runtime options
//!
//! The deployment mode decides which field access backend new descriptors
//! use. It is configured once per process by the embedding runtime, either
//! explicitly through [`install`] or from the environment:
//!
//! ```toml
//! [host]
//! deployment = "aot"   # or "jit"
//! ```
//!
//! `POLYGLOT_DEPLOYMENT=aot|jit` overrides the file value when options are
//! loaded with [`RuntimeOptions::with_env_overrides`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable selecting the deployment mode
pub const DEPLOYMENT_ENV: &str = "POLYGLOT_DEPLOYMENT";

static OPTIONS: OnceCell<RuntimeOptions> = OnceCell::new();

/// How the process was deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Just-in-time: dynamic code generation is allowed
    #[default]
    Jit,
    /// Ahead-of-time / closed world: no code may be generated after startup
    Aot,
}

impl DeploymentMode {
    /// Whether direct-invocation handles may be linked at run time
    pub fn allows_dynamic_code(self) -> bool {
        matches!(self, DeploymentMode::Jit)
    }
}

impl FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jit" => Ok(DeploymentMode::Jit),
            "aot" => Ok(DeploymentMode::Aot),
            other => Err(ConfigError::Invalid(format!(
                "unknown deployment mode '{}' (expected 'jit' or 'aot')",
                other
            ))),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Jit => write!(f, "jit"),
            DeploymentMode::Aot => write!(f, "aot"),
        }
    }
}

/// Host interop options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Deployment mode (default: jit)
    #[serde(default)]
    pub deployment: DeploymentMode,
}

/// Options document; tables other than `[host]` belong to other components
#[derive(Debug, Default, Deserialize)]
struct OptionsDocument {
    #[serde(default)]
    host: RuntimeOptions,
}

impl RuntimeOptions {
    /// Options for an explicit deployment mode
    pub fn with_deployment(deployment: DeploymentMode) -> Self {
        Self { deployment }
    }

    /// Parse the `[host]` table of a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let doc: OptionsDocument = toml::from_str(source)?;
        Ok(doc.host)
    }

    /// Read and parse an options file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `POLYGLOT_DEPLOYMENT` if set
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(DEPLOYMENT_ENV) {
            self.deployment = value.parse()?;
        }
        Ok(self)
    }
}

/// Install the process-wide options.
///
/// Fails if options were already installed or already read by [`current`].
pub fn install(options: RuntimeOptions) -> Result<(), ConfigError> {
    OPTIONS
        .set(options)
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    tracing::debug!(deployment = %current().deployment, "runtime options installed");
    Ok(())
}

/// The process-wide options.
///
/// Falls back to [`RuntimeOptions::from_env`] on first use when nothing was
/// installed; an unreadable environment value falls back to the defaults.
pub fn current() -> &'static RuntimeOptions {
    OPTIONS.get_or_init(|| {
        RuntimeOptions::from_env().unwrap_or_else(|err| {
            tracing::warn!("ignoring {}: {}", DEPLOYMENT_ENV, err);
            RuntimeOptions::default()
        })
    })
}

/// The process-wide deployment mode
pub fn deployment_mode() -> DeploymentMode {
    current().deployment
}
