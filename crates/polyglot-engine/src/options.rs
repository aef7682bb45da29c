//! Engine options
//!
//! Read from the `[engine]` table of the runtime options document:
//!
//! ```toml
//! [engine]
//! max_call_depth = 512
//! splitting = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Maximum nesting of executing call targets (default: 512)
    pub max_call_depth: usize,
    /// Whether call nodes may clone their targets (default: true)
    pub splitting: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            max_call_depth: 512,
            splitting: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OptionsDocument {
    #[serde(default)]
    engine: EngineOptions,
}

impl EngineOptions {
    /// Parse the `[engine]` table of a TOML document
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let doc: OptionsDocument = toml::from_str(source)?;
        Ok(doc.engine)
    }

    /// Read and parse an options file
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EngineOptions::default();
        assert_eq!(opts.max_call_depth, 512);
        assert!(opts.splitting);
    }

    #[test]
    fn test_partial_table() {
        let opts = EngineOptions::from_toml_str("[engine]\nsplitting = false\n").unwrap();
        assert!(!opts.splitting);
        assert_eq!(opts.max_call_depth, 512);
    }

    #[test]
    fn test_other_tables_ignored() {
        let opts = EngineOptions::from_toml_str("[host]\ndeployment = \"aot\"\n").unwrap();
        assert_eq!(opts, EngineOptions::default());
    }

    #[test]
    fn test_malformed() {
        assert!(EngineOptions::from_toml_str("[engine]\nmax_call_depth = \"deep\"\n").is_err());
    }
}
