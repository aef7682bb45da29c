//! Engine error types.

/// Errors raised while executing call targets or loading options
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Call depth limit reached
    #[error("Stack overflow at call depth {0}")]
    StackOverflow(usize),

    /// Wrong number of arguments
    #[error("Arity mismatch calling {name}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Callee name
        name: String,
        /// Declared arity
        expected: usize,
        /// Arguments supplied
        actual: usize,
    },

    /// Argument node refers past the supplied arguments
    #[error("Argument index {0} out of range")]
    ArgumentOutOfRange(usize),

    /// A builtin failed
    #[error("Builtin error: {0}")]
    Builtin(String),

    /// A caller-relative query ran outside any executing call target
    #[error("No current frame: not running inside a call target")]
    NoCurrentFrame,

    /// Failed to read options file
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse options
    #[error("Failed to parse options: {0}")]
    Config(#[from] toml::de::Error),
}

/// Engine result
pub type EngineResult<T> = Result<T, EngineError>;
