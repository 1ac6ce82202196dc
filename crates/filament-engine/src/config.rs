//! World configuration and validation.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// What the realtime world does when an exit cell fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltBehavior {
    /// Terminate the process with the signal's value as exit status —
    /// the language's definition of an exit cell. This is the default.
    ExitProcess,
    /// Record the halt, stop ticking, and let the embedder read it via
    /// [`RealtimeWorld::halt`](crate::RealtimeWorld::halt). Used by
    /// tests and hosts that outlive their circuits.
    Signal,
}

/// Configuration for a circuit world.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Directory searched for macro sub-grid files. Default: `.`.
    pub macro_dir: PathBuf,
    /// File extension of macro sub-grid files. Default: `fil`.
    pub macro_extension: String,
    /// Upper bound on propagation passes per tick. Default: 5.
    pub max_passes: u32,
    /// Attempts before a pending gate/relay relaxes to its default
    /// output. Default: 5.
    pub max_attempts: u32,
    /// Seed for the random-source generator. Runs with equal seeds and
    /// equal circuits produce equal draws.
    pub seed: u64,
    /// Period of the realtime tick loop. Default: 50 ms.
    pub tick_interval: Duration,
    /// Exit-cell behavior. Default: [`HaltBehavior::ExitProcess`].
    pub halt_behavior: HaltBehavior,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            macro_dir: PathBuf::from("."),
            macro_extension: "fil".to_string(),
            max_passes: 5,
            max_attempts: 5,
            seed: 0,
            tick_interval: Duration::from_millis(50),
            halt_behavior: HaltBehavior::ExitProcess,
        }
    }
}

impl WorldConfig {
    /// Check structural invariants at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_passes == 0 {
            return Err(ConfigError::ZeroPasses);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.macro_extension.is_empty() {
            return Err(ConfigError::EmptyMacroExtension);
        }
        Ok(())
    }
}

/// Errors detected during [`WorldConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_passes` is zero — the tick loop would never evaluate.
    ZeroPasses,
    /// `max_attempts` is zero — every gate would fire before its first
    /// input was recorded.
    ZeroAttempts,
    /// `tick_interval` is zero — the tick thread would spin.
    ZeroTickInterval,
    /// `macro_extension` is empty — macro files would be unfindable.
    EmptyMacroExtension,
    /// The tick thread could not be spawned.
    ThreadSpawnFailed {
        /// The OS error, rendered.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPasses => write!(f, "max_passes must be at least 1"),
            Self::ZeroAttempts => write!(f, "max_attempts must be at least 1"),
            Self::ZeroTickInterval => write!(f, "tick_interval must be non-zero"),
            Self::EmptyMacroExtension => write!(f, "macro_extension must be non-empty"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "could not spawn tick thread: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}
