//! Injectable logging collaborator.
//!
//! The client reports every failed operation through a [`Logger`] before
//! returning the error to the caller. [`TracingLogger`] forwards to `tracing`
//! and is used when no logger is injected; [`NoopLogger`] discards everything.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::{Context, bail};
use serde::Deserialize;

/// Verbosity threshold of a [`Logger`].
///
/// Ordered from most to least verbose. `Off` suppresses all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "RawLogLevel")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
    /// Nothing.
    Off,
}

impl LogLevel {
    /// Maps a bunyan-style numeric level (10 trace ... 60 fatal) to a `LogLevel`.
    ///
    /// Values between the named levels round up to the next one.
    #[must_use]
    pub const fn from_numeric(value: u64) -> Self {
        match value {
            0..=10 => Self::Trace,
            11..=20 => Self::Debug,
            21..=30 => Self::Info,
            31..=40 => Self::Warn,
            41..=60 => Self::Error,
            _ => Self::Off,
        }
    }

    /// Returns `true` if a message at `at` passes this threshold.
    #[must_use]
    pub fn admits(self, at: Self) -> bool {
        self != Self::Off && at >= self
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Trace => 0,
            Self::Debug => 1,
            Self::Info => 2,
            Self::Warn => 3,
            Self::Error => 4,
            Self::Off => 5,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warn,
            4 => Self::Error,
            _ => Self::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    /// Accepts level names (case-insensitive) or bunyan numeric levels.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim();
        if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
            let value: u64 = trimmed
                .parse()
                .with_context(|| format!("invalid numeric log level: {trimmed}"))?;
            return Ok(Self::from_numeric(value));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "fatal" => Ok(Self::Error),
            "off" | "none" | "silent" => Ok(Self::Off),
            other => bail!("unknown log level: {other}"),
        }
    }
}

/// Untagged wire form of a log level: a name or a bunyan number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogLevel {
    Number(u64),
    Name(String),
}

impl TryFrom<RawLogLevel> for LogLevel {
    type Error = String;

    fn try_from(raw: RawLogLevel) -> Result<Self, String> {
        match raw {
            RawLogLevel::Number(n) => Ok(Self::from_numeric(n)),
            RawLogLevel::Name(name) => name.parse().map_err(|e: anyhow::Error| e.to_string()),
        }
    }
}

/// Destination for operation failures.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Reports a failure tagged with the operation that detected it.
    fn error(&self, context: &str, err: &(dyn std::error::Error + 'static));

    /// Changes the verbosity threshold.
    fn set_level(&self, level: LogLevel);

    /// Returns the current verbosity threshold.
    fn level(&self) -> LogLevel;
}

/// Logger that forwards to `tracing`, filtered by its own threshold.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TracingLogger {
    level: AtomicU8,
}

impl TracingLogger {
    /// Creates a logger with the given threshold.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level.to_u8()),
        }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl Logger for TracingLogger {
    fn error(&self, context: &str, err: &(dyn std::error::Error + 'static)) {
        if !self.level().admits(LogLevel::Error) {
            return;
        }
        match err.source() {
            Some(source) => {
                tracing::error!(context, error = %err, cause = %source, "TVSS operation failed");
            }
            None => tracing::error!(context, error = %err, "TVSS operation failed"),
        }
    }

    fn set_level(&self, level: LogLevel) {
        self.level.store(level.to_u8(), Ordering::Relaxed);
    }

    fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
#[allow(clippy::module_name_repetitions)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn error(&self, _context: &str, _err: &(dyn std::error::Error + 'static)) {}

    fn set_level(&self, _level: LogLevel) {}

    fn level(&self) -> LogLevel {
        LogLevel::Off
    }
}
