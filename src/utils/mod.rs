//! Utilities: logging setup (dynamic level, always to stderr).
//!
//! Key items:
//!   LogLevel / derive_level
//!   init_logging
//!   debug_from_env

use tracing_subscriber::EnvFilter;

/// Environment fallback for `--debug`.
pub const DEBUG_ENV: &str = "STUDIO_MCP_DEBUG";

/// Logging helpers.
pub mod logging {
    use super::*;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "error",
                LogLevel::Info => "info",
                LogLevel::Debug => "debug",
                LogLevel::Trace => "trace",
            }
        }
    }

    /// Map CLI flags to a level. `--debug` counts as one `-v`.
    pub fn derive_level(verbose: u8, quiet: bool, debug: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose.max(u8::from(debug)) {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Install the global subscriber. Stdout is the protocol channel, so logs
    /// always go to stderr. `RUST_LOG` overrides `level` when set.
    /// Safe to call more than once; later calls are no-ops.
    pub fn init_logging(level: LogLevel) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .try_init();
    }

    /// `true` when the debug environment fallback is set to a non-empty value.
    pub fn debug_from_env() -> bool {
        std::env::var(DEBUG_ENV)
            .ok()
            .is_some_and(|v| !v.trim().is_empty())
    }
}

pub use logging::{LogLevel, debug_from_env, derive_level, init_logging};

/* --------------------------------- Tests ---------------------------------- */
