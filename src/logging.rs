//! Logger setup
//!
//! Components take a parent [`Logger`] and derive their own child with a
//! `"system"` key, so every line says which layer produced it.

use slog::{Drain, Level, Logger, o};
use std::io;

/// Environment variable holding the minimum log level
pub const LOG_LEVEL_ENV: &str = "SKY_BATTLE_LOG";

/// Parses a level name, falling back to `Info` for anything unknown
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "warn" | "warning" => Level::Warning,
        "error" => Level::Error,
        "critical" => Level::Critical,
        _ => Level::Info,
    }
}

/// Level from `SKY_BATTLE_LOG`, or `Info` when unset
pub fn level_from_env() -> Level {
    std::env::var(LOG_LEVEL_ENV)
        .map(|name| parse_level(&name))
        .unwrap_or(Level::Info)
}

fn local_timestamp(out: &mut dyn io::Write) -> io::Result<()> {
    write!(out, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
}

/// Builds the root logger: compact terminal output behind an async drain
pub fn root_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator)
        .use_custom_timestamp(local_timestamp)
        .build()
        .fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(level).fuse();
    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Logger that drops everything
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("debug"), Level::Debug);
        assert_eq!(parse_level("WARNING"), Level::Warning);
        assert_eq!(parse_level(" warn "), Level::Warning);
        assert_eq!(parse_level("error"), Level::Error);
    }

    #[test]
    fn test_unknown_level_is_info() {
        assert_eq!(parse_level("loud"), Level::Info);
        assert_eq!(parse_level(""), Level::Info);
    }
}
