//! Logger setup for binaries and tests. The library itself only emits
//! through the `log` macros.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Initializes `env_logger`.
///
/// `level` ("error", "warn", "info", "debug", "trace") takes precedence,
/// then `RUST_LOG`, then `info`. Calling it twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = resolve_level(level, std::env::var("RUST_LOG").ok().as_deref());

    let res = Builder::new()
        .filter_level(filter)
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{:<5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if res.is_err() {
        log::debug!("Logger already initialized");
    }
}

fn resolve_level(level: Option<&str>, env: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| env.and_then(|v| v.parse::<LevelFilter>().ok()))
        .unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_precedence() {
        assert_eq!(resolve_level(Some("debug"), Some("warn")), LevelFilter::Debug);
        assert_eq!(resolve_level(None, Some("warn")), LevelFilter::Warn);
        assert_eq!(resolve_level(Some("loud"), None), LevelFilter::Info);
        assert_eq!(resolve_level(None, None), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice() {
        init_logging(Some("warn"));
        init_logging(Some("warn"));
    }
}
